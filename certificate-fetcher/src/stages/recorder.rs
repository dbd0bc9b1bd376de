use crate::chain::ResponseStage;
use crate::envelope::parse_entries;
use crate::error::{FetchError, Result};
use crate::report::CertificateReport;
use crate::store::CertificateStore;
use signed_http::RawResponse;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output file for a certificate serial
pub fn certificate_path(output_dir: &Path, serial_no: &str) -> Result<PathBuf> {
    if serial_no.is_empty() || !serial_no.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::MalformedResponse(format!(
            "serial number {:?} is not usable as a file name",
            serial_no
        )));
    }
    Ok(output_dir.join(format!("wechatpay_{}.pem", serial_no)))
}

/// Persistence Reporter: writes each verified certificate to disk and
/// prints a report for it
///
/// Files are written one by one; a failure on certificate N leaves
/// certificates before N in place.
pub struct CertificateRecorder<W> {
    store: CertificateStore,
    output_dir: PathBuf,
    out: W,
}

impl<W: Write> CertificateRecorder<W> {
    pub fn new(store: CertificateStore, output_dir: impl Into<PathBuf>, out: W) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
            out,
        }
    }
}

impl<W: Write> ResponseStage for CertificateRecorder<W> {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn process(&mut self, response: &RawResponse) -> Result<()> {
        let entries = parse_entries(&response.body)?;
        if entries.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.output_dir)?;

        for (index, entry) in entries.iter().enumerate() {
            let path = certificate_path(&self.output_dir, &entry.serial_no)?;
            let content = self.store.get(&entry.serial_no).ok_or_else(|| {
                FetchError::MalformedResponse(format!(
                    "certificate {} was never decrypted",
                    entry.serial_no
                ))
            })?;

            fs::write(&path, content.as_bytes())?;

            let report = CertificateReport {
                index,
                serial_no: &entry.serial_no,
                not_before: &entry.effective_time,
                not_after: &entry.expire_time,
                path: &path,
                content: &content,
            };
            writeln!(self.out, "{}", report)?;
            info!(serial_no = %entry.serial_no, path = %path.display(), "platform certificate saved");
        }

        self.out.flush()?;
        Ok(())
    }
}
