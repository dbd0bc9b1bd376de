use crate::chain::ResponseStage;
use crate::envelope::parse_entries;
use crate::error::{FetchError, Result};
use crate::store::CertificateStore;
use crypto::{Aes256GcmDecryptor, CertificateInfo};
use signed_http::RawResponse;
use tracing::{debug, warn};

/// Decrypts every envelope of the response into the store
pub struct CertificateInjector {
    store: CertificateStore,
    decryptor: Aes256GcmDecryptor,
}

impl CertificateInjector {
    pub fn new(store: CertificateStore, api_key: &[u8]) -> Result<Self> {
        let decryptor = Aes256GcmDecryptor::from_slice(api_key)
            .map_err(|e| FetchError::Config(format!("API key: {}", e)))?;

        Ok(Self { store, decryptor })
    }
}

impl ResponseStage for CertificateInjector {
    fn name(&self) -> &'static str {
        "injector"
    }

    fn process(&mut self, response: &RawResponse) -> Result<()> {
        for entry in parse_entries(&response.body)? {
            let pem = entry
                .encrypt_certificate
                .open(&entry.serial_no, &self.decryptor)?;

            inspect(&entry.serial_no, &pem);

            if self.store.insert(&entry.serial_no, pem)? {
                debug!(serial_no = %entry.serial_no, "platform certificate decrypted");
            }
        }
        Ok(())
    }
}

/// Cross-check the decrypted certificate against the serial it was filed under
fn inspect(serial_no: &str, pem: &str) {
    match CertificateInfo::from_pem(pem) {
        Ok(info) if info.matches_serial(serial_no) => {
            if !info.is_valid_at(chrono::Utc::now()) {
                warn!(
                    serial_no,
                    not_before = %info.not_before,
                    not_after = %info.not_after,
                    "platform certificate is outside its validity window"
                );
            }
        }
        Ok(info) => warn!(
            serial_no,
            certificate_serial = %info.serial_hex,
            "decrypted certificate carries a different serial number"
        ),
        Err(e) => warn!(serial_no, error = %e, "decrypted certificate could not be parsed"),
    }
}
