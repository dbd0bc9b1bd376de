//! Human-readable output: per-certificate reports and failure diagnostics

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Render an RFC 3339 timestamp as RFC 2822 in GMT
///
/// `2024-01-01T00:00:00+08:00` becomes `Sun, 31 Dec 2023 16:00:00 GMT`.
/// Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// What the recorder prints for one saved certificate
#[derive(Debug)]
pub struct CertificateReport<'a> {
    pub index: usize,
    pub serial_no: &'a str,
    pub not_before: &'a str,
    pub not_after: &'a str,
    pub path: &'a Path,
    pub content: &'a str,
}

impl fmt::Display for CertificateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The platform certificate #{}", self.index)?;
        writeln!(f, "  serial={}", self.serial_no)?;
        writeln!(f, "  notBefore={}", format_timestamp(self.not_before))?;
        writeln!(f, "  notAfter={}", format_timestamp(self.not_after))?;
        writeln!(f, "  Saved to: {}", self.path.display())?;
        writeln!(
            f,
            "  You may confirm the above infos again even if this tool already did (by signature verification):"
        )?;
        writeln!(
            f,
            "    openssl x509 -in {} -noout -serial -dates",
            self.path.display()
        )?;
        writeln!(f, "  Content:")?;
        writeln!(f)?;
        write!(f, "{}", self.content)
    }
}

/// Print a terminal failure: message, response body if any, then the
/// diagnostic chain
pub fn write_failure<W: Write>(out: &mut W, err: FetchError) -> io::Result<()> {
    writeln!(out, "{}", err)?;
    if let Some(body) = err.response_body() {
        writeln!(out, "{}", body)?;
    }
    let diagnostic = anyhow::Error::new(err).context("certificate download failed");
    writeln!(out, "{:?}", diagnostic)
}
