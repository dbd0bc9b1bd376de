use crate::config::{Options, DEFAULT_BASE_URI};
use crate::error::{FetchError, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Download, decrypt and verify the payment platform's certificates
#[derive(Parser, Debug)]
#[command(name = "fetch-certs")]
#[command(version)]
#[command(about = "Download the payment platform certificates and save them as PEM files")]
pub struct Cli {
    /// API v3 key (32 bytes), used to decrypt the certificates
    #[arg(short = 'k', long = "key", env = "WECHATPAY_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Merchant ID
    #[arg(short = 'm', long = "mchid", env = "WECHATPAY_MCHID")]
    pub mchid: Option<String>,

    /// Merchant private key file (PEM)
    #[arg(short = 'f', long = "privatekey", env = "WECHATPAY_PRIVATE_KEY")]
    pub private_key: Option<PathBuf>,

    /// Serial number of the merchant certificate
    #[arg(short = 's', long = "serialno", env = "WECHATPAY_SERIAL_NO")]
    pub serial_no: Option<String>,

    /// Directory the certificates are written to
    #[arg(short = 'o', long = "output", env = "WECHATPAY_OUTPUT", default_value_os_t = std::env::temp_dir())]
    pub output: PathBuf,

    /// API base URI
    #[arg(short = 'u', long = "baseuri", env = "WECHATPAY_BASE_URI", default_value = DEFAULT_BASE_URI)]
    pub base_uri: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Turn the parsed flags into validated options
    ///
    /// `Ok(None)` means a mandatory value is missing; the caller shows help
    /// and exits without signalling an error.
    pub fn into_options(self) -> Result<Option<Options>> {
        let (Some(key), Some(mchid), Some(private_key), Some(serial_no)) =
            (self.key, self.mchid, self.private_key, self.serial_no)
        else {
            return Ok(None);
        };

        let private_key_pem = fs::read_to_string(&private_key).map_err(|e| {
            FetchError::Config(format!(
                "cannot read private key {}: {}",
                private_key.display(),
                e
            ))
        })?;

        let options = Options::new(key, mchid, serial_no, private_key_pem, self.output, &self.base_uri)?
            .with_verbose(self.verbose);
        Ok(Some(options))
    }
}
