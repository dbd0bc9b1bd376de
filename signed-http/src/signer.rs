//! Request signing
//!
//! Every request carries an `Authorization` header of the form
//!
//! ```text
//! WECHATPAY2-SHA256-RSA2048 mchid="..",nonce_str="..",signature="..",timestamp="..",serial_no=".."
//! ```
//!
//! where the signature covers `METHOD\nPATH?QUERY\nTIMESTAMP\nNONCE\nBODY\n`.

use crate::error::Result;
use crypto::RsaSigner;
use rand::{distributions::Alphanumeric, Rng};

pub const AUTHORIZATION_SCHEMA: &str = "WECHATPAY2-SHA256-RSA2048";

const NONCE_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct RequestSigner {
    merchant_id: String,
    serial_no: String,
    signer: RsaSigner,
}

impl RequestSigner {
    /// Bind a merchant identity to its private key and certificate serial
    pub fn new(merchant_id: &str, serial_no: &str, private_key_pem: &str) -> Result<Self> {
        Ok(Self {
            merchant_id: merchant_id.to_string(),
            serial_no: serial_no.to_string(),
            signer: RsaSigner::from_pem(private_key_pem)?,
        })
    }

    /// Authorization header for a request issued now
    pub fn authorization(&self, method: &str, path_and_query: &str, body: &str) -> Result<String> {
        let timestamp = chrono::Utc::now().timestamp();
        let nonce = random_nonce();
        self.authorization_at(method, path_and_query, body, timestamp, &nonce)
    }

    /// Authorization header for fixed timestamp and nonce
    pub fn authorization_at(
        &self,
        method: &str,
        path_and_query: &str,
        body: &str,
        timestamp: i64,
        nonce: &str,
    ) -> Result<String> {
        let message = canonical_request(method, path_and_query, timestamp, nonce, body);
        let signature = self.signer.sign_base64(message.as_bytes())?;

        Ok(format!(
            r#"{} mchid="{}",nonce_str="{}",signature="{}",timestamp="{}",serial_no="{}""#,
            AUTHORIZATION_SCHEMA, self.merchant_id, nonce, signature, timestamp, self.serial_no
        ))
    }
}

/// The string covered by a request signature
pub fn canonical_request(
    method: &str,
    path_and_query: &str,
    timestamp: i64,
    nonce: &str,
    body: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}\n",
        method.to_uppercase(),
        path_and_query,
        timestamp,
        nonce,
        body
    )
}

fn random_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
