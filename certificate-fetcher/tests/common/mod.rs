//! Shared helpers for the end-to-end tests
#![allow(dead_code)]

use certificate_fetcher::Options;
use crypto::{Aes256GcmDecryptor, RsaSigner};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

pub const API_KEY: &str = "0123456789abcdef0123456789abcdef";
pub const MERCHANT_ID: &str = "1900000001";
pub const MERCHANT_SERIAL: &str = "MERCHANTSERIAL";
pub const PLATFORM_SERIAL: &str = "ABC123";
pub const NONCE: &str = "0123456789ab";
pub const ASSOCIATED_DATA: &str = "certificate";

pub const MERCHANT_KEY: &str = include_str!("../../../fixtures/merchant_key.pem");
pub const PLATFORM_KEY: &str = include_str!("../../../fixtures/platform_key.pem");
pub const PLATFORM_CERT: &str = include_str!("../../../fixtures/platform_cert.pem");

/// Writer whose contents stay readable after it is moved into the chain
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn options(base_uri: &str, output_dir: &Path) -> Options {
    Options::new(API_KEY, MERCHANT_ID, MERCHANT_SERIAL, MERCHANT_KEY, output_dir, base_uri).unwrap()
}

/// One `data` element with `plaintext` sealed under the API key
pub fn entry(serial: &str, plaintext: &str) -> Value {
    let cipher = Aes256GcmDecryptor::from_slice(API_KEY.as_bytes()).unwrap();
    let ciphertext = cipher
        .encrypt_base64(plaintext.as_bytes(), NONCE.as_bytes(), ASSOCIATED_DATA.as_bytes())
        .unwrap();

    json!({
        "serial_no": serial,
        "effective_time": "2024-01-01T00:00:00+08:00",
        "expire_time": "2029-01-01T00:00:00+08:00",
        "encrypt_certificate": {
            "algorithm": "AEAD_AES_256_GCM",
            "nonce": NONCE,
            "associated_data": ASSOCIATED_DATA,
            "ciphertext": ciphertext
        }
    })
}

/// Platform response headers signing `body` with `key`
pub fn signature_headers(key: &str, serial: &str, body: &str) -> Vec<(&'static str, String)> {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let nonce = "5K8264ILTKCH16CQ2502SI8ZNMTM67VS";
    let signature = RsaSigner::from_pem(key)
        .unwrap()
        .sign_base64(format!("{}\n{}\n{}\n", timestamp, nonce, body).as_bytes())
        .unwrap();

    vec![
        ("Wechatpay-Timestamp", timestamp),
        ("Wechatpay-Nonce", nonce.to_string()),
        ("Wechatpay-Serial", serial.to_string()),
        ("Wechatpay-Signature", signature),
    ]
}
