use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref SIGNATURE_REGEX: Regex = Regex::new(r#"signature="[^"]*""#).unwrap();
    static ref PRIVATE_KEY_REGEX: Regex = Regex::new(
        r"-----BEGIN ((?:RSA |EC |ENCRYPTED )?PRIVATE KEY)-----[\s\S]*?-----END ((?:RSA |EC |ENCRYPTED )?PRIVATE KEY)-----"
    )
    .unwrap();
}

/// Secret redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_signatures: bool,
    pub redact_private_keys: bool,
    pub hash_for_correlation: bool,
    /// Literal values (API keys and the like) that must never reach a log
    pub secrets: Vec<String>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_signatures: true,
            redact_private_keys: true,
            hash_for_correlation: true,
            secrets: Vec::new(),
        }
    }
}

/// Masks credentials in text destined for debug traces
#[derive(Debug, Clone, Default)]
pub struct SecretRedactor {
    config: RedactionConfig,
}

impl SecretRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Register a literal secret; empty strings are ignored
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.config.secrets.push(secret);
        }
        self
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_private_keys {
            result = PRIVATE_KEY_REGEX
                .replace_all(&result, "-----BEGIN $1-----[REDACTED]-----END $2-----")
                .to_string();
        }

        if self.config.redact_signatures {
            result = self.redact_signatures(&result);
        }

        for secret in &self.config.secrets {
            if result.contains(secret.as_str()) {
                let replacement = if self.config.hash_for_correlation {
                    format!("SECRET[{}]", self.hash_value(secret))
                } else {
                    "[REDACTED]".to_string()
                };
                result = result.replace(secret.as_str(), &replacement);
            }
        }

        result
    }

    fn redact_signatures(&self, text: &str) -> String {
        SIGNATURE_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("signature=\"SIG[{}]\"", self.hash_value(&caps[0]))
                } else {
                    "signature=\"[REDACTED]\"".to_string()
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(&result[..8])
    }
}
