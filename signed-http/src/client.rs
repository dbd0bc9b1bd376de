use crate::error::{HttpError, Result};
use crate::response::RawResponse;
use crate::signer::RequestSigner;
use logger_redacted::SecretRedactor;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::debug;
use url::Url;

/// Connection and identity settings for [`SignedHttpClient`]
#[derive(Clone)]
pub struct ClientConfig {
    pub merchant_id: String,
    pub serial_no: String,
    pub private_key_pem: String,
    pub base_uri: Url,
    /// Trace requests and responses at debug level
    pub debug: bool,
    /// Literal values masked in those traces, e.g. the API key
    pub redact_secrets: Vec<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("merchant_id", &self.merchant_id)
            .field("serial_no", &self.serial_no)
            .field("private_key_pem", &"[REDACTED]")
            .field("base_uri", &self.base_uri.as_str())
            .field("debug", &self.debug)
            .field("redact_secrets", &self.redact_secrets.len())
            .finish()
    }
}

/// HTTP client that signs every request with the merchant key
///
/// Transport, TLS and timeouts are reqwest's defaults; nothing is retried.
#[derive(Debug)]
pub struct SignedHttpClient {
    http: reqwest::Client,
    base_uri: Url,
    signer: RequestSigner,
    redactor: SecretRedactor,
    debug: bool,
}

impl SignedHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let signer = RequestSigner::new(&config.merchant_id, &config.serial_no, &config.private_key_pem)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("signed-http/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_uri: config.base_uri,
            signer,
            redactor: config
                .redact_secrets
                .into_iter()
                .fold(SecretRedactor::default(), SecretRedactor::with_secret),
            debug: config.debug,
        })
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Resolve `path` against the base URI
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_uri
            .join(path)
            .map_err(|e| HttpError::Configuration(format!("Invalid request path {}: {}", path, e)))
    }

    /// Issue a signed GET and buffer the response
    ///
    /// Non-2xx answers become [`HttpError::Status`] carrying the body.
    pub async fn get(&self, path: &str) -> Result<RawResponse> {
        let url = self.url_for(path)?;
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let authorization = self.signer.authorization("GET", &path_and_query, "")?;

        if self.debug {
            debug!(
                method = "GET",
                url = %url,
                authorization = %self.redactor.redact(&authorization),
                "dispatching signed request"
            );
        }

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.debug {
            debug!(
                status = status.as_u16(),
                url = %url,
                headers = %self.redactor.redact(&format!("{:?}", headers)),
                body = %self.redactor.redact(&body),
                "received response"
            );
        }

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse::new(status.as_u16(), headers, body))
    }
}
