use mockito::Matcher;
use signed_http::{ClientConfig, HttpError, SignedHttpClient};
use std::io;
use std::sync::{Arc, Mutex};
use url::Url;

const MERCHANT_KEY: &str = include_str!("../../fixtures/merchant_key.pem");
const API_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Collects formatted trace output
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn client_for(base: &str) -> SignedHttpClient {
    SignedHttpClient::new(ClientConfig {
        merchant_id: "1900000001".to_string(),
        serial_no: "MERCHANTSERIAL".to_string(),
        private_key_pem: MERCHANT_KEY.to_string(),
        base_uri: Url::parse(&format!("{}/", base)).unwrap(),
        debug: true,
        redact_secrets: vec![API_KEY.to_string()],
    })
    .unwrap()
}

#[tokio::test]
async fn test_get_sends_signed_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/certificates")
        .match_header(
            "authorization",
            Matcher::Regex(
                r#"^WECHATPAY2-SHA256-RSA2048 mchid="1900000001",nonce_str="[A-Za-z0-9]{32}",signature="[^"]+",timestamp="\d+",serial_no="MERCHANTSERIAL"$"#
                    .to_string(),
            ),
        )
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("Wechatpay-Serial", "ABC123")
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let response = client.get("v3/certificates").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"data":[]}"#);
    assert_eq!(response.header("wechatpay-serial"), Some("ABC123"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_keeps_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v3/certificates")
        .with_status(401)
        .with_body(r#"{"code":"SIGN_ERROR","message":"signature mismatch"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let err = client.get("v3/certificates").await.unwrap_err();

    match &err {
        HttpError::Status { status, body } => {
            assert_eq!(*status, 401);
            assert!(body.contains("SIGN_ERROR"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.response_body(),
        Some(r#"{"code":"SIGN_ERROR","message":"signature mismatch"}"#)
    );
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = client_for("http://127.0.0.1:1");
    let err = client.get("v3/certificates").await.unwrap_err();

    assert!(matches!(err, HttpError::Network(_)));
    assert!(err.response_body().is_none());
}

#[test]
fn test_url_resolution() {
    let client = client_for("https://api.mch.weixin.qq.com");
    let url = client.url_for("v3/certificates").unwrap();
    assert_eq!(url.as_str(), "https://api.mch.weixin.qq.com/v3/certificates");
}

#[tokio::test]
async fn test_debug_traces_hide_secrets() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v3/certificates")
        .with_status(200)
        .with_header("X-Echo", API_KEY)
        .with_body(format!(r#"{{"echo":"{}"}}"#, API_KEY))
        .create_async()
        .await;

    client_for(&server.url()).get("v3/certificates").await.unwrap();

    let traced = logs.contents();
    assert!(traced.contains("dispatching signed request"));
    assert!(traced.contains("received response"));
    assert!(!traced.contains(API_KEY));

    let signatures: Vec<&str> = traced.split("signature=\"").skip(1).collect();
    assert!(!signatures.is_empty());
    assert!(signatures.iter().all(|rest| rest.starts_with("SIG[")));
}
