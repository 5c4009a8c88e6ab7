//! Integration tests for the escape pipeline
//!
//! The relay service is mocked with wiremock; navigation is observed
//! through a recording navigator instead of a real page context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eject::{EscapeConfig, EscapeOutcome, Error, Escaper, Navigator, RelayClient, Result};

const FB_IOS_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_3 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) [FBAN/FBIOS;FBAV/250.0.0.36;FBDV/iPhone11,8]";
const FB_ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 10; SM-G960F) \
    AppleWebKit/537.36 (KHTML, like Gecko) [FB_IAB/FB4A;FBAV/239.0.0.41;]";

/// Navigator that records hand-offs and optionally departs right away
#[derive(Default)]
struct RecordingNavigator {
    depart_on_navigate: bool,
    target: Mutex<Option<String>>,
    departed: AtomicBool,
}

impl RecordingNavigator {
    fn departing() -> Arc<Self> {
        Arc::new(Self {
            depart_on_navigate: true,
            ..Self::default()
        })
    }

    fn target(&self) -> Option<String> {
        self.target.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        *self.target.lock().unwrap() = Some(url.to_string());
        if self.depart_on_navigate {
            self.departed.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn departed(&self) -> bool {
        self.departed.load(Ordering::SeqCst)
    }
}

/// Config pointed at a mock relay, with a short wait and a fixed caption
fn relay_config(server: &MockServer) -> EscapeConfig {
    EscapeConfig {
        web_endpoint: format!("{}/ftpdts/data", server.uri()),
        ftp_endpoint: "ftp://relay.example/".into(),
        caption: "temporary redirect".into(),
        wait_timeout: Duration::from_millis(500),
        ..EscapeConfig::default()
    }
}

#[tokio::test]
async fn ios_escape_navigates_to_relay_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .and(body_json(json!({
            "Url": "https://example.com/call",
            "Caption": "temporary redirect",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "uid": "abc123",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_IOS_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let outcome = escaper.escape("https://example.com/call").await.unwrap();
    assert_eq!(outcome, EscapeOutcome::Departed);
    assert_eq!(
        navigator.target().as_deref(),
        Some("ftp://relay.example/abc123.html")
    );
}

#[tokio::test]
async fn ios_escape_fails_on_nonzero_relay_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 1 })))
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_IOS_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let err = escaper.escape("https://example.com/call").await.unwrap_err();
    assert!(matches!(err, Error::Protocol { code: Some(1), .. }));
    assert_eq!(navigator.target(), None);
}

#[tokio::test]
async fn ios_escape_fails_when_relay_omits_uid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0 })))
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_IOS_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let err = escaper.escape("https://example.com/call").await.unwrap_err();
    assert!(matches!(err, Error::Protocol { code: Some(0), .. }));
    assert_eq!(navigator.target(), None);
}

#[tokio::test]
async fn ios_escape_fails_on_non_json_relay_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_IOS_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let err = escaper.escape("https://example.com/call").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.is_relay());
    assert_eq!(navigator.target(), None);
}

#[tokio::test]
async fn relay_client_sends_bearer_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .and(header("authorization", "Bearer seekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "uid": "tok1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RelayClient::new(format!("{}/ftpdts/data", server.uri())).with_token("seekrit");
    let envelope = client
        .submit("https://example.com/", "temporary redirect")
        .await
        .unwrap();
    assert_eq!(envelope.uid.as_deref(), Some("tok1"));
}

#[tokio::test]
async fn android_escape_does_not_touch_the_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0 })))
        .expect(0)
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_ANDROID_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let outcome = escaper.escape("https://example.com/page").await.unwrap();
    assert_eq!(outcome, EscapeOutcome::Departed);
    let target = navigator.target().unwrap();
    assert!(target.starts_with("intent://example.com/page#Intent;"));
    assert!(target.contains("scheme=https"));
    assert!(target.contains("action=android.intent.action.VIEW"));
    assert!(target.ends_with("end;"));
}

#[tokio::test]
async fn escape_or_notify_routes_relay_failure_to_callback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ftpdts/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 7 })))
        .mount(&server)
        .await;

    let navigator = RecordingNavigator::departing();
    let escaper = Escaper::with_config(FB_IOS_UA, relay_config(&server))
        .with_navigator(navigator.clone() as Arc<dyn Navigator>);

    let seen = Mutex::new(None);
    escaper
        .escape_or_notify("https://example.com/call", |err| {
            *seen.lock().unwrap() = Some(err);
        })
        .await;

    let err = seen.lock().unwrap().take().expect("callback not invoked");
    assert!(matches!(err, Error::Protocol { code: Some(7), .. }));
}

#[tokio::test]
async fn runtime_registered_os_reaches_the_unsupported_error() {
    // A category registered at runtime is detected, but having no escape
    // handler it fails synchronously with no navigation and no wait.
    let wp_ua = "Mozilla/5.0 (Windows Phone 8.0; IEMobile/10.0) [FBAN/WindowsPhone]";
    let navigator = RecordingNavigator::departing();
    let mut escaper =
        Escaper::new(wp_ua).with_navigator(navigator.clone() as Arc<dyn Navigator>);
    assert!(escaper.register_os_pattern("windows-phone", r"(?i)Windows Phone"));

    assert_eq!(escaper.detect_os(), Some("windows-phone"));
    assert!(escaper.can_escape());

    let err = escaper.escape("https://example.com/").await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedOs(ref os) if os == "windows-phone"));
    assert_eq!(navigator.target(), None);
}
