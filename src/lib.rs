//! # Eject
//!
//! Escape restrictive in-app browsers to the device's default browser.
//!
//! The embedded web views inside social apps (Facebook, Messenger and
//! friends) usually have no permission to use the camera, microphone or
//! geolocation, so pages that need those sensors dead-end there. Eject
//! fingerprints the host browser and OS from the user-agent string, decides
//! whether an escape is possible, and runs the platform's escape maneuver:
//! a direct `intent:` redirect on Android, and an indirect hand-off through
//! an external relay service on iOS, where WebKit offers no API to reach
//! the system browser.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eject::Escaper;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_3 like Mac OS X) [FBAN/FBIOS;FBAV/250.0;]";
//!     let escaper = Escaper::new(ua);
//!
//!     if escaper.can_escape() {
//!         escaper
//!             .escape_or_notify("https://example.com/call", |err| {
//!                 eprintln!("still stuck in the in-app browser: {err}");
//!             })
//!             .await;
//!     }
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use eject::{EscapeConfig, Escaper};
//!
//! let config = EscapeConfig {
//!     web_endpoint: "https://relay.example/ftpdts/data".into(),
//!     ftp_endpoint: "ftp://relay.example/".into(),
//!     wait_timeout: Duration::from_secs(3),
//!     ..Default::default()
//! };
//!
//! let escaper = Escaper::with_config("<user agent>", config);
//! ```
//!
//! Detection is extensible at runtime: register additional signatures with
//! [`Escaper::register_browser_pattern`] and [`Escaper::register_os_pattern`]
//! before the first detection query.

use std::time::Duration;

pub mod detect;
pub mod error;
pub mod escape;
pub mod navigate;
pub mod policy;
pub mod registry;
pub mod relay;

// Re-exports
pub use detect::Detector;
pub use error::{Error, Result};
pub use escape::{EscapeOutcome, Escaper};
pub use navigate::{Navigator, SystemNavigator};
pub use policy::Strategy;
pub use registry::SignatureRegistry;
pub use relay::{RelayClient, RelayEnvelope};

/// Configuration for the escape pipeline
#[derive(Debug, Clone)]
pub struct EscapeConfig {
    /// FTP endpoint prefix the relay's redirect artifact is served from
    pub ftp_endpoint: String,
    /// Relay web API endpoint receiving redirect submissions
    pub web_endpoint: String,
    /// How long to wait for the context to leave before reporting failure
    pub wait_timeout: Duration,
    /// Caption shown on the relay's temporary redirect page
    pub caption: String,
    /// Bearer token for authenticated relay variants
    pub auth_token: Option<String>,
    /// Emit a trace line at every decision point
    pub debug: bool,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            ftp_endpoint: "ftp://geo.mylocator.app/".into(),
            web_endpoint: "https://geo.mylocator.app/ftpdts/data".into(),
            wait_timeout: Duration::from_millis(5000),
            caption: "This is a temporary redirect page. If you see that, \
                      inform the site administrator about this"
                .into(),
            auth_token: None,
            debug: false,
        }
    }
}
