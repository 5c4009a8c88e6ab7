//! Escape orchestration
//!
//! The public entry point. Fingerprints the context, picks the strategy
//! for the detected OS, initiates navigation, then waits for the explicit
//! departure signal. An escape that never leaves the page within the
//! configured window is reported as a timeout.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::detect::Detector;
use crate::error::{Error, Result};
use crate::navigate::{Navigator, SystemNavigator};
use crate::policy::{intent_url, Strategy};
use crate::relay::RelayClient;
use crate::EscapeConfig;

/// Departure poll interval
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What an escape attempt amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// Detection did not resolve both axes; no attempt was made.
    ///
    /// Distinct from every error: an undetected context is not a failed
    /// escape, it is an escape that never started.
    Skipped,
    /// Navigation away from the current context was observed
    Departed,
}

/// Orchestrates detection, strategy selection and the escape itself
pub struct Escaper {
    config: EscapeConfig,
    detector: Detector,
    relay: RelayClient,
    navigator: Arc<dyn Navigator>,
}

impl Escaper {
    /// Escaper over `user_agent` with the default config and the system
    /// browser as navigation seam
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_config(user_agent, EscapeConfig::default())
    }

    /// Escaper with a custom config
    pub fn with_config(user_agent: impl Into<String>, config: EscapeConfig) -> Self {
        let mut relay = RelayClient::new(&config.web_endpoint);
        if let Some(token) = &config.auth_token {
            relay = relay.with_token(token);
        }
        Self {
            detector: Detector::new(user_agent),
            relay,
            navigator: Arc::new(SystemNavigator::new()),
            config,
        }
    }

    /// Replace the navigation seam (embedders, tests)
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Toggle decision-point tracing. Diagnostic only; no effect on
    /// control flow.
    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug = enabled;
    }

    /// Register an additional in-app browser signature
    pub fn register_browser_pattern(&mut self, category: &str, pattern: &str) -> bool {
        self.detector.register_browser_pattern(category, pattern)
    }

    /// Register an additional OS signature
    pub fn register_os_pattern(&mut self, category: &str, pattern: &str) -> bool {
        self.detector.register_os_pattern(category, pattern)
    }

    /// Detected in-app browser category
    pub fn detect_browser(&self) -> Option<&str> {
        self.detector.browser()
    }

    /// Detected OS category
    pub fn detect_os(&self) -> Option<&str> {
        self.detector.os()
    }

    /// True when the context fingerprints as a known in-app browser
    pub fn is_in_app_browser(&self) -> bool {
        self.detector.is_in_app_browser()
    }

    /// True when both browser and OS resolved, i.e. an escape can be
    /// attempted
    pub fn can_escape(&self) -> bool {
        self.detector.can_escape()
    }

    /// Attempt to escape to the default browser, landing on `url`.
    ///
    /// Returns `Skipped` without attempting anything when detection does
    /// not resolve. Otherwise runs the strategy for the detected OS and
    /// waits up to the configured window for departure. All failures are
    /// terminal; retrying is the caller's decision.
    pub async fn escape(&self, url: &str) -> Result<EscapeOutcome> {
        let (Some(browser), Some(os)) = (self.detector.browser(), self.detector.os()) else {
            self.trace(format_args!(
                "browser or OS did not resolve, not attempting escape"
            ));
            return Ok(EscapeOutcome::Skipped);
        };

        self.trace(format_args!(
            "trying to escape from {browser} in-app browser to {os} default browser with url: {url}"
        ));

        let strategy =
            Strategy::for_os(os).ok_or_else(|| Error::UnsupportedOs(os.to_string()))?;

        match strategy {
            Strategy::Intent => {
                let intent = intent_url(url);
                self.trace(format_args!("intent hand-off: {intent}"));
                self.navigator.navigate(&intent)?;
            }
            Strategy::Relay => {
                let envelope = self.relay.submit(url, &self.config.caption).await?;
                let uid = match envelope.uid {
                    Some(uid) if !uid.is_empty() => uid,
                    _ => {
                        return Err(Error::protocol(
                            envelope.code,
                            "relay response carried no uid",
                        ))
                    }
                };
                let artifact = format!("{}{}.html", self.config.ftp_endpoint, uid);
                self.trace(format_args!("relay artifact hand-off: {artifact}"));
                self.navigator.navigate(&artifact)?;
            }
        }

        self.wait_for_departure().await
    }

    /// Like [`escape`](Self::escape), but routes failures to `on_failure`
    /// instead of returning them.
    ///
    /// An undetected context invokes nothing: no attempt was made, so
    /// there is no failure to report.
    pub async fn escape_or_notify(&self, url: &str, on_failure: impl FnOnce(Error)) {
        if let Err(err) = self.escape(url).await {
            tracing::warn!(%err, "escape failed");
            on_failure(err);
        }
    }

    /// Poll the navigator's departure signal until it fires or the wait
    /// window closes
    async fn wait_for_departure(&self) -> Result<EscapeOutcome> {
        let start = Instant::now();
        loop {
            if self.navigator.departed() {
                self.trace(format_args!("departure observed, escape complete"));
                return Ok(EscapeOutcome::Departed);
            }
            if start.elapsed() > self.config.wait_timeout {
                return Err(Error::Timeout(self.config.wait_timeout));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.config.debug {
            tracing::debug!("{message}");
        }
    }
}
