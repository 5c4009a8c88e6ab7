//! Navigation seam
//!
//! The active page location is an opaque collaborator owned by the hosting
//! environment, so the escaper talks to it through the `Navigator` trait.
//! `departed` is an explicit navigation-occurred signal: the wait loop in
//! the orchestrator polls it instead of relying on the environment tearing
//! the timer down together with the page.

use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

/// Hand-off point to the hosting environment's navigation facility
pub trait Navigator: Send + Sync {
    /// Point the current context at `url`. Fire-and-forget; a silently
    /// dropped hand-off is caught later by the departure wait.
    fn navigate(&self, url: &str) -> Result<()>;

    /// True once navigation away from the current context was observed
    fn departed(&self) -> bool;
}

/// Best-effort system browser opener for native embeddings.
///
/// Hands the URL to the platform's default opener and treats a successful
/// launch as departure.
#[derive(Debug, Default)]
pub struct SystemNavigator {
    departed: AtomicBool,
}

impl SystemNavigator {
    /// Create a navigator that has not departed yet
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        if open_system_browser(url) {
            self.departed.store(true, Ordering::SeqCst);
        } else {
            // Leave `departed` false; the orchestrator's wait turns the
            // silent refusal into a timeout.
            tracing::warn!(url, "system browser refused the hand-off");
        }
        Ok(())
    }

    fn departed(&self) -> bool {
        self.departed.load(Ordering::SeqCst)
    }
}

/// Launch `url` in the platform's default browser
fn open_system_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        return Command::new("open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(target_os = "windows")]
    {
        return Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        return Command::new("xdg-open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[allow(unreachable_code)]
    false
}
