//! Escape strategy selection
//!
//! Maps a detected OS category onto one of the two known escape maneuvers.
//! Android exposes the `intent:` scheme, so the page can be pointed at the
//! default browser directly. WebKit on iOS has no equivalent, so the escape
//! takes a detour through the relay service and its `ftp:` redirect
//! artifact, which Safari claims from the in-app view.

/// Descriptor suffix closing out an Android intent URL
const INTENT_SUFFIX: &str = "#Intent;scheme=https;action=android.intent.action.VIEW;end;";

/// How the escape is carried out for a detected OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Rewrite the target as an Android intent URL and navigate directly
    Intent,
    /// Obtain a redirect artifact from the relay service, then navigate
    Relay,
}

impl Strategy {
    /// Strategy for a detected OS category; None when no handler exists
    pub fn for_os(os: &str) -> Option<Self> {
        match os {
            "android" => Some(Self::Intent),
            "ios" => Some(Self::Relay),
            _ => None,
        }
    }
}

/// Rewrite `target` as an Android intent URL.
///
/// The http(s) scheme is replaced with `intent:`; the appended descriptor
/// declares the original scheme and a generic VIEW action.
pub fn intent_url(target: &str) -> String {
    let rest = target
        .strip_prefix("https:")
        .or_else(|| target.strip_prefix("http:"))
        .unwrap_or(target);
    format!("intent:{rest}{INTENT_SUFFIX}")
}
