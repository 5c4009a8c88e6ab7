//! User-agent fingerprinting
//!
//! Classifies the host browser and OS by matching the user-agent string
//! against registered signatures. The user agent does not change for the
//! lifetime of a page, so each axis is scanned at most once per detector
//! and the resolved category (or resolved no-match) is memoized.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::registry::SignatureRegistry;

/// Stock in-app browser signatures
const BROWSER_SIGNATURES: &[(&str, &str)] = &[
    ("facebook", r"(?i)(FB4A|FBAN)"),
    ("messenger", r"(?i)(FB_IAB/Orca|FB_IAB/Messenger|FBAN/Messenger)"),
];

/// Stock OS signatures
const OS_SIGNATURES: &[(&str, &str)] = &[
    ("ios", r"(?i)(iPhone|iPad)"),
    ("android", r"(?i)(Android)"),
];

/// Memoizing user-agent classifier for one page context.
///
/// Multiple independent detectors can coexist; nothing is shared between
/// instances.
#[derive(Debug)]
pub struct Detector {
    browsers: SignatureRegistry,
    oses: SignatureRegistry,
    user_agent: String,
    browser: OnceLock<Option<String>>,
    os: OnceLock<Option<String>>,
    scans: AtomicUsize,
}

impl Detector {
    /// Detector over `user_agent`, seeded with the stock signatures
    pub fn new(user_agent: impl Into<String>) -> Self {
        let mut detector = Self::empty(user_agent);
        for (category, pattern) in BROWSER_SIGNATURES {
            detector.browsers.register(category, pattern);
        }
        for (category, pattern) in OS_SIGNATURES {
            detector.oses.register(category, pattern);
        }
        detector
    }

    /// Detector with no signatures registered
    pub fn empty(user_agent: impl Into<String>) -> Self {
        Self {
            browsers: SignatureRegistry::new(),
            oses: SignatureRegistry::new(),
            user_agent: user_agent.into(),
            browser: OnceLock::new(),
            os: OnceLock::new(),
            scans: AtomicUsize::new(0),
        }
    }

    /// Register an additional in-app browser signature.
    ///
    /// Has no effect on an axis that was already scanned; register before
    /// the first detection query.
    pub fn register_browser_pattern(&mut self, category: &str, pattern: &str) -> bool {
        self.browsers.register(category, pattern)
    }

    /// Register an additional OS signature
    pub fn register_os_pattern(&mut self, category: &str, pattern: &str) -> bool {
        self.oses.register(category, pattern)
    }

    /// Detected in-app browser category, memoized after the first scan
    pub fn browser(&self) -> Option<&str> {
        self.browser
            .get_or_init(|| self.scan(&self.browsers))
            .as_deref()
    }

    /// Detected OS category, memoized after the first scan
    pub fn os(&self) -> Option<&str> {
        self.os.get_or_init(|| self.scan(&self.oses)).as_deref()
    }

    /// True when the user agent fingerprints as a known in-app browser
    pub fn is_in_app_browser(&self) -> bool {
        self.browser().is_some()
    }

    /// True when both axes resolved, i.e. an escape can be attempted
    pub fn can_escape(&self) -> bool {
        self.browser().is_some() && self.os().is_some()
    }

    /// The user agent this detector classifies
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Number of registry scans performed so far (at most one per axis)
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    fn scan(&self, registry: &SignatureRegistry) -> Option<String> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        registry.matches(&self.user_agent).map(str::to_string)
    }
}
