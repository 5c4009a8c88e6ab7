//! User-agent signature registry
//!
//! Ordered mapping from a category name (an open string set, not an enum)
//! to a list of compiled patterns. Callers extend it at runtime; there is
//! no removal.

use regex::Regex;

/// One category and its patterns, in registration order
#[derive(Debug, Clone)]
struct Category {
    name: String,
    patterns: Vec<Regex>,
}

/// Ordered registry of (category, pattern) signatures
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    categories: Vec<Category>,
}

impl SignatureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern under a category.
    ///
    /// Returns false (and logs) when the category or pattern is empty, or
    /// when the pattern does not compile. Patterns accumulate in
    /// registration order; a new category appends after existing ones.
    pub fn register(&mut self, category: &str, pattern: &str) -> bool {
        if category.is_empty() || pattern.is_empty() {
            tracing::warn!("register: missing category or pattern");
            return false;
        }

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                tracing::warn!(category, %err, "register: pattern does not compile");
                return false;
            }
        };

        match self.categories.iter_mut().find(|c| c.name == category) {
            Some(category) => category.patterns.push(regex),
            None => self.categories.push(Category {
                name: category.to_string(),
                patterns: vec![regex],
            }),
        }

        true
    }

    /// First category with a pattern matching `input`, in registration order
    pub fn matches(&self, input: &str) -> Option<&str> {
        for category in &self.categories {
            for pattern in &category.patterns {
                if pattern.is_match(input) {
                    return Some(&category.name);
                }
            }
        }
        None
    }

    /// Number of registered categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
