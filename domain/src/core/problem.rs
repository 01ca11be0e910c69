//! Problem statement value object

use serde::{Deserialize, Serialize};

/// The problem statement driving a run (Value Object)
///
/// Captured once when the run is configured and never rewritten: every
/// phase prompt re-embeds the same original text next to whatever
/// artifact the previous phase produced, so agents always critique
/// against the user's actual ask rather than a drifted paraphrase.
/// Blank input is rejected at construction, not downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    content: String,
}

impl Problem {
    /// # Panics
    /// Panics if `content` is empty or whitespace-only. Use
    /// [`Problem::try_new`] when the input is untrusted.
    pub fn new(content: impl Into<String>) -> Self {
        Self::try_new(content).expect("Problem cannot be empty")
    }

    /// Fallible constructor for user-supplied text
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// The original statement, exactly as given (no trimming)
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Problem {
    fn from(s: &str) -> Self {
        Problem::new(s)
    }
}

impl From<String> for Problem {
    fn from(s: String) -> Self {
        Problem::new(s)
    }
}
