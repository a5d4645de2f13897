//! Score explanations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tree describing how a score was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// The value this node contributes.
    pub value: f64,
    /// What the value represents.
    pub message: String,
    /// The values this one was computed from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Explanation>,
}

impl Explanation {
    /// Create a leaf explanation.
    pub fn new(value: f64, message: impl Into<String>) -> Self {
        Explanation {
            value,
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// Create an explanation with children.
    pub fn with_children(value: f64, message: impl Into<String>, children: Vec<Explanation>) -> Self {
        Explanation {
            value,
            message: message.into(),
            children,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{} = {}", "", self.value, self.message, indent = depth * 2)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
