//! Cross-field rule layer — per-step validation plus derived-state
//! propagation that a per-field validator cannot express.

pub mod derive;
pub mod patterns;
pub mod validate;

use std::collections::BTreeMap;

use serde::Serialize;

pub use patterns::FieldPatterns;

/// Per-field validation messages for one step.
///
/// All rule violations are field-level; there is no form-level fatal
/// error. An empty set means the step may advance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    /// Ok when no field failed, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
