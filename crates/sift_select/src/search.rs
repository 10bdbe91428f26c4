//! Search field state
//!
//! Holds the text shown in the select's search input and whether the input
//! accepts user edits. Programmatic writes always go through, matching a form
//! control that stays writable by code while disabled for the user.

/// Text value plus interactivity flag
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchField {
    value: String,
    disabled: bool,
}

impl SearchField {
    /// Create an empty, enabled field
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Apply a user edit. Returns false (and changes nothing) while disabled.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        if self.disabled {
            return false;
        }
        self.value = text.into();
        true
    }

    /// Replace the text from code, regardless of the disabled flag
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.value = text.into();
    }

    /// Stop accepting user edits
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Accept user edits again
    pub fn enable(&mut self) {
        self.disabled = false;
    }

    /// Whether user edits are rejected
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}
