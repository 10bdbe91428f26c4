//! Form-control binding
//!
//! The host framework drives a widget through four calls: push a value,
//! register a change callback, register a touched callback, and toggle
//! disabled. Anything implementing [`FormControl`] can sit in a host form.

use std::sync::Arc;

use crate::option::SelectOption;

/// Invoked with the newly picked option
pub type ChangeCallback<K> = Arc<dyn Fn(&SelectOption<K>) + Send + Sync>;

/// Invoked when the control should be marked as interacted-with
pub type TouchedCallback = Arc<dyn Fn() + Send + Sync>;

/// The contract between a host form and a control
pub trait FormControl<K> {
    /// Push a value (by key) from the host. Unknown keys clear the selection.
    /// The search text follows the new selection.
    fn write_value(&self, key: Option<K>);

    /// Register the callback run on every user selection
    fn register_on_change(&self, callback: ChangeCallback<K>);

    /// Register the callback run when the control is touched
    fn register_on_touched(&self, callback: TouchedCallback);

    /// Enable or disable user input
    fn set_disabled(&self, disabled: bool);
}
