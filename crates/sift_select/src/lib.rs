//! Sift Select
//!
//! A searchable dropdown ("combobox") that stays responsive with very large
//! option lists:
//!
//! - **Filtering**: case-sensitive substring search, always recomputed from
//!   the original option list, debounced while the user types
//! - **Floating panel**: mounted on the document body, matched to the
//!   trigger's width and anchored below it by a [`PositionEngine`]
//! - **Dismissal**: outside clicks (listened for only while open), window
//!   resizes, picks, or an explicit `close()`
//! - **Form binding**: the [`FormControl`] protocol (write value, change and
//!   touched callbacks, disabled toggle)
//! - **Virtualization**: [`VirtualViewport`] works out the slice of the
//!   filtered view to render
//!
//! See [`select()`] for a complete example.

pub mod config;
pub mod error;
pub mod form;
pub mod option;
pub mod panel;
pub mod search;
pub mod select;
pub mod viewport;

pub use config::{ConfigError, SelectConfig};
pub use error::{Result, SelectError};
pub use form::{ChangeCallback, FormControl, TouchedCallback};
pub use option::{OptionStore, SelectOption};
pub use panel::{panel_template, AnchorBelow, PanelTemplate, PositionBinding, PositionEngine};
pub use search::SearchField;
pub use select::{select, PanelState, Select, SelectBuilder, SelectEnv};
pub use viewport::VirtualViewport;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SelectConfig;
    pub use crate::form::FormControl;
    pub use crate::option::SelectOption;
    pub use crate::panel::{panel_template, PanelTemplate};
    pub use crate::select::{select, PanelState, Select, SelectEnv};
    pub use crate::viewport::VirtualViewport;
}
