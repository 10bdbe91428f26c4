//! Sift Core
//!
//! Headless building blocks for interactive widgets:
//!
//! - **Element Tree**: an in-memory document with parent/child links and
//!   bounds, so widgets can mount floating surfaces without a renderer
//! - **Events**: document-level click/resize dispatch behind the
//!   [`InteractionNotifier`] capability
//! - **Emitters**: typed fan-out with subscription handles
//! - **Debouncing**: clock-agnostic coalescing of bursty input, with
//!   injectable [`Clock`]s
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sift_core::{Event, EventDispatcher, EventKind, InteractionNotifier};
//! use sift_core::element::ElementTree;
//!
//! let dispatcher = EventDispatcher::new();
//! let tree = ElementTree::new();
//!
//! let id = dispatcher.subscribe(EventKind::Click, Arc::new(|event| {
//!     println!("clicked: {:?}", event);
//! }));
//!
//! dispatcher.dispatch(&Event::Click { target: tree.body() });
//! dispatcher.unsubscribe(id);
//! ```

pub mod clock;
pub mod debounce;
pub mod element;
pub mod emitter;
pub mod events;
pub mod geometry;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
pub use element::{ElementId, ElementTree, SharedElementTree};
pub use emitter::{Emitter, Listener, SubscriptionHandle};
pub use events::{
    Event, EventDispatcher, EventHandler, EventKind, InteractionNotifier, ListenerId,
};
pub use geometry::Rect;
