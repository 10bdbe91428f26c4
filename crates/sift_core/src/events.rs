//! Document-level events and the interaction notifier
//!
//! Hosts translate platform input into [`Event`]s and hand them to an
//! [`EventDispatcher`]. Widgets never install global listeners on their own;
//! they are given an [`InteractionNotifier`] and subscribe only for as long
//! as they need to observe clicks or resizes.

use std::sync::Arc;

use tracing::trace;

use crate::element::ElementId;
use crate::emitter::{Emitter, SubscriptionHandle};

/// Input delivered at document level
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A click landed on `target` (the innermost element under the pointer)
    Click { target: ElementId },
    /// The window was resized
    Resize { width: f32, height: f32 },
}

impl Event {
    /// The kind used to route this event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Event routing key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Resize,
}

/// Handler invoked for each routed event
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Identifies one subscription made through an [`InteractionNotifier`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId {
    kind: EventKind,
    handle: SubscriptionHandle,
}

impl ListenerId {
    /// The event kind this listener receives
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Capability for observing document-level interaction
///
/// Handlers may unsubscribe themselves (or others) from inside a
/// notification.
pub trait InteractionNotifier: Send + Sync {
    /// Start receiving events of `kind`
    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> ListenerId;

    /// Stop receiving events. Returns false if the listener was already gone.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Number of live listeners for `kind`
    fn listener_count(&self, kind: EventKind) -> usize;
}

/// The document-level [`InteractionNotifier`]
#[derive(Debug, Default)]
pub struct EventDispatcher {
    clicks: Emitter<Event>,
    resizes: Emitter<Event>,
}

impl EventDispatcher {
    /// Create a dispatcher with empty click and resize channels
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, kind: EventKind) -> &Emitter<Event> {
        match kind {
            EventKind::Click => &self.clicks,
            EventKind::Resize => &self.resizes,
        }
    }

    /// Create a shared dispatcher
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Deliver an event to every listener of its kind
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let called = self.channel(event.kind()).emit(event);
        trace!(?event, called, "dispatched");
        called
    }
}

impl InteractionNotifier for EventDispatcher {
    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> ListenerId {
        let handle = self
            .channel(kind)
            .subscribe(move |event| handler(event));
        ListenerId { kind, handle }
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.channel(id.kind).unsubscribe(id.handle)
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.channel(kind).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementTree;
    use crate::geometry::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, EventHandler) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let handler: EventHandler = Arc::new(move |_: &Event| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn test_events_route_by_kind() {
        let dispatcher = EventDispatcher::new();
        let mut tree = ElementTree::new();
        let target = tree.create(Rect::default());

        let (clicks, on_click) = counter();
        let (resizes, on_resize) = counter();
        dispatcher.subscribe(EventKind::Click, on_click);
        dispatcher.subscribe(EventKind::Resize, on_resize);

        dispatcher.dispatch(&Event::Click { target });
        dispatcher.dispatch(&Event::Click { target });
        dispatcher.dispatch(&Event::Resize {
            width: 800.0,
            height: 600.0,
        });

        assert_eq!(clicks.load(Ordering::SeqCst), 2);
        assert_eq!(resizes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let id = dispatcher.subscribe(EventKind::Resize, handler);
        assert_eq!(id.kind(), EventKind::Resize);
        assert_eq!(dispatcher.listener_count(EventKind::Resize), 1);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.listener_count(EventKind::Resize), 0);

        let delivered = dispatcher.dispatch(&Event::Resize {
            width: 1.0,
            height: 1.0,
        });
        assert_eq!(delivered, 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_event_kind() {
        let tree = ElementTree::new();
        assert_eq!(
            Event::Click {
                target: tree.body()
            }
            .kind(),
            EventKind::Click
        );
        assert_eq!(
            Event::Resize {
                width: 0.0,
                height: 0.0
            }
            .kind(),
            EventKind::Resize
        );
    }
}
