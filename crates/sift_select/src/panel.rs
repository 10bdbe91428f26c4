//! Floating panel: template and positioning
//!
//! A [`PanelTemplate`] instantiates the panel's root element in the
//! document. A [`PositionEngine`] binds that element to the trigger and keeps
//! it placed; the resulting [`PositionBinding`] lives exactly as long as the
//! panel is open.
//!
//! # Example
//!
//! ```rust
//! use sift_core::{ElementTree, Rect};
//! use sift_select::panel::{panel_template, AnchorBelow, PositionEngine};
//!
//! let mut tree = ElementTree::new();
//! let trigger = tree.create(Rect::new(20.0, 40.0, 240.0, 32.0));
//! tree.append_child(tree.body(), trigger);
//!
//! let template = panel_template(|tree| tree.create(Rect::new(0.0, 0.0, 0.0, 160.0)));
//! let panel = template(&mut tree);
//! tree.append_child(tree.body(), panel);
//!
//! let binding = AnchorBelow::new(4.0).attach(&mut tree, trigger, panel);
//! assert_eq!(tree.bounds(panel).map(|b| (b.x, b.y)), Some((20.0, 76.0)));
//! binding.destroy(&mut tree);
//! ```

use std::sync::Arc;

use sift_core::{ElementId, ElementTree};
use tracing::trace;

use crate::config::DEFAULT_PANEL_OFFSET;

/// Builds the panel's root element (detached) and returns its id
pub type PanelTemplate = Arc<dyn Fn(&mut ElementTree) -> ElementId + Send + Sync>;

/// Wrap a closure as a [`PanelTemplate`]
pub fn panel_template<F>(f: F) -> PanelTemplate
where
    F: Fn(&mut ElementTree) -> ElementId + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A live link between a reference element and a floating element
pub trait PositionBinding: Send {
    /// The element the floating surface is anchored to
    fn reference(&self) -> ElementId;

    /// The floating surface
    fn floating(&self) -> ElementId;

    /// Recompute placement (after scroll, layout or resize)
    fn update(&mut self, tree: &mut ElementTree);

    /// Tear the binding down
    fn destroy(self: Box<Self>, tree: &mut ElementTree);
}

/// Creates position bindings
pub trait PositionEngine: Send + Sync {
    /// Anchor `floating` to `reference` and place it immediately
    fn attach(
        &self,
        tree: &mut ElementTree,
        reference: ElementId,
        floating: ElementId,
    ) -> Box<dyn PositionBinding>;
}

/// Places the floating element directly below the reference, left-aligned
#[derive(Clone, Copy, Debug)]
pub struct AnchorBelow {
    offset: f32,
}

impl Default for AnchorBelow {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_OFFSET)
    }
}

impl AnchorBelow {
    /// Create an engine with a vertical gap of `offset` pixels
    pub fn new(offset: f32) -> Self {
        Self { offset }
    }
}

impl PositionEngine for AnchorBelow {
    fn attach(
        &self,
        tree: &mut ElementTree,
        reference: ElementId,
        floating: ElementId,
    ) -> Box<dyn PositionBinding> {
        let mut binding = Box::new(AnchoredBinding {
            reference,
            floating,
            offset: self.offset,
        });
        binding.update(tree);
        binding
    }
}

#[derive(Debug)]
struct AnchoredBinding {
    reference: ElementId,
    floating: ElementId,
    offset: f32,
}

impl PositionBinding for AnchoredBinding {
    fn reference(&self) -> ElementId {
        self.reference
    }

    fn floating(&self) -> ElementId {
        self.floating
    }

    fn update(&mut self, tree: &mut ElementTree) {
        let Some(anchor) = tree.bounds(self.reference) else {
            return;
        };
        tree.set_position(self.floating, anchor.x, anchor.bottom() + self.offset);
    }

    fn destroy(self: Box<Self>, _tree: &mut ElementTree) {
        trace!(reference = ?self.reference, floating = ?self.floating, "anchor released");
    }
}
