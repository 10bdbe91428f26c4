//! Element tree - the headless stand-in for a document
//!
//! Widgets never touch a real rendering surface. Instead they create,
//! attach and remove nodes in an [`ElementTree`], which keeps parent/child
//! links and a bounding rectangle per node. The tree always has a `body`
//! root; floating surfaces are appended there so they escape the layout
//! parent of whatever triggered them.
//!
//! # Example
//!
//! ```rust
//! use sift_core::element::ElementTree;
//! use sift_core::geometry::Rect;
//!
//! let mut tree = ElementTree::new();
//! let form = tree.create(Rect::new(0.0, 0.0, 300.0, 200.0));
//! tree.append_child(tree.body(), form);
//!
//! let trigger = tree.create(Rect::new(10.0, 10.0, 240.0, 32.0));
//! tree.append_child(form, trigger);
//!
//! assert!(tree.contains(form, trigger));
//! assert!(!tree.contains(trigger, form));
//! ```

use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use crate::geometry::Rect;

new_key_type! {
    pub struct ElementId;
}

impl ElementId {
    /// Convert to a raw u64 representation
    ///
    /// Useful for error messages and type-erased storage.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation produced by `to_raw()`
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<ElementId>,
    children: SmallVec<[ElementId; 4]>,
    bounds: Rect,
}

/// Arena of elements with parent/child links
#[derive(Debug)]
pub struct ElementTree {
    nodes: SlotMap<ElementId, Node>,
    body: ElementId,
}

/// Element tree shared between a host and the widgets mounted in it
pub type SharedElementTree = Arc<Mutex<ElementTree>>;

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    /// Create a tree containing only the body element
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            parent: None,
            children: SmallVec::new(),
            bounds: Rect::default(),
        });
        Self { nodes, body }
    }

    /// Create a shared tree
    pub fn shared() -> SharedElementTree {
        Arc::new(Mutex::new(Self::new()))
    }

    /// The permanent root element
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element
    pub fn create(&mut self, bounds: Rect) -> ElementId {
        self.nodes.insert(Node {
            parent: None,
            children: SmallVec::new(),
            bounds,
        })
    }

    /// Check whether an element exists
    pub fn exists(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live elements, body included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the body cannot be removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` as the last child of `parent`
    ///
    /// The child is detached from its previous parent first. Returns false
    /// when either id is unknown, when `child` is the body, or when the move
    /// would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.exists(parent) || !self.exists(child) || child == self.body {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Unlink an element from its parent, keeping its subtree alive
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    /// Remove an element and its whole subtree
    ///
    /// Returns the number of elements removed. Removing an unknown id or the
    /// body removes nothing.
    pub fn remove(&mut self, id: ElementId) -> usize {
        if id == self.body || !self.exists(id) {
            return 0;
        }
        self.detach(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Parent of an element
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children of an element, in insertion order
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// True when `node` is `ancestor` itself or one of its descendants
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        if !self.exists(ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// True when the element is reachable from the body
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.exists(id) && self.contains(self.body, id)
    }

    /// Bounding rectangle of an element
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.bounds)
    }

    /// Replace the bounding rectangle of an element
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Set only the width of an element
    pub fn set_width(&mut self, id: ElementId, width: f32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.bounds.width = width;
                true
            }
            None => false,
        }
    }

    /// Move an element without resizing it
    pub fn set_position(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.bounds.x = x;
                node.bounds.y = y;
                true
            }
            None => false,
        }
    }
}
