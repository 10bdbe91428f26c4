//! Select component - searchable, virtualized dropdown
//!
//! A select owns an [`OptionStore`], the current selection, a search field
//! with debounced filtering, and the lifecycle of a floating panel. The panel
//! is appended to the document body, sized to the trigger's width and
//! anchored below it through a [`PositionEngine`]. While the panel is open
//! (and only then) the select listens for clicks outside the trigger and
//! closes itself when one arrives. Window resizes also close it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sift_core::{ElementTree, EventDispatcher, ManualClock, Rect};
//! use sift_select::panel::panel_template;
//! use sift_select::{select, SelectEnv};
//!
//! let document = ElementTree::shared();
//! let dispatcher = EventDispatcher::shared();
//! let trigger = {
//!     let mut doc = document.lock().unwrap();
//!     let trigger = doc.create(Rect::new(0.0, 0.0, 240.0, 32.0));
//!     let body = doc.body();
//!     doc.append_child(body, trigger);
//!     trigger
//! };
//!
//! let env = SelectEnv::new(document.clone(), dispatcher.clone())
//!     .clock(Arc::new(ManualClock::new()));
//!
//! let numbers = select::<u32>()
//!     .option(1, "hi 1")
//!     .option(2, "hi 2")
//!     .option(22, "hi 22")
//!     .placeholder("Pick one")
//!     .initial(2)
//!     .on_change(|option| println!("picked {}", option.value))
//!     .build(env)
//!     .unwrap();
//!
//! assert_eq!(numbers.selection().map(|o| o.key), Some(2));
//!
//! let panel = panel_template(|doc| doc.create(Rect::new(0.0, 0.0, 0.0, 128.0)));
//! numbers.open(&panel, trigger).unwrap();
//! numbers.select_index(0);
//! assert!(!numbers.is_open());
//! ```

use std::fmt;
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use sift_core::{
    Debouncer, ElementId, ElementTree, Emitter, Event, EventKind, InteractionNotifier,
    ListenerId, SharedClock, SharedElementTree, SubscriptionHandle, SystemClock,
};
use tracing::{debug, trace, warn};

use crate::config::SelectConfig;
use crate::error::{Result, SelectError};
use crate::form::{ChangeCallback, FormControl, TouchedCallback};
use crate::option::{OptionStore, SelectOption};
use crate::panel::{AnchorBelow, PanelTemplate, PositionBinding, PositionEngine};
use crate::search::SearchField;

/// Panel lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CloseReason {
    Explicit,
    Selection,
    OutsideClick,
    Resize,
}

/// Collaborators a select needs from its host
#[derive(Clone)]
pub struct SelectEnv {
    document: SharedElementTree,
    notifier: Arc<dyn InteractionNotifier>,
    positioner: Option<Arc<dyn PositionEngine>>,
    clock: SharedClock,
}

impl fmt::Debug for SelectEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectEnv")
            .field("positioner", &self.positioner.is_some())
            .finish_non_exhaustive()
    }
}

impl SelectEnv {
    /// Environment with the default below-trigger positioning and system clock
    pub fn new(document: SharedElementTree, notifier: Arc<dyn InteractionNotifier>) -> Self {
        Self {
            document,
            notifier,
            positioner: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a custom floating-position engine
    pub fn positioner(mut self, engine: Arc<dyn PositionEngine>) -> Self {
        self.positioner = Some(engine);
        self
    }

    /// Use a custom time source
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }
}

/// Resources held while the panel is open
struct OpenPanel {
    panel: ElementId,
    binding: Box<dyn PositionBinding>,
    click_listener: ListenerId,
}

struct SelectInner<K> {
    store: OptionStore<K>,
    selection: Option<SelectOption<K>>,
    search: SearchField,
    debouncer: Debouncer<String>,
    config: SelectConfig,
    open: Option<OpenPanel>,
    on_change: Option<ChangeCallback<K>>,
    on_touched: Option<TouchedCallback>,
    resize_listener: Option<ListenerId>,
    destroyed: bool,
    document: SharedElementTree,
    notifier: Arc<dyn InteractionNotifier>,
    positioner: Arc<dyn PositionEngine>,
    clock: SharedClock,
}

fn lock_document(document: &SharedElementTree) -> MutexGuard<'_, ElementTree> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K: Clone + PartialEq> SelectInner<K> {
    fn resolve(&self, key: &K) -> Option<SelectOption<K>> {
        self.store.find(key).cloned()
    }

    fn run_search(&mut self, term: &str) -> usize {
        let count = self.store.search(term);
        debug!(term, count, visible_rows = self.store.visible_rows(), "select search");
        count
    }
}

impl<K> SelectInner<K> {
    /// Release everything held for the open panel. Returns the panel, if any.
    fn release_panel(&mut self) -> Option<ElementId> {
        let open = self.open.take()?;
        self.notifier.unsubscribe(open.click_listener);

        let mut doc = lock_document(&self.document);
        open.binding.destroy(&mut doc);
        doc.remove(open.panel);
        Some(open.panel)
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.release_panel();
        if let Some(id) = self.resize_listener.take() {
            self.notifier.unsubscribe(id);
        }
        self.debouncer.cancel();
        self.destroyed = true;
        debug!("select destroyed");
    }
}

impl<K> Drop for SelectInner<K> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Handle to a mounted select
///
/// Cloning the handle shares the same widget. The widget is torn down by
/// [`Select::destroy`] or when the last handle is dropped.
pub struct Select<K> {
    inner: Arc<Mutex<SelectInner<K>>>,
    closed: Arc<Emitter<()>>,
}

impl<K> Clone for Select<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<K> fmt::Debug for Select<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("closed_listeners", &self.closed.len())
            .finish_non_exhaustive()
    }
}

/// Close the panel behind `inner` and notify `closed` listeners
///
/// Listeners run after the widget lock is released, so they may call back
/// into the select.
fn close_panel<K>(
    inner: &Mutex<SelectInner<K>>,
    closed: &Emitter<()>,
    reason: CloseReason,
) -> bool {
    let released = inner
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .release_panel();
    match released {
        Some(panel) => {
            debug!(?reason, ?panel, "select closed");
            closed.emit(&());
            true
        }
        None => false,
    }
}

impl<K> Select<K>
where
    K: Clone + PartialEq + Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, SelectInner<K>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mount(
        options: Vec<SelectOption<K>>,
        initial: Option<K>,
        config: SelectConfig,
        on_change: Option<ChangeCallback<K>>,
        on_touched: Option<TouchedCallback>,
        env: SelectEnv,
    ) -> Self {
        let positioner = env
            .positioner
            .unwrap_or_else(|| Arc::new(AnchorBelow::new(config.panel_offset)) as Arc<dyn PositionEngine>);

        let mut inner = SelectInner {
            store: OptionStore::new(options, config.visible_rows),
            selection: None,
            search: SearchField::new(),
            debouncer: Debouncer::new(config.debounce()),
            config,
            open: None,
            on_change,
            on_touched,
            resize_listener: None,
            destroyed: false,
            document: env.document,
            notifier: env.notifier.clone(),
            positioner,
            clock: env.clock,
        };
        let selection = initial.as_ref().and_then(|key| inner.resolve(key));
        inner.selection = selection;
        debug!(
            options = inner.store.len(),
            selected = inner.selection.is_some(),
            "select mounted"
        );

        let select = Self {
            inner: Arc::new(Mutex::new(inner)),
            closed: Arc::new(Emitter::new()),
        };

        // Resize is observed for the component's whole lifetime
        let weak = Arc::downgrade(&select.inner);
        let closed = select.closed.clone();
        let resize = env.notifier.subscribe(
            EventKind::Resize,
            Arc::new(move |event: &Event| {
                if let (Event::Resize { .. }, Some(inner)) = (event, weak.upgrade()) {
                    handle_resize(&inner, &closed);
                }
            }),
        );
        select.lock().resize_listener = Some(resize);

        select
    }

    // =========================================================================
    // Panel lifecycle
    // =========================================================================

    /// Open the panel below `trigger`
    ///
    /// Instantiates `template`, appends the result to the document body,
    /// matches its width to the trigger, anchors it with the position engine
    /// and starts listening for outside clicks. Opening an open select does
    /// nothing.
    pub fn open(&self, template: &PanelTemplate, trigger: ElementId) -> Result<()> {
        let mut inner = self.lock();
        if inner.destroyed {
            return Err(SelectError::Destroyed);
        }
        if inner.open.is_some() {
            trace!("select already open");
            return Ok(());
        }

        let document = inner.document.clone();
        let (panel, binding) = {
            let mut doc = lock_document(&document);
            let Some(anchor) = doc.bounds(trigger) else {
                return Err(SelectError::UnknownElement(trigger.to_raw()));
            };

            let panel = template(&mut doc);
            if !doc.exists(panel) {
                return Err(SelectError::InvalidPanel(panel.to_raw()));
            }
            let body = doc.body();
            doc.append_child(body, panel);
            doc.set_width(panel, anchor.width);

            let binding = inner.positioner.attach(&mut doc, trigger, panel);
            (panel, binding)
        };

        let weak = Arc::downgrade(&self.inner);
        let closed = self.closed.clone();
        let click_listener = inner.notifier.subscribe(
            EventKind::Click,
            Arc::new(move |event: &Event| {
                if let (Event::Click { target }, Some(inner)) = (event, weak.upgrade()) {
                    handle_click(&inner, &closed, *target);
                }
            }),
        );

        inner.open = Some(OpenPanel {
            panel,
            binding,
            click_listener,
        });
        debug!(?trigger, ?panel, "select opened");
        Ok(())
    }

    /// Open when closed, close when open
    pub fn toggle(&self, template: &PanelTemplate, trigger: ElementId) -> Result<()> {
        if self.is_open() {
            self.close();
            Ok(())
        } else {
            self.open(template, trigger)
        }
    }

    /// Close the panel and notify `closed` listeners. No-op when closed.
    pub fn close(&self) -> bool {
        close_panel(&self.inner, &self.closed, CloseReason::Explicit)
    }

    /// React to a window resize
    ///
    /// Closes the panel when `close_on_resize` is set, otherwise re-anchors it.
    pub fn handle_resize(&self) {
        handle_resize(&self.inner, &self.closed);
    }

    /// Recompute the panel's position (after the trigger moved)
    pub fn reposition(&self) {
        let mut inner = self.lock();
        let document = inner.document.clone();
        if let Some(open) = inner.open.as_mut() {
            open.binding.update(&mut lock_document(&document));
        }
    }

    /// Subscribe to the `closed` notification
    pub fn on_closed<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.closed.subscribe(move |_| listener())
    }

    /// Drop a `closed` subscription
    pub fn off_closed(&self, handle: SubscriptionHandle) -> bool {
        self.closed.unsubscribe(handle)
    }

    /// Release every listener, the position binding and the panel
    ///
    /// Does not emit `closed`. Further `open` calls fail.
    pub fn destroy(&self) {
        self.lock().teardown();
        self.closed.clear();
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// A keystroke changed the search text
    ///
    /// The text is shown immediately; filtering waits for the debounce window.
    /// Returns false when the search input is disabled or the select is
    /// destroyed.
    pub fn input(&self, text: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if inner.destroyed {
            return false;
        }
        let text = text.into();
        if !inner.search.input(text.clone()) {
            trace!("search input ignored while disabled");
            return false;
        }
        let now = inner.clock.now();
        inner.debouncer.push(text, now);
        true
    }

    /// Run the pending search if the debounce window has elapsed
    ///
    /// Returns true when a search ran.
    pub fn poll(&self) -> bool {
        let mut inner = self.lock();
        if inner.destroyed {
            return false;
        }
        let now = inner.clock.now();
        match inner.debouncer.poll(now) {
            Some(term) => {
                inner.run_search(&term);
                true
            }
            None => false,
        }
    }

    /// When the pending search becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().debouncer.deadline()
    }

    /// Filter immediately, bypassing the debounce
    ///
    /// Returns the number of matches.
    pub fn search(&self, term: &str) -> usize {
        self.lock().run_search(term)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Pick an option
    ///
    /// Sets the selection, puts the option's text in the search field and
    /// notifies the change callback. The panel is closed afterwards when
    /// `close_on_select` is set. Ignored once destroyed.
    pub fn select(&self, option: &SelectOption<K>) {
        let (on_change, close) = {
            let mut inner = self.lock();
            if inner.destroyed {
                return;
            }
            inner.selection = Some(option.clone());
            inner.search.set_value(option.value.clone());
            // Programmatic writes are value changes too
            let now = inner.clock.now();
            inner.debouncer.push(option.value.clone(), now);
            debug!(value = %option.value, "select picked");
            (inner.on_change.clone(), inner.config.close_on_select)
        };

        if let Some(callback) = on_change {
            callback(option);
        }
        if close {
            close_panel(&self.inner, &self.closed, CloseReason::Selection);
        }
    }

    /// Pick the option at `index` in the filtered view
    pub fn select_index(&self, index: usize) -> Option<SelectOption<K>> {
        let option = self.lock().store.filtered().get(index).cloned()?;
        self.select(&option);
        Some(option)
    }

    /// Whether `option` is the current selection (by key)
    pub fn is_active(&self, option: &SelectOption<K>) -> bool {
        self.lock()
            .selection
            .as_ref()
            .is_some_and(|selected| selected.key == option.key)
    }

    /// Mark the control as interacted-with
    pub fn touch(&self) {
        let callback = self.lock().on_touched.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The selected option
    pub fn selection(&self) -> Option<SelectOption<K>> {
        self.lock().selection.clone()
    }

    /// Text currently in the search field
    pub fn search_text(&self) -> String {
        self.lock().search.value().to_string()
    }

    /// Text for the trigger: search text, else selection, else placeholder
    pub fn display_text(&self) -> String {
        let inner = self.lock();
        if !inner.search.value().is_empty() {
            return inner.search.value().to_string();
        }
        if let Some(selection) = &inner.selection {
            return selection.value.clone();
        }
        inner.config.placeholder.clone().unwrap_or_default()
    }

    /// Configured placeholder
    pub fn placeholder(&self) -> Option<String> {
        self.lock().config.placeholder.clone()
    }

    /// Row-count hint for the viewport
    pub fn visible_rows(&self) -> usize {
        self.lock().store.visible_rows()
    }

    /// Number of options in the filtered view
    pub fn filtered_len(&self) -> usize {
        self.lock().store.filtered().len()
    }

    /// A copy of the filtered view
    pub fn filtered(&self) -> Vec<SelectOption<K>> {
        self.lock().store.filtered().to_vec()
    }

    /// A copy of a slice of the filtered view (the rows a viewport renders)
    pub fn filtered_range(&self, range: Range<usize>) -> Vec<SelectOption<K>> {
        let inner = self.lock();
        let filtered = inner.store.filtered();
        let end = range.end.min(filtered.len());
        let start = range.start.min(end);
        filtered[start..end].to_vec()
    }

    /// Current panel state
    pub fn state(&self) -> PanelState {
        if self.lock().open.is_some() {
            PanelState::Open
        } else {
            PanelState::Closed
        }
    }

    /// Whether the panel is open
    pub fn is_open(&self) -> bool {
        self.state() == PanelState::Open
    }

    /// Whether the search input rejects user edits
    pub fn is_disabled(&self) -> bool {
        self.lock().search.is_disabled()
    }

    /// The open panel's root element
    pub fn panel(&self) -> Option<ElementId> {
        self.lock().open.as_ref().map(|open| open.panel)
    }

    /// The element the open panel is anchored to
    pub fn trigger(&self) -> Option<ElementId> {
        self.lock()
            .open
            .as_ref()
            .map(|open| open.binding.reference())
    }
}

fn handle_click<K>(
    inner: &Mutex<SelectInner<K>>,
    closed: &Emitter<()>,
    target: ElementId,
) {
    let outside = {
        let guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(open) = guard.open.as_ref() else {
            return;
        };
        let reference = open.binding.reference();
        let inside = lock_document(&guard.document).contains(reference, target);
        !inside
    };
    if outside {
        close_panel(inner, closed, CloseReason::OutsideClick);
    }
}

fn handle_resize<K>(inner: &Mutex<SelectInner<K>>, closed: &Emitter<()>) {
    let close = {
        let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.config.close_on_resize {
            guard.open.is_some()
        } else {
            let document = guard.document.clone();
            if let Some(open) = guard.open.as_mut() {
                open.binding.update(&mut lock_document(&document));
            }
            false
        }
    };
    if close {
        close_panel(inner, closed, CloseReason::Resize);
    }
}

impl<K> FormControl<K> for Select<K>
where
    K: Clone + PartialEq + Send + 'static,
{
    fn write_value(&self, key: Option<K>) {
        let mut inner = self.lock();
        let selection = key.as_ref().and_then(|key| inner.resolve(key));
        if key.is_some() && selection.is_none() {
            warn!("written value has no matching option");
        }

        // Trigger text follows the written selection
        let text = selection
            .as_ref()
            .map(|option| option.value.clone())
            .unwrap_or_default();
        if text != inner.search.value() && !inner.destroyed {
            inner.search.set_value(text.clone());
            let now = inner.clock.now();
            inner.debouncer.push(text, now);
        }
        inner.selection = selection;
    }

    fn register_on_change(&self, callback: ChangeCallback<K>) {
        self.lock().on_change = Some(callback);
    }

    fn register_on_touched(&self, callback: TouchedCallback) {
        self.lock().on_touched = Some(callback);
    }

    fn set_disabled(&self, disabled: bool) {
        let mut inner = self.lock();
        if disabled {
            inner.search.disable();
        } else {
            inner.search.enable();
        }
        debug!(disabled, "select disabled state");
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for a [`Select`]
pub struct SelectBuilder<K> {
    options: Vec<SelectOption<K>>,
    initial: Option<K>,
    config: SelectConfig,
    on_change: Option<ChangeCallback<K>>,
    on_touched: Option<TouchedCallback>,
}

impl<K> Default for SelectBuilder<K> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            initial: None,
            config: SelectConfig::default(),
            on_change: None,
            on_touched: None,
        }
    }
}

impl<K> SelectBuilder<K>
where
    K: Clone + PartialEq + Send + 'static,
{
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one option
    pub fn option(mut self, key: K, value: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(key, value));
        self
    }

    /// Add many options
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption<K>>) -> Self {
        self.options.extend(options);
        self
    }

    /// Key to select on mount
    pub fn initial(mut self, key: K) -> Self {
        self.initial = Some(key);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: SelectConfig) -> Self {
        self.config = config;
        self
    }

    /// Trigger text when nothing is selected
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = Some(placeholder.into());
        self
    }

    /// Minimum number of rows the panel renders
    pub fn visible_rows(mut self, rows: usize) -> Self {
        self.config.visible_rows = rows;
        self
    }

    /// Change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectOption<K>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Touched callback
    pub fn on_touched<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_touched = Some(Arc::new(callback));
        self
    }

    /// Validate the configuration and mount the select
    pub fn build(self, env: SelectEnv) -> Result<Select<K>> {
        self.config.validate()?;
        Ok(Select::mount(
            self.options,
            self.initial,
            self.config,
            self.on_change,
            self.on_touched,
            env,
        ))
    }
}

/// Start building a select
pub fn select<K>() -> SelectBuilder<K>
where
    K: Clone + PartialEq + Send + 'static,
{
    SelectBuilder::new()
}
