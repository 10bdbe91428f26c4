//! End-to-end flow through the public API: mount, open, type, scroll, pick,
//! dismiss.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sift_core::{ElementId, ElementTree, Event, EventDispatcher, EventKind, InteractionNotifier};
use sift_core::{ManualClock, Rect, SharedElementTree};
use sift_select::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sift_select=debug")
        .with_test_writer()
        .try_init();
}

fn hi_options(count: u32) -> Vec<SelectOption<u32>> {
    (0..count)
        .map(|i| SelectOption::new(i, format!("hi {i}")))
        .collect()
}

struct Page {
    document: SharedElementTree,
    dispatcher: Arc<EventDispatcher>,
    clock: ManualClock,
    trigger: ElementId,
    heading: ElementId,
}

impl Page {
    fn new() -> Self {
        let document = ElementTree::shared();
        let (trigger, heading) = {
            let mut doc = document.lock().unwrap();
            let body = doc.body();
            let heading = doc.create(Rect::new(0.0, 0.0, 800.0, 40.0));
            let form = doc.create(Rect::new(0.0, 40.0, 800.0, 400.0));
            let trigger = doc.create(Rect::new(16.0, 60.0, 320.0, 36.0));
            doc.append_child(body, heading);
            doc.append_child(body, form);
            doc.append_child(form, trigger);
            (trigger, heading)
        };
        Self {
            document,
            dispatcher: EventDispatcher::shared(),
            clock: ManualClock::new(),
            trigger,
            heading,
        }
    }

    fn env(&self) -> SelectEnv {
        SelectEnv::new(self.document.clone(), self.dispatcher.clone())
            .clock(Arc::new(self.clock.clone()))
    }

    /// Panel root with a scroll container, like a rendered dropdown
    fn template(&self) -> PanelTemplate {
        panel_template(|doc| {
            let root = doc.create(Rect::default());
            let scroller = doc.create(Rect::default());
            doc.append_child(root, scroller);
            root
        })
    }

    fn type_text(&self, select: &Select<u32>, text: &str) {
        for end in 1..=text.len() {
            select.input(&text[..end]);
            self.clock.advance(Duration::from_millis(50));
            select.poll();
        }
    }

    fn settle(&self, select: &Select<u32>) -> bool {
        self.clock.advance(Duration::from_millis(300));
        select.poll()
    }
}

#[test]
fn pick_from_large_list() {
    init_tracing();
    let page = Page::new();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let closed = Arc::new(AtomicUsize::new(0));

    let log = changes.clone();
    let numbers = select()
        .options(hi_options(10_000))
        .placeholder("Pick a number")
        .initial(7)
        .on_change(move |option: &SelectOption<u32>| log.lock().unwrap().push(option.key))
        .build(page.env())
        .unwrap();

    let counter = closed.clone();
    numbers.on_closed(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(numbers.display_text(), "hi 7");
    assert_eq!(numbers.visible_rows(), 4);

    numbers.open(&page.template(), page.trigger).unwrap();
    assert_eq!(page.dispatcher.listener_count(EventKind::Click), 1);

    // Typing "999" filters only once, after the user stops
    page.type_text(&numbers, "999");
    assert_eq!(numbers.filtered_len(), 10_000);
    assert!(page.settle(&numbers));

    // 999, 1999..=8999 by thousands, 9990..=9999
    let expected = (0..10_000u32)
        .filter(|k| k.to_string().contains("999"))
        .count();
    assert_eq!(expected, 19);
    assert_eq!(numbers.filtered_len(), expected);
    assert_eq!(numbers.visible_rows(), expected);

    // Render only what the viewport shows
    let mut viewport = VirtualViewport::new(28.0);
    let rows = numbers.visible_rows().min(6);
    viewport.scroll_to(12, numbers.filtered_len(), rows);
    let range = viewport.visible_range(numbers.filtered_len(), rows);
    let slice = numbers.filtered_range(range.clone());
    assert_eq!(slice.len(), range.len());
    assert!(range.contains(&12));

    let row = slice[12 - range.start].clone();
    numbers.select(&row);

    assert_eq!(numbers.selection(), Some(row.clone()));
    assert_eq!(numbers.search_text(), row.value);
    assert_eq!(*changes.lock().unwrap(), vec![row.key]);
    assert!(!numbers.is_open());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert_eq!(page.dispatcher.listener_count(EventKind::Click), 0);
}

#[test]
fn dismiss_by_outside_click_and_resize() {
    init_tracing();
    let page = Page::new();
    let closed = Arc::new(AtomicUsize::new(0));
    let numbers = select()
        .options(hi_options(100))
        .build(page.env())
        .unwrap();
    let counter = closed.clone();
    numbers.on_closed(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    numbers.open(&page.template(), page.trigger).unwrap();
    let panel = numbers.panel().unwrap();

    // The panel escaped the form: it hangs off the body
    {
        let doc = page.document.lock().unwrap();
        assert_eq!(doc.parent(panel), Some(doc.body()));
        assert_eq!(doc.bounds(panel).map(|b| b.width), Some(320.0));
    }

    page.dispatcher.dispatch(&Event::Click {
        target: page.trigger,
    });
    assert!(numbers.is_open());

    page.dispatcher.dispatch(&Event::Click {
        target: page.heading,
    });
    assert!(!numbers.is_open());
    assert!(!page.document.lock().unwrap().exists(panel));

    numbers.open(&page.template(), page.trigger).unwrap();
    page.dispatcher.dispatch(&Event::Resize {
        width: 640.0,
        height: 480.0,
    });
    assert!(!numbers.is_open());
    assert_eq!(closed.load(Ordering::SeqCst), 2);

    // Opening then closing never touched the selection
    assert_eq!(numbers.selection(), None);
}

#[test]
fn form_control_protocol() {
    init_tracing();
    let page = Page::new();
    let numbers = select().options(hi_options(50)).build(page.env()).unwrap();
    let touched = Arc::new(AtomicUsize::new(0));

    let control: &dyn FormControl<u32> = &numbers;
    let counter = touched.clone();
    control.register_on_touched(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    control.write_value(Some(42));
    assert_eq!(numbers.selection().map(|o| o.value), Some("hi 42".to_string()));

    control.write_value(Some(4242));
    assert_eq!(numbers.selection(), None);
    assert_eq!(numbers.display_text(), "");
    // Written text is searched like any other value change
    assert!(page.settle(&numbers));
    assert_eq!(numbers.filtered_len(), 50);

    control.set_disabled(true);
    assert!(!numbers.input("4"));
    assert!(!page.settle(&numbers));
    control.set_disabled(false);
    assert!(numbers.input("4"));
    assert!(page.settle(&numbers));
    // 4, 14, 24, 34, 40..=49, 44 counted once
    assert_eq!(numbers.filtered_len(), 14);

    numbers.touch();
    assert_eq!(touched.load(Ordering::SeqCst), 1);
}

#[test]
fn destroying_releases_subscriptions() {
    init_tracing();
    let page = Page::new();
    for _ in 0..3 {
        let numbers = select().options(hi_options(10)).build(page.env()).unwrap();
        numbers.open(&page.template(), page.trigger).unwrap();
        numbers.close();
        numbers.open(&page.template(), page.trigger).unwrap();
        numbers.destroy();
    }
    assert_eq!(page.dispatcher.listener_count(EventKind::Click), 0);
    assert_eq!(page.dispatcher.listener_count(EventKind::Resize), 0);
    // body, heading, form, trigger
    assert_eq!(page.document.lock().unwrap().len(), 4);
}
