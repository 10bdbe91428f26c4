//! Options and the option store
//!
//! The store keeps an immutable snapshot of every option handed in at
//! construction plus the currently filtered view. Every search starts over
//! from the snapshot, so filtering never narrows cumulatively.

/// A selectable key/text pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption<K> {
    /// Identifier stored by the host when selected
    pub key: K,
    /// Display text (used for the trigger and for filtering)
    pub value: String,
}

impl<K> SelectOption<K> {
    /// Create a new option
    pub fn new(key: K, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Case-sensitive substring match on the display text
    ///
    /// An empty query matches every option.
    pub fn matches(&self, query: &str) -> bool {
        self.value.contains(query)
    }
}

/// Full option list plus its filtered view
#[derive(Clone, Debug)]
pub struct OptionStore<K> {
    original: Vec<SelectOption<K>>,
    filtered: Vec<SelectOption<K>>,
    visible_rows: usize,
}

impl<K: Clone + PartialEq> OptionStore<K> {
    /// Snapshot `options`; the filtered view starts as the full list
    ///
    /// `visible_rows` is the host's minimum render-size hint. It is kept until
    /// the first search replaces it with the filtered count.
    pub fn new(options: Vec<SelectOption<K>>, visible_rows: usize) -> Self {
        Self {
            filtered: options.clone(),
            original: options,
            visible_rows: visible_rows.max(1),
        }
    }

    /// Recompute the filtered view from the snapshot
    ///
    /// Returns the number of matching options. The visible-row hint becomes
    /// the match count, or 1 when nothing matches.
    pub fn search(&mut self, term: &str) -> usize {
        self.filtered = if term.is_empty() {
            self.original.clone()
        } else {
            self.original
                .iter()
                .filter(|option| option.matches(term))
                .cloned()
                .collect()
        };
        self.visible_rows = self.filtered.len().max(1);
        self.filtered.len()
    }

    /// Every option, in the order supplied
    pub fn all(&self) -> &[SelectOption<K>] {
        &self.original
    }

    /// The current filtered view
    pub fn filtered(&self) -> &[SelectOption<K>] {
        &self.filtered
    }

    /// Visible-row hint for the viewport
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    /// Linear lookup of a key in the full list
    pub fn find(&self, key: &K) -> Option<&SelectOption<K>> {
        self.original.iter().find(|option| option.key == *key)
    }

    /// Number of options in the full list
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// True when the full list is empty
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hi_options() -> Vec<SelectOption<u32>> {
        vec![
            SelectOption::new(1, "hi 1"),
            SelectOption::new(2, "hi 2"),
            SelectOption::new(22, "hi 22"),
        ]
    }

    fn keys(options: &[SelectOption<u32>]) -> Vec<u32> {
        options.iter().map(|o| o.key).collect()
    }

    #[test]
    fn test_option_matches() {
        let opt = SelectOption::new("us", "United States");
        assert!(opt.matches(""));
        assert!(opt.matches("United"));
        assert!(opt.matches("d St"));
        // Case-sensitive
        assert!(!opt.matches("united"));
        assert!(!opt.matches("canada"));
    }

    #[test]
    fn test_new_store_shows_everything() {
        let store = OptionStore::new(hi_options(), 4);
        assert_eq!(store.len(), 3);
        assert_eq!(keys(store.filtered()), vec![1, 2, 22]);
        assert_eq!(store.visible_rows(), 4);
    }

    #[test]
    fn test_search_filters_by_substring() {
        let mut store = OptionStore::new(hi_options(), 4);
        assert_eq!(store.search("2"), 2);
        assert_eq!(keys(store.filtered()), vec![2, 22]);
        assert_eq!(store.visible_rows(), 2);
    }

    #[test]
    fn test_search_without_matches() {
        let mut store = OptionStore::new(hi_options(), 4);
        assert_eq!(store.search("zzz"), 0);
        assert!(store.filtered().is_empty());
        assert_eq!(store.visible_rows(), 1);
    }

    #[test]
    fn test_search_restarts_from_snapshot() {
        let mut store = OptionStore::new(hi_options(), 4);
        store.search("22");
        assert_eq!(keys(store.filtered()), vec![22]);

        // Not a refinement of the previous view
        store.search("1");
        assert_eq!(keys(store.filtered()), vec![1]);

        store.search("");
        assert_eq!(keys(store.filtered()), vec![1, 2, 22]);
        assert_eq!(store.visible_rows(), 3);
    }

    #[test]
    fn test_search_is_idempotent() {
        let mut store = OptionStore::new(hi_options(), 4);
        store.search("hi 2");
        let once = store.filtered().to_vec();
        store.search("hi 2");
        assert_eq!(store.filtered(), once.as_slice());
    }

    #[test]
    fn test_find() {
        let store = OptionStore::new(hi_options(), 4);
        assert_eq!(store.find(&2), Some(&SelectOption::new(2, "hi 2")));
        assert_eq!(store.find(&99), None);
    }

    #[test]
    fn test_empty_store() {
        let mut store: OptionStore<u32> = OptionStore::new(Vec::new(), 0);
        assert!(store.is_empty());
        assert_eq!(store.visible_rows(), 1);
        assert_eq!(store.search("x"), 0);
        assert_eq!(store.search(""), 0);
        assert_eq!(store.visible_rows(), 1);
    }
}
