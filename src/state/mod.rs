use crate::api::ApiClient;
use crate::models::Item;
use leptos::prelude::*;

/// Which subset of the snapshot the browse grid shows.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum FilterMode {
    #[default]
    All,
    Bookmarks,
    SellingItems,
}

impl FilterMode {
    /// Reads a menu `data-value`; anything unrecognized shows everything.
    pub fn from_value(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Self::All => "All Items",
            Self::Bookmarks => "Bookmarks",
            Self::SellingItems => "Your Items",
        }
    }
}

/// Browse-page item state: the last fetched snapshot plus the view selectors.
///
/// Owned by the browse page for as long as it is mounted. The grid is always
/// derived from `visible_items`, never stored separately.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ItemStore {
    snapshot: Vec<Item>,
    filter: FilterMode,
    viewer_id: Option<i64>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot; results are never merged.
    pub fn replace(&mut self, items: Vec<Item>) {
        self.snapshot = items;
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> &[Item] {
        &self.snapshot
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_viewer(&mut self, viewer_id: i64) {
        self.viewer_id = Some(viewer_id);
    }

    pub fn visible_items(&self) -> Vec<Item> {
        match self.filter {
            FilterMode::All => self.snapshot.clone(),
            FilterMode::Bookmarks => self
                .snapshot
                .iter()
                .filter(|i| i.bookmarked)
                .cloned()
                .collect(),
            FilterMode::SellingItems => match self.viewer_id {
                Some(viewer) => self
                    .snapshot
                    .iter()
                    .filter(|i| i.seller_ref() == Some(viewer))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    pub fn is_bookmarked(&self, item_id: i64) -> Option<bool> {
        self.snapshot
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.bookmarked)
    }

    /// Sets one item's bookmarked flag in place. Returns false if the id is unknown.
    pub fn set_bookmarked(&mut self, item_id: i64, bookmarked: bool) -> bool {
        match self.snapshot.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.bookmarked = bookmarked;
                true
            }
            None => false,
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Non-blocking message shown above the page (e.g. a rejected bookmark).
    pub notice: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            notice: RwSignal::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Seller;

    pub(crate) fn item(id: i64, seller: i64, bookmarked: bool) -> Item {
        Item {
            id,
            seller_id: Some(seller),
            name: Some(format!("item-{id}")),
            description: None,
            item_photos: None,
            price: Some(id as f64),
            condition: None,
            payment_options: vec![],
            bookmarked,
            is_owner: false,
            seller: Some(Seller {
                id: seller,
                first_name: Some("S".to_string()),
                last_name: None,
            }),
        }
    }

    fn store() -> ItemStore {
        let mut s = ItemStore::new();
        s.replace(vec![
            item(1, 10, true),
            item(2, 20, false),
            item(3, 10, false),
            item(4, 30, true),
        ]);
        s
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_filter_all_keeps_order() {
        let s = store();
        assert_eq!(ids(&s.visible_items()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_bookmarks() {
        let mut s = store();
        s.set_filter(FilterMode::Bookmarks);
        assert_eq!(ids(&s.visible_items()), vec![1, 4]);
    }

    #[test]
    fn test_filter_selling_items() {
        let mut s = store();
        s.set_viewer(10);
        s.set_filter(FilterMode::SellingItems);
        assert_eq!(ids(&s.visible_items()), vec![1, 3]);
    }

    #[test]
    fn test_filter_selling_items_without_viewer_is_empty() {
        let mut s = store();
        s.set_filter(FilterMode::SellingItems);
        assert!(s.visible_items().is_empty());
    }

    #[test]
    fn test_visible_items_is_idempotent() {
        let mut s = store();
        s.set_filter(FilterMode::Bookmarks);
        let first = s.visible_items();
        assert_eq!(first, s.visible_items());
        assert_eq!(s.snapshot().len(), 4);
    }

    #[test]
    fn test_replace_does_not_merge() {
        let mut s = store();
        s.replace(vec![item(9, 10, false)]);
        assert_eq!(ids(s.snapshot()), vec![9]);
    }

    #[test]
    fn test_set_bookmarked_flips_one_item() {
        let mut s = store();
        assert!(s.set_bookmarked(2, true));
        assert!(s.snapshot()[1].bookmarked);
        assert!(s.snapshot()[0].bookmarked);
        assert!(!s.snapshot()[2].bookmarked);
        assert!(!s.set_bookmarked(99, true));
    }

    #[test]
    fn test_filter_mode_menu_values() {
        assert_eq!(FilterMode::All.as_ref(), "all");
        assert_eq!(FilterMode::Bookmarks.as_ref(), "bookmarks");
        assert_eq!(FilterMode::SellingItems.as_ref(), "selling-items");
        assert_eq!(FilterMode::default(), FilterMode::All);
        assert_eq!(FilterMode::SellingItems.menu_label(), "Your Items");
    }

    #[test]
    fn test_filter_mode_unknown_value_means_all() {
        assert_eq!(FilterMode::from_value("bookmarks"), FilterMode::Bookmarks);
        assert_eq!(FilterMode::from_value("selling-items"), FilterMode::SellingItems);
        assert_eq!(FilterMode::from_value("sold"), FilterMode::All);
        assert_eq!(FilterMode::from_value(""), FilterMode::All);
    }
}
