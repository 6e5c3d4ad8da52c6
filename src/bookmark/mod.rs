use crate::state::{AppContext, FilterMode, ItemStore};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) const BOOKMARK_OUTLINE: &str = "/static/assets/bookmark.svg";
pub(crate) const BOOKMARK_FILLED: &str = "/static/assets/bookmark-filled.svg";

/// Per-card bookmark icon: the shown asset plus the one to swap in on click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BookmarkIcon {
    pub item_id: i64,
    pub src: &'static str,
    pub alt_src: &'static str,
    pub bookmarked: bool,
}

impl BookmarkIcon {
    pub fn new(item_id: i64, bookmarked: bool) -> Self {
        let (src, alt_src) = if bookmarked {
            (BOOKMARK_FILLED, BOOKMARK_OUTLINE)
        } else {
            (BOOKMARK_OUTLINE, BOOKMARK_FILLED)
        };
        Self {
            item_id,
            src,
            alt_src,
            bookmarked,
        }
    }

    /// Two-state swap; returns the new bookmarked marker.
    pub fn toggle(&mut self) -> bool {
        std::mem::swap(&mut self.src, &mut self.alt_src);
        self.bookmarked = !self.bookmarked;
        self.bookmarked
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToggleOutcome {
    /// The item left the bookmarks view; the grid already re-rendered without it.
    RemovedFromView,
    /// The item stays visible.
    Updated,
}

/// Local half of a bookmark click: flips the icon and the matching store item.
pub(crate) fn apply_toggle(icon: &mut BookmarkIcon, store: &mut ItemStore) -> ToggleOutcome {
    let now = icon.toggle();
    if !store.set_bookmarked(icon.item_id, now) {
        log::warn!("bookmark toggled for item {} missing from snapshot", icon.item_id);
    }

    if store.filter() == FilterMode::Bookmarks && !now {
        ToggleOutcome::RemovedFromView
    } else {
        ToggleOutcome::Updated
    }
}

/// Undoes a toggle to `bookmarked` that the backend rejected.
///
/// Icon and store item are flipped back only while they still show
/// `bookmarked`; a later click has already superseded the change otherwise.
/// `icon` is `None` once its card has left the grid.
pub(crate) fn revert_toggle(
    icon: Option<&mut BookmarkIcon>,
    store: &mut ItemStore,
    item_id: i64,
    bookmarked: bool,
) {
    if store.is_bookmarked(item_id) == Some(bookmarked) {
        store.set_bookmarked(item_id, !bookmarked);
    }
    if let Some(icon) = icon.filter(|i| i.bookmarked == bookmarked) {
        icon.toggle();
    }
}

/// Handles a click on a card's bookmark icon.
///
/// The change is applied locally first, then sent to the backend. If the
/// backend rejects it, the store (and the icon, when its card is still
/// mounted) is flipped back and a notice is raised.
pub(crate) fn toggle_bookmark(
    app_state: &AppContext,
    icon: RwSignal<BookmarkIcon>,
    store: RwSignal<ItemStore>,
) {
    let Some(mut next) = icon.try_get_untracked() else {
        return;
    };
    let outcome = store
        .try_update(|s| apply_toggle(&mut next, s))
        .unwrap_or(ToggleOutcome::Updated);
    let item_id = next.item_id;
    let bookmarked = next.bookmarked;
    let _ = icon.try_set(next);

    if outcome == ToggleOutcome::RemovedFromView {
        log::debug!("item {item_id} removed from bookmarks view");
    }

    let api_client = app_state.0.api_client.get_untracked();
    let notice = app_state.0.notice;
    spawn_local(async move {
        match api_client.set_bookmark(item_id, bookmarked).await {
            Ok(()) => {}
            Err(e) => {
                log::error!("failed to update bookmark for item {item_id}: {e}");
                let mut shown = icon.try_get_untracked();
                store.try_update(|s| revert_toggle(shown.as_mut(), s, item_id, bookmarked));
                if let Some(shown) = shown {
                    let _ = icon.try_set(shown);
                }
                notice.set(Some("Your bookmark could not be saved.".to_string()));
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::item;

    fn store_with(items: Vec<crate::models::Item>, filter: FilterMode) -> ItemStore {
        let mut s = ItemStore::new();
        s.replace(items);
        s.set_filter(filter);
        s
    }

    #[test]
    fn test_icon_assets_follow_flag() {
        let on = BookmarkIcon::new(1, true);
        assert_eq!(on.src, BOOKMARK_FILLED);
        assert_eq!(on.alt_src, BOOKMARK_OUTLINE);

        let off = BookmarkIcon::new(1, false);
        assert_eq!(off.src, BOOKMARK_OUTLINE);
    }

    #[test]
    fn test_toggle_twice_restores_icon_and_item() {
        let mut s = store_with(vec![item(1, 10, false)], FilterMode::All);
        let mut icon = BookmarkIcon::new(1, false);
        let original = icon.clone();

        apply_toggle(&mut icon, &mut s);
        assert!(icon.bookmarked);
        assert_eq!(icon.src, BOOKMARK_FILLED);
        assert!(s.snapshot()[0].bookmarked);

        apply_toggle(&mut icon, &mut s);
        assert_eq!(icon, original);
        assert!(!s.snapshot()[0].bookmarked);
    }

    #[test]
    fn test_unbookmark_under_bookmarks_filter_leaves_view() {
        let mut s = store_with(
            vec![item(1, 10, true), item(2, 10, true)],
            FilterMode::Bookmarks,
        );
        let mut icon = BookmarkIcon::new(2, true);

        let outcome = apply_toggle(&mut icon, &mut s);
        assert_eq!(outcome, ToggleOutcome::RemovedFromView);
        let visible: Vec<i64> = s.visible_items().iter().map(|i| i.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn test_bookmark_under_all_filter_stays() {
        let mut s = store_with(vec![item(1, 10, false)], FilterMode::All);
        let mut icon = BookmarkIcon::new(1, false);
        assert_eq!(apply_toggle(&mut icon, &mut s), ToggleOutcome::Updated);

        let mut icon = BookmarkIcon::new(1, true);
        assert_eq!(apply_toggle(&mut icon, &mut s), ToggleOutcome::Updated);
    }

    #[test]
    fn test_toggle_unknown_item_only_flips_icon() {
        let mut s = store_with(vec![item(1, 10, false)], FilterMode::All);
        let mut icon = BookmarkIcon::new(5, false);
        apply_toggle(&mut icon, &mut s);
        assert!(icon.bookmarked);
        assert!(!s.snapshot()[0].bookmarked);
    }

    #[test]
    fn test_rejected_toggle_restores_icon_and_store() {
        let mut s = store_with(vec![item(1, 10, false)], FilterMode::All);
        let mut icon = BookmarkIcon::new(1, false);
        let before_icon = icon.clone();
        let before_store = s.clone();

        apply_toggle(&mut icon, &mut s);
        revert_toggle(Some(&mut icon), &mut s, 1, true);

        assert_eq!(icon, before_icon);
        assert_eq!(s, before_store);
    }

    #[test]
    fn test_rejected_unbookmark_brings_card_back_to_bookmarks_view() {
        let mut s = store_with(vec![item(1, 10, true)], FilterMode::Bookmarks);
        let mut icon = BookmarkIcon::new(1, true);
        assert_eq!(apply_toggle(&mut icon, &mut s), ToggleOutcome::RemovedFromView);
        assert!(s.visible_items().is_empty());

        // The card is gone, so only the store is reverted.
        revert_toggle(None, &mut s, 1, false);
        assert_eq!(s.visible_items().len(), 1);
        assert_eq!(s.is_bookmarked(1), Some(true));
    }

    #[test]
    fn test_revert_skips_state_already_toggled_again() {
        let mut s = store_with(vec![item(1, 10, false)], FilterMode::All);
        let mut icon = BookmarkIcon::new(1, false);

        apply_toggle(&mut icon, &mut s);
        // Clicked again before the first request failed.
        apply_toggle(&mut icon, &mut s);
        let settled_icon = icon.clone();

        revert_toggle(Some(&mut icon), &mut s, 1, true);
        assert_eq!(icon, settled_icon);
        assert_eq!(s.is_bookmarked(1), Some(false));
    }
}
