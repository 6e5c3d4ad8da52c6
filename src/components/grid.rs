use crate::bookmark::{toggle_bookmark, BookmarkIcon};
use crate::models::Item;
use crate::state::{AppContext, ItemStore};
use crate::util::{format_price, payment_icons, seller_display_name, thumbnail_src};
use leptos::prelude::*;

pub(crate) const EMPTY_GRID_MESSAGE: &str = "No items yet – be the first to list something!";

/// Card grid for a list of items.
///
/// With a `store`, each card gets a bookmark icon bound to that store. Cards
/// are keyed by id and bookmarked flag, so a flag change re-creates exactly
/// one card and its handlers.
#[component]
pub fn ItemGrid(
    #[prop(into)] items: Signal<Vec<Item>>,
    #[prop(optional)] store: Option<RwSignal<ItemStore>>,
    #[prop(into, default = EMPTY_GRID_MESSAGE.to_string())] empty_message: String,
    #[prop(into, optional)] id: String,
) -> impl IntoView {
    let app_state = use_context::<AppContext>();
    let has_items = move || items.with(|list| !list.is_empty());

    view! {
        <div class="grid" id=id>
            <Show
                when=has_items
                fallback=move || view! { <p class="empty-msg">{empty_message.clone()}</p> }
            >
                <For
                    each=move || items.get()
                    key=|item| (item.id, item.bookmarked)
                    children={
                        let app_state = app_state.clone();
                        move |item: Item| {
                            let bookmarks = store.zip(app_state.clone());
                            view! { <ItemCard item=item bookmarks=bookmarks /> }
                        }
                    }
                />
            </Show>
        </div>
    }
}

#[component]
fn ItemCard(item: Item, bookmarks: Option<(RwSignal<ItemStore>, AppContext)>) -> impl IntoView {
    let href = format!("/item/{}", item.id);
    let thumb = thumbnail_src(&item);
    let alt = item.name.clone().unwrap_or_else(|| "Item".to_string());
    let title = item.name.clone().unwrap_or_default();
    let price = format_price(item.price);
    let seller = seller_display_name(item.seller.as_ref());
    let icons = payment_icons(&item.payment_options);

    let bookmark = bookmarks.map(|(store, app_state)| {
        let icon = RwSignal::new(BookmarkIcon::new(item.id, item.bookmarked));
        let on_click = move |ev: web_sys::MouseEvent| {
            // The icon sits inside the card link.
            ev.prevent_default();
            ev.stop_propagation();
            toggle_bookmark(&app_state, icon, store);
        };

        view! {
            <img
                class="item-card__bookmark"
                alt="Bookmark"
                src=move || icon.get().src
                data-item-id=item.id.to_string()
                data-bookmarked=move || icon.get().bookmarked.to_string()
                on:click=on_click
            />
        }
    });

    view! {
        <a class="card" href=href>
            <img class="item-card__thumb" src=thumb alt=alt />
            {bookmark}
            <div class="item-card__body">
                <div class="item-card__top">
                    <div class="item-card__title">{title}</div>
                    <div class="item-card__price">{price}</div>
                </div>
                <div class="item-card__bottom">
                    <div class="item-card__seller">{seller}</div>
                    <div class="item-card__payment-icons">
                        {icons
                            .into_iter()
                            .map(|(method, label)| {
                                view! { <img class="icon" src=method.icon_src() alt=label /> }
                            })
                            .collect_view()}
                    </div>
                </div>
            </div>
        </a>
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::models::Seller;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn container() -> web_sys::HtmlElement {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("test runs in a document");
        let div = document
            .create_element("div")
            .expect("create container")
            .dyn_into::<web_sys::HtmlElement>()
            .expect("div is an HtmlElement");
        document
            .body()
            .expect("document has a body")
            .append_child(&div)
            .expect("attach container");
        div
    }

    fn listed(id: i64, payment_options: &[&str]) -> Item {
        Item {
            id,
            seller_id: Some(1),
            name: Some("Lamp".to_string()),
            description: None,
            item_photos: None,
            price: Some(19.5),
            condition: None,
            payment_options: payment_options.iter().map(|s| s.to_string()).collect(),
            bookmarked: false,
            is_owner: false,
            seller: Some(Seller {
                id: 1,
                first_name: Some("Ada".to_string()),
                last_name: None,
            }),
        }
    }

    #[wasm_bindgen_test]
    fn test_empty_grid_renders_single_placeholder() {
        let root = container();
        let _handle = leptos::mount::mount_to(root.clone(), || {
            view! { <ItemGrid items=Signal::derive(Vec::new) /> }
        });

        let placeholders = root.query_selector_all(".empty-msg").expect("query");
        let cards = root.query_selector_all(".card").expect("query");
        assert_eq!(placeholders.length(), 1);
        assert_eq!(cards.length(), 0);
    }

    #[wasm_bindgen_test]
    fn test_card_renders_payment_icons_in_order() {
        let root = container();
        let items = vec![listed(1, &["Venmo", "Cash"]), listed(2, &["Crypto"])];
        let _handle = leptos::mount::mount_to(root.clone(), move || {
            let items = items.clone();
            view! { <ItemGrid items=Signal::derive(move || items.clone()) /> }
        });

        let cards = root.query_selector_all(".card").expect("query");
        assert_eq!(cards.length(), 2);

        let first_icons = root
            .query_selector_all(".card:nth-child(1) .item-card__payment-icons img")
            .expect("query");
        assert_eq!(first_icons.length(), 2);
        let alt = |i: u32| {
            first_icons
                .item(i)
                .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
                .and_then(|e| e.get_attribute("alt"))
        };
        assert_eq!(alt(0).as_deref(), Some("Venmo"));
        assert_eq!(alt(1).as_deref(), Some("Cash"));

        let second_icons = root
            .query_selector_all(".card:nth-child(2) .item-card__payment-icons img")
            .expect("query");
        assert_eq!(second_icons.length(), 0);

        let price = root
            .query_selector(".item-card__price")
            .expect("query")
            .and_then(|e| e.text_content());
        assert_eq!(price.as_deref(), Some("$19.50"));
    }
}
