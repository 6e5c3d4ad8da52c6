use crate::chat::ChatPanel;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ConfirmModal, Spinner};
use crate::models::{Item, PaymentMethod};
use crate::state::AppContext;
use crate::util::{alert, format_price, full_name, thumbnail_src};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;

pub(crate) const ITEM_LOAD_FAILED: &str = "Sorry, this item could not be loaded.";

#[derive(Params, PartialEq, Clone, Debug)]
pub struct ItemRouteParams {
    pub id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
enum ItemLoad {
    Loading,
    Loaded(Item),
    Failed,
}

#[component]
pub fn ItemPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<ItemRouteParams>();
    let item_id = move || params.get().ok().and_then(|p| p.id);

    let state: RwSignal<ItemLoad> = RwSignal::new(ItemLoad::Loading);

    Effect::new(move |_| {
        let Some(id) = item_id() else {
            log::warn!("item route without a numeric id");
            state.set(ItemLoad::Failed);
            return;
        };
        state.set(ItemLoad::Loading);

        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let next = match api.get_item(id).await {
                Ok(item) => ItemLoad::Loaded(item),
                Err(e) => {
                    log::error!("failed to load item {id}: {e}");
                    ItemLoad::Failed
                }
            };
            // Only the item still in the address bar may land.
            let current = params.try_get_untracked().and_then(|p| p.ok()).and_then(|p| p.id);
            if current == Some(id) {
                let _ = state.try_set(next);
            }
        });
    });

    view! {
        {move || match state.get() {
            ItemLoad::Loading => view! {
                <div class="flex justify-center py-12">
                    <Spinner class="size-6" />
                </div>
            }
            .into_any(),
            ItemLoad::Failed => view! {
                <p class="error-msg py-12 text-center text-muted-foreground">{ITEM_LOAD_FAILED}</p>
            }
            .into_any(),
            ItemLoad::Loaded(item) => view! { <ItemDetail item=item /> }.into_any(),
        }}
    }
}

#[component]
fn ItemDetail(item: Item) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let confirm_open: RwSignal<bool> = RwSignal::new(false);
    let deleting: RwSignal<bool> = RwSignal::new(false);

    let id = item.id;
    let is_owner = item.is_owner;
    let image = thumbnail_src(&item);
    let backdrop = format!("--bg-image: url(\"{image}\")");
    let name = item.name.clone().unwrap_or_default();
    let condition = item
        .condition
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "—".to_string());
    let description = item.description.clone().unwrap_or_default();
    let seller_id = item.seller_ref();
    let seller_name = item
        .seller
        .as_ref()
        .map(|s| full_name(s.first_name.as_deref(), s.last_name.as_deref()))
        .unwrap_or_default();

    let on_delete = Callback::new(move |_: ()| {
        if deleting.get_untracked() {
            return;
        }
        deleting.set(true);

        let api = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api.delete_item(id).await {
                Ok(()) => {
                    log::info!("deleted item {id}");
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => {
                    log::error!("failed to delete item {id}: {e}");
                    let _ = deleting.try_set(false);
                    let _ = confirm_open.try_set(false);
                    alert("There was an error deleting the item.");
                }
            }
        });
    });

    let payment_options = item
        .payment_options
        .iter()
        .map(|label| {
            let icon = PaymentMethod::exact(label).map(|m| {
                view! { <img class="size-5" src=m.icon_src() alt=label.clone() /> }
            });
            view! {
                <div class="payment-option flex items-center gap-2">
                    {icon}
                    <span>{label.clone()}</span>
                </div>
            }
        })
        .collect_view();

    view! {
        <article class="item-detail grid gap-8 md:grid-cols-2">
            <div class="item-image-wrapper overflow-hidden rounded-xl" style=backdrop>
                <img id="item-image" class="w-full object-contain" src=image alt=name.clone() />
            </div>

            <div class="flex flex-col gap-3">
                <h1 id="item-name" class="text-2xl font-semibold">{name}</h1>
                <p id="item-price" class="text-xl">{format_price(item.price)}</p>
                <p class="text-sm">
                    "Condition: " <span id="item-condition">{condition}</span>
                </p>
                <p class="text-sm">
                    "Seller: "
                    {match seller_id {
                        Some(sid) => view! {
                            <a id="seller-name" class="underline" href=format!("/profile/{sid}")>
                                {seller_name}
                            </a>
                        }
                        .into_any(),
                        None => view! { <span id="seller-name">{seller_name}</span> }.into_any(),
                    }}
                </p>
                <p id="item-description" class="whitespace-pre-wrap text-sm text-muted-foreground">
                    {description}
                </p>
                <div id="payment-options" class="flex flex-wrap gap-3 text-sm">
                    {payment_options}
                </div>

                <Show when=move || is_owner>
                    <div id="owner-actions" class="flex gap-2 pt-2">
                        <a href=format!("/item/{id}/edit")>
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm attr:id="edit-item-btn">
                                "Edit"
                            </Button>
                        </a>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:id="delete-item-btn"
                            on:click=move |_| confirm_open.set(true)
                        >
                            "Delete"
                        </Button>
                    </div>
                </Show>

                <ChatPanel item_id=id />
            </div>
        </article>

        <ConfirmModal
            open=confirm_open
            title="Delete item?"
            message="This listing will be removed permanently."
            on_confirm=on_delete
        />
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::models::Seller;
    use crate::state::AppState;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_detail(item: Item) -> web_sys::HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let host: web_sys::HtmlElement = document.create_element("div").unwrap().unchecked_into();
        document.body().unwrap().append_child(&host).unwrap();
        let handle = leptos::mount::mount_to(host.clone(), move || {
            provide_context(AppContext(AppState::new()));
            view! {
                <leptos_router::components::Router>
                    <ItemDetail item=item.clone() />
                </leptos_router::components::Router>
            }
        });
        handle.forget();
        host
    }

    fn sample(is_owner: bool) -> Item {
        Item {
            id: 5,
            seller_id: Some(8),
            name: Some("Bike".to_string()),
            description: Some("Red".to_string()),
            item_photos: None,
            price: Some(40.0),
            condition: None,
            payment_options: vec!["Cash".to_string(), "PayPal".to_string()],
            bookmarked: false,
            is_owner,
            seller: Some(Seller {
                id: 8,
                first_name: Some("Ada".to_string()),
                last_name: Some("King".to_string()),
            }),
        }
    }

    #[wasm_bindgen_test]
    fn test_detail_fields_and_fallbacks() {
        let host = mount_detail(sample(false));
        let text = |sel: &str| {
            host.query_selector(sel)
                .unwrap()
                .and_then(|e| e.text_content())
                .unwrap_or_default()
        };
        assert_eq!(text("#item-condition"), "—");
        assert_eq!(text("#item-price"), "$40.00");
        assert_eq!(text("#seller-name"), "Ada King");
        let link = host.query_selector("#seller-name").unwrap().unwrap();
        assert_eq!(link.get_attribute("href").as_deref(), Some("/profile/8"));

        // Icon only for exact known names; every option keeps its label.
        assert_eq!(host.query_selector_all(".payment-option").unwrap().length(), 2);
        assert_eq!(host.query_selector_all(".payment-option img").unwrap().length(), 1);
        assert!(host.query_selector("#owner-actions").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn test_owner_sees_actions() {
        let host = mount_detail(sample(true));
        assert!(host.query_selector("#edit-item-btn").unwrap().is_some());
        assert!(host.query_selector("#delete-item-btn").unwrap().is_some());
    }
}
