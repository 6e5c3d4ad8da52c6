use crate::components::grid::ItemGrid;
use crate::state::{AppContext, FilterMode, ItemStore};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;

#[component]
pub fn BrowsePage() -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;

    // Lives exactly as long as this page; filter resets to All on every visit.
    let store: RwSignal<ItemStore> = RwSignal::new(ItemStore::new());

    // Load guard: only the newest search may replace the snapshot.
    let request_id: RwSignal<u64> = RwSignal::new(0);

    let load_items = move |query: String| {
        let req = request_id.get_untracked().wrapping_add(1);
        request_id.set(req);

        let api = api_client.get_untracked();
        spawn_local(async move {
            let result = api.list_items(Some(&query), None).await;
            if request_id.try_get_untracked() != Some(req) {
                log::debug!("dropping stale item list for query {query:?}");
                return;
            }
            match result {
                // On failure the previous snapshot stays on screen.
                Ok(items) => store.update(|s| s.replace(items)),
                Err(e) => log::error!("failed to load items: {e}"),
            }
        });
    };

    let api = api_client.get_untracked();
    spawn_local(async move {
        match api.profile_me().await {
            Ok(user) => {
                log::info!("current user id: {}", user.id);
                store.try_update(|s| s.set_viewer(user.id));
            }
            Err(e) => log::error!("failed to load current user: {e}"),
        }
    });
    load_items(String::new());

    let visible = Memo::new(move |_| store.with(|s| s.visible_items()));

    let on_search = move |ev: web_sys::Event| {
        load_items(event_target_value(&ev).trim().to_string());
    };

    view! {
        <section class="browse flex flex-col gap-4">
            <div class="flex flex-wrap items-center gap-3">
                <div class="search flex-1">
                    <input
                        type="search"
                        class="border-input h-9 w-full rounded-md border bg-transparent px-3 text-sm"
                        placeholder="Search items"
                        on:input=on_search
                    />
                </div>
                <FilterMenu store=store />
            </div>
            <ItemGrid items=visible store=store />
        </section>
    }
}

/// "All Items / Bookmarks / Your Items" dropdown.
#[component]
fn FilterMenu(store: RwSignal<ItemStore>) -> impl IntoView {
    let expanded: RwSignal<bool> = RwSignal::new(false);
    let root_ref: NodeRef<html::Div> = NodeRef::new();

    let outside_click = window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
        let inside = match (
            root_ref.get_untracked(),
            ev.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok()),
        ) {
            (Some(root), Some(target)) => root.contains(Some(&target)),
            _ => false,
        };
        if !inside {
            let _ = expanded.try_set(false);
        }
    });
    let escape = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            let _ = expanded.try_set(false);
        }
    });
    on_cleanup(move || {
        outside_click.remove();
        escape.remove();
    });

    // One listener for the whole menu; the option is identified by its data-value.
    let on_pick = move |ev: web_sys::MouseEvent| {
        let value = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest("[data-value]").ok().flatten())
            .and_then(|el| el.get_attribute("data-value"));
        if let Some(value) = value {
            store.update(|s| s.set_filter(FilterMode::from_value(&value)));
            expanded.set(false);
        }
    };

    let label = move || format!("{} ▾", store.with(|s| s.filter()).menu_label());

    view! {
        <div class="relative" node_ref=root_ref>
            <button
                id="categoryFilter"
                type="button"
                class="h-9 rounded-md border px-3 text-sm"
                aria-haspopup="true"
                aria-expanded=move || expanded.get().to_string()
                on:click=move |_| expanded.update(|v| *v = !*v)
            >
                {label}
            </button>
            <div
                id="categoryMenu"
                class="absolute right-0 z-10 mt-1 flex w-40 flex-col rounded-md border bg-card py-1 shadow-md"
                class:hidden=move || !expanded.get()
                on:click=on_pick
            >
                {FilterMode::iter()
                    .map(|mode| {
                        view! {
                            <button
                                type="button"
                                class="px-3 py-1.5 text-left text-sm hover:bg-accent"
                                data-value=mode.as_ref().to_string()
                            >
                                {mode.menu_label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
