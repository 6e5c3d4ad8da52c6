use crate::api::ItemFormData;
use crate::components::ui::{Button, Input, Label, Spinner, TextArea};
use crate::models::{Condition, Item, PaymentMethod};
use crate::pages::item::{ItemRouteParams, ITEM_LOAD_FAILED};
use crate::state::AppContext;
use crate::util::{alert, read_selected_file, revoke_object_url, thumbnail_src, PreviewUrl};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use strum::IntoEnumIterator;

/// Signals behind the create/edit item form.
#[derive(Clone, Copy)]
struct ItemFormState {
    name: RwSignal<String>,
    description: RwSignal<String>,
    price: RwSignal<String>,
    condition: RwSignal<String>,
    payment_options: RwSignal<Vec<String>>,
    preview: RwSignal<Option<String>>,
    local_preview: StoredValue<PreviewUrl>,
    file_ref: NodeRef<html::Input>,
    submitting: RwSignal<bool>,
}

impl ItemFormState {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            condition: RwSignal::new(Condition::default().to_string()),
            payment_options: RwSignal::new(vec![]),
            preview: RwSignal::new(None),
            local_preview: StoredValue::new(PreviewUrl::default()),
            file_ref: NodeRef::new(),
            submitting: RwSignal::new(false),
        }
    }

    fn prefill(&self, item: &Item) {
        self.name.set(item.name.clone().unwrap_or_default());
        self.description
            .set(item.description.clone().unwrap_or_default());
        self.price
            .set(item.price.map(|p| p.to_string()).unwrap_or_default());
        self.condition.set(
            item.condition
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| Condition::default().to_string()),
        );
        self.payment_options.set(item.payment_options.clone());
        self.preview.set(Some(thumbnail_src(item)));
    }

    /// Shows a freshly picked file, revoking the previous picked-file URL.
    fn show_local_preview(&self, url: String) {
        let replaced = self
            .local_preview
            .try_update_value(|p| p.replace(url.clone()))
            .flatten();
        if let Some(old) = replaced {
            revoke_object_url(&old);
        }
        let _ = self.preview.try_set(Some(url));
    }

    fn release_local_preview(&self) {
        if let Some(url) = self.local_preview.try_update_value(|p| p.take()).flatten() {
            revoke_object_url(&url);
        }
    }

    /// Claims the form for one submission. False while another is in flight.
    fn begin_submit(&self) -> bool {
        if self.submitting.get_untracked() {
            return false;
        }
        self.submitting.set(true);
        true
    }

    fn finish_submit(&self) {
        let _ = self.submitting.try_set(false);
    }

    /// Text fields only; the image is read separately because it is async.
    fn snapshot(&self) -> ItemFormData {
        ItemFormData {
            name: self.name.get_untracked(),
            description: self.description.get_untracked(),
            price: self.price.get_untracked(),
            condition: self.condition.get_untracked(),
            payment_options: self.payment_options.get_untracked(),
            image: None,
        }
    }

    /// Validates, then reads the picked image. `None` means the submit was refused.
    async fn collect(self) -> Option<ItemFormData> {
        let mut data = self.snapshot();
        if let Err(e) = data.validate() {
            alert(&e.to_string());
            return None;
        }
        if let Some(input) = self.file_ref.get_untracked() {
            match read_selected_file(&input).await {
                Ok(image) => data.image = image,
                Err(e) => {
                    log::error!("failed to read image file: {e:?}");
                    return None;
                }
            }
        }
        Some(data)
    }
}

#[component]
fn ItemFormFields(form: ItemFormState) -> impl IntoView {
    let on_file_change = move |_: web_sys::Event| {
        let Some(file) = form
            .file_ref
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|list| list.get(0))
        else {
            return;
        };
        match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => form.show_local_preview(url),
            Err(e) => log::warn!("image preview unavailable: {e:?}"),
        }
    };
    on_cleanup(move || form.release_local_preview());

    let toggle_payment = move |method: String, checked: bool| {
        form.payment_options.update(|list| {
            list.retain(|m| m != &method);
            if checked {
                list.push(method);
            }
        });
    };

    view! {
        <div class="flex flex-col gap-2">
            <Label html_for="name">"Name"</Label>
            <Input id="name" name="name" required=true bind_value=form.name />
        </div>
        <div class="flex flex-col gap-2">
            <Label html_for="description">"Description"</Label>
            <TextArea id="description" name="description" bind_value=form.description />
        </div>
        <div class="flex flex-col gap-2">
            <Label html_for="price">"Price"</Label>
            <Input id="price" name="price" placeholder="0.00" required=true bind_value=form.price />
        </div>
        <div class="flex flex-col gap-2">
            <Label html_for="condition">"Condition"</Label>
            <select
                id="condition"
                name="condition"
                class="border-input h-9 rounded-md border bg-transparent px-3 text-sm"
                prop:value=move || form.condition.get()
                on:change=move |ev| form.condition.set(event_target_value(&ev))
            >
                {Condition::iter()
                    .map(|c| {
                        let value = c.to_string();
                        let selected = {
                            let value = value.clone();
                            move || form.condition.get() == value
                        };
                        view! {
                            <option value=value.clone() selected=selected>{value.clone()}</option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
        <fieldset class="flex flex-col gap-2">
            <legend class="text-sm font-medium">"Payment options"</legend>
            <div class="flex gap-4">
                {PaymentMethod::iter()
                    .map(|m| {
                        let value = m.to_string();
                        let checked = {
                            let value = value.clone();
                            move || form.payment_options.with(|list| list.contains(&value))
                        };
                        let on_change = {
                            let value = value.clone();
                            move |ev: web_sys::Event| {
                                toggle_payment(value.clone(), event_target_checked(&ev))
                            }
                        };
                        view! {
                            <label class="flex items-center gap-2 text-sm">
                                <input
                                    type="checkbox"
                                    name="payment_options"
                                    value=value.clone()
                                    prop:checked=checked
                                    on:change=on_change
                                />
                                <img class="size-5" src=m.icon_src() alt="" />
                                {value.clone()}
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        </fieldset>
        <div class="flex flex-col gap-2">
            <Label html_for="fileInput">"Photo"</Label>
            <input
                id="fileInput"
                type="file"
                name="image_file"
                accept="image/*"
                node_ref=form.file_ref
                on:change=on_file_change
            />
            <Show when=move || form.preview.get().is_some()>
                <img
                    id="edit-image-preview"
                    class="max-h-48 w-fit rounded-md border object-contain"
                    src=move || form.preview.get().unwrap_or_default()
                    alt="Preview"
                />
            </Show>
        </div>
        <Button attr:disabled=move || form.submitting.get()>
            <Show when=move || form.submitting.get()>
                <Spinner />
            </Show>
            "Save"
        </Button>
    }
}

#[component]
pub fn CreateItemPage() -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;
    let navigate = StoredValue::new(use_navigate());
    let form = ItemFormState::new();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if !form.begin_submit() {
            return;
        }

        let api = api_client.get_untracked();
        spawn_local(async move {
            let Some(data) = form.collect().await else {
                form.finish_submit();
                return;
            };

            match api.create_item(data).await {
                Ok(Some(id)) => {
                    log::info!("created item {id}");
                    navigate.with_value(|nav| nav(&format!("/item/{id}"), Default::default()));
                }
                Ok(None) => {
                    log::warn!("create item response had no id");
                    alert("Item created but response was missing ID.");
                }
                Err(e) => {
                    log::error!("failed to create item: {e}");
                    alert("There was an error creating the item.");
                }
            }
            form.finish_submit();
        });
    };

    view! {
        <section class="mx-auto max-w-xl">
            <h1 class="mb-6 text-2xl font-semibold">"List an item"</h1>
            <form id="createForm" class="flex flex-col gap-4" on:submit=on_submit>
                <ItemFormFields form=form />
            </form>
        </section>
    }
}

#[component]
pub fn EditItemPage() -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;
    let navigate = StoredValue::new(use_navigate());
    let params = use_params::<ItemRouteParams>();
    let item_id = move || params.get().ok().and_then(|p| p.id);

    let form = ItemFormState::new();
    let loaded: RwSignal<Option<bool>> = RwSignal::new(None);

    Effect::new(move |_| {
        let Some(id) = item_id() else {
            loaded.set(Some(false));
            return;
        };
        let api = api_client.get_untracked();
        spawn_local(async move {
            match api.get_item(id).await {
                Ok(item) => {
                    form.prefill(&item);
                    let _ = loaded.try_set(Some(true));
                }
                Err(e) => {
                    log::error!("failed to load item {id} for editing: {e}");
                    let _ = loaded.try_set(Some(false));
                }
            }
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = params.get_untracked().ok().and_then(|p| p.id) else {
            return;
        };
        if !form.begin_submit() {
            return;
        }

        let api = api_client.get_untracked();
        spawn_local(async move {
            let Some(data) = form.collect().await else {
                form.finish_submit();
                return;
            };

            match api.update_item(id, data).await {
                Ok(()) => {
                    log::info!("updated item {id}");
                    navigate.with_value(|nav| nav(&format!("/item/{id}"), Default::default()));
                }
                Err(e) => {
                    log::error!("failed to update item {id}: {e}");
                    alert("There was an error saving your changes.");
                }
            }
            form.finish_submit();
        });
    };

    view! {
        <section class="mx-auto max-w-xl">
            <h1 class="mb-6 text-2xl font-semibold">"Edit item"</h1>
            {move || match loaded.get() {
                None => view! { <Spinner class="size-6" /> }.into_any(),
                Some(false) => view! {
                    <p class="error-msg text-muted-foreground">{ITEM_LOAD_FAILED}</p>
                }
                .into_any(),
                Some(true) => view! {
                    <form id="editForm" class="flex flex-col gap-4" on:submit=on_submit>
                        <ItemFormFields form=form />
                    </form>
                }
                .into_any(),
            }}
        </section>
    }
}
