use crate::api::FileUpload;
use crate::components::grid::ItemGrid;
use crate::components::ui::{Button, Spinner, TextArea};
use crate::models::{Item, User};
use crate::state::AppContext;
use crate::util::{
    alert, crop_to_square_jpeg, profile_display_name, resolve_profile_target, revoke_object_url,
    PreviewUrl, ProfileTarget, AVATAR_PLACEHOLDER, BIO_PLACEHOLDER,
};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use wasm_bindgen::JsCast;

const NO_LISTINGS: &str = "No listings yet.";
const LISTINGS_FAILED: &str = "There was an error loading listings.";

fn avatar_src(user: &User) -> String {
    user.profile_image
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(AVATAR_PLACEHOLDER)
        .to_string()
}

fn bio_text(user: &User) -> String {
    user.profile_description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(BIO_PLACEHOLDER)
        .to_string()
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;
    let location = use_location();
    let target = Memo::new(move |_| resolve_profile_target(&location.pathname.get()));

    let user: RwSignal<Option<User>> = RwSignal::new(None);
    let listings: RwSignal<Vec<Item>> = RwSignal::new(vec![]);
    let listings_failed: RwSignal<bool> = RwSignal::new(false);

    Effect::new(move |_| {
        let target = target.get();
        user.set(None);
        listings.set(vec![]);
        listings_failed.set(false);

        if target == ProfileTarget::Invalid {
            log::error!("invalid profile id in path");
            return;
        }

        let api = api_client.get_untracked();
        spawn_local(async move {
            let loaded = match &target {
                ProfileTarget::Other(id) => api.profile(*id).await,
                _ => api.profile_me().await,
            };
            let profile = match loaded {
                Ok(p) => p,
                Err(e) => {
                    log::error!("failed to load profile: {e}");
                    return;
                }
            };
            // The route moved on to another profile while loading.
            if profile_target_now(location.pathname) != target {
                return;
            }
            let seller_id = profile.id;
            let _ = user.try_set(Some(profile));

            match api.list_items(None, Some(seller_id)).await {
                Ok(items) => {
                    let _ = listings.try_set(items);
                }
                Err(e) => {
                    log::error!("failed to load listings for user {seller_id}: {e}");
                    let _ = listings_failed.try_set(true);
                }
            }
        });
    });

    let empty_message = move || {
        if listings_failed.get() {
            LISTINGS_FAILED
        } else {
            NO_LISTINGS
        }
    };

    view! {
        <Show when=move || user.get().is_some()>
            <section class="profile flex flex-col gap-6">
                <div class="flex items-center gap-4">
                    <img
                        id="profile-avatar"
                        class="size-20 rounded-full object-cover"
                        src=move || user.with(|u| u.as_ref().map(avatar_src).unwrap_or_default())
                        alt="Avatar"
                    />
                    <div class="flex flex-col gap-1">
                        <h1 id="profile-name" class="text-2xl font-semibold">
                            {move || user.with(|u| u.as_ref().map(profile_display_name).unwrap_or_default())}
                        </h1>
                        <p id="profile-bio" class="text-sm text-muted-foreground">
                            {move || user.with(|u| u.as_ref().map(bio_text).unwrap_or_default())}
                        </p>
                        <Show when=move || target.get().is_own()>
                            <a id="edit-profile-link" class="text-sm underline" href="/profile/edit">
                                "Edit profile"
                            </a>
                        </Show>
                    </div>
                </div>

                <h2 class="text-lg font-medium">"Listings"</h2>
                {move || {
                    view! {
                        <ItemGrid
                            id="profile-listings"
                            items=Signal::derive(move || listings.get())
                            empty_message=empty_message()
                        />
                    }
                }}
            </section>
        </Show>
    }
}

fn profile_target_now(pathname: Memo<String>) -> ProfileTarget {
    pathname
        .try_get_untracked()
        .map(|p| resolve_profile_target(&p))
        .unwrap_or(ProfileTarget::Invalid)
}

#[component]
pub fn EditProfilePage() -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;
    let navigate = StoredValue::new(use_navigate());

    let bio: RwSignal<String> = RwSignal::new(String::new());
    let preview: RwSignal<String> = RwSignal::new(AVATAR_PLACEHOLDER.to_string());
    let avatar: StoredValue<Option<FileUpload>> = StoredValue::new(None);
    let cropped_url: StoredValue<PreviewUrl> = StoredValue::new(PreviewUrl::default());
    let loaded: RwSignal<bool> = RwSignal::new(false);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let file_ref: NodeRef<html::Input> = NodeRef::new();

    let api = api_client.get_untracked();
    spawn_local(async move {
        match api.profile_me().await {
            Ok(user) => {
                let _ = bio.try_set(user.profile_description.clone().unwrap_or_default());
                let _ = preview.try_set(avatar_src(&user));
                let _ = loaded.try_set(true);
            }
            Err(e) => log::error!("failed to load profile for editing: {e}"),
        }
    });

    on_cleanup(move || {
        if let Some(url) = cropped_url.try_update_value(|p| p.take()).flatten() {
            revoke_object_url(&url);
        }
    });

    let open_picker = move |_: web_sys::MouseEvent| {
        if let Some(input) = file_ref.get_untracked() {
            input.click();
        }
    };

    let on_file_change = move |ev: web_sys::Event| {
        let Some(file) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|list| list.get(0))
        else {
            return;
        };
        if !file.type_().starts_with("image/") {
            alert("Please select an image file.");
            return;
        }

        spawn_local(async move {
            match crop_to_square_jpeg(&file).await {
                Ok(cropped) => {
                    let url = cropped.preview_url;
                    let replaced = cropped_url
                        .try_update_value(|p| p.replace(url.clone()))
                        .flatten();
                    if let Some(old) = replaced {
                        revoke_object_url(&old);
                    }
                    let _ = preview.try_set(url);
                    avatar.try_update_value(|a| *a = Some(cropped.upload));
                }
                Err(e) => log::error!("failed to crop avatar: {e:?}"),
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        saving.set(true);

        let api = api_client.get_untracked();
        let bio_value = bio.get_untracked();
        let upload = avatar.get_value();
        spawn_local(async move {
            match api.save_profile(&bio_value, upload).await {
                Ok(()) => {
                    log::info!("profile saved");
                    navigate.with_value(|nav| nav("/profile", Default::default()));
                }
                Err(e) => {
                    log::error!("failed to save profile: {e}");
                    alert("There was an error saving your profile.");
                }
            }
            let _ = saving.try_set(false);
        });
    };

    view! {
        <section class="mx-auto max-w-xl">
            <h1 class="mb-6 text-2xl font-semibold">"Edit profile"</h1>
            <Show when=move || loaded.get() fallback=|| view! { <Spinner class="size-6" /> }>
                <form id="edit-profile-form" class="flex flex-col gap-4" on:submit=on_submit>
                    <div class="avatar-wrapper relative size-24">
                        <img
                            id="edit-profile-avatar-preview"
                            class="size-24 rounded-full object-cover"
                            src=move || preview.get()
                            alt="Avatar preview"
                        />
                        <button
                            type="button"
                            class="avatar-overlay absolute inset-0 rounded-full bg-black/40 text-xs text-white opacity-0 hover:opacity-100"
                            on:click=open_picker
                        >
                            "Change"
                        </button>
                        <input
                            id="avatar-input"
                            class="hidden"
                            type="file"
                            accept="image/*"
                            node_ref=file_ref
                            on:change=on_file_change
                        />
                    </div>
                    <TextArea id="edit-profile-bio" name="profile_description" bind_value=bio />
                    <Button attr:disabled=move || saving.get()>"Save"</Button>
                </form>
            </Show>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, bio: Option<&str>, image: Option<&str>) -> User {
        User {
            id: 1,
            first_name: first.map(str::to_string),
            last_name: None,
            profile_description: bio.map(str::to_string),
            profile_image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_avatar_and_bio_fallbacks() {
        let blank = user(None, Some("   "), Some(""));
        assert_eq!(avatar_src(&blank), "/static/assets/avatar.svg");
        assert_eq!(bio_text(&blank), BIO_PLACEHOLDER);
        assert_eq!(profile_display_name(&blank), "User");

        let filled = user(Some("Ada"), Some(" Hi "), Some("/static/uploads/a.jpg"));
        assert_eq!(avatar_src(&filled), "/static/uploads/a.jpg");
        assert_eq!(bio_text(&filled), "Hi");
        assert_eq!(profile_display_name(&filled), "Ada");
    }
}
