use crate::components::layout::Shell;
use crate::pages::{
    BrowsePage, CreateItemPage, EditItemPage, EditProfilePage, ItemPage, ProfilePage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Static segments are listed before their `:id` siblings.
    view! {
        <Router>
            <Routes fallback=|| view! {
                <Shell>
                    <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div>
                </Shell>
            }>
                <Route path=path!("") view=move || view! { <Shell><BrowsePage /></Shell> } />
                <Route path=path!("item/new") view=move || view! { <Shell><CreateItemPage /></Shell> } />
                <Route path=path!("item/:id") view=move || view! { <Shell><ItemPage /></Shell> } />
                <Route path=path!("item/:id/edit") view=move || view! { <Shell><EditItemPage /></Shell> } />
                <Route path=path!("profile") view=move || view! { <Shell><ProfilePage /></Shell> } />
                <Route path=path!("profile/edit") view=move || view! { <Shell><EditProfilePage /></Shell> } />
                <Route path=path!("profile/:id") view=move || view! { <Shell><ProfilePage /></Shell> } />
            </Routes>
        </Router>
    }
}
