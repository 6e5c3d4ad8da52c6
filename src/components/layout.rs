use crate::components::ui::{Alert, AlertDescription};
use crate::state::AppContext;
use crate::util::current_year;
use icons::X;
use leptos::prelude::*;

/// Page chrome shared by every route: nav bar, notice banner and footer.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notice = app_state.0.notice;

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <header class="border-b">
                <nav class="mx-auto flex max-w-6xl items-center gap-4 px-4 py-3 text-sm">
                    <a href="/" class="font-semibold">"Marketplace"</a>
                    <div class="ml-auto flex items-center gap-4">
                        <a href="/item/new">"Sell an item"</a>
                        <a href="/profile">"Profile"</a>
                    </div>
                </nav>
            </header>

            <Show when=move || notice.get().is_some() fallback=|| ().into_view()>
                <div class="mx-auto max-w-6xl px-4 pt-3">
                    <Alert class="flex items-center justify-between border-destructive/30">
                        <AlertDescription class="text-destructive">
                            {move || notice.get().unwrap_or_default()}
                        </AlertDescription>
                        <button
                            type="button"
                            class="text-muted-foreground hover:text-foreground"
                            aria-label="Dismiss"
                            on:click=move |_| notice.set(None)
                        >
                            <X class="size-4" />
                        </button>
                    </Alert>
                </div>
            </Show>

            <main class="mx-auto max-w-6xl px-4 py-6">{children()}</main>

            <footer class="border-t py-6 text-center text-xs text-muted-foreground">
                "© " <span id="year">{current_year()}</span> " Marketplace"
            </footer>
        </div>
    }
}
