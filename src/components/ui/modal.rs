use crate::components::ui::button::{Button, ButtonSize, ButtonVariant};
use leptos::prelude::*;

/// Confirm/cancel gate rendered over the page while `open` is true.
#[component]
pub fn ConfirmModal(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into, default = "Delete".to_string())] confirm_label: String,
    on_confirm: Callback<()>,
) -> impl IntoView {
    view! {
        <div
            id="deleteModal"
            class="modal fixed inset-0 z-50 flex items-center justify-center bg-black/40"
            class:hidden=move || !open.get()
            role="dialog"
            aria-modal="true"
        >
            <div class="w-full max-w-sm rounded-xl border bg-card p-6 shadow-lg">
                <h3 class="text-lg font-semibold">{title}</h3>
                <p class="mt-2 text-sm text-muted-foreground">{message}</p>
                <div class="mt-6 flex justify-end gap-2">
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:id="cancelDelete"
                        on:click=move |_| open.set(false)
                    >
                        "Cancel"
                    </Button>
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        attr:id="confirmDelete"
                        on:click=move |_| on_confirm.run(())
                    >
                        {confirm_label}
                    </Button>
                </div>
            </div>
        </div>
    }
}
