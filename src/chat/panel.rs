use super::{ChatConnection, ChatEvent, OpenTickets};
use crate::api::EnvConfig;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::models::{Item, User};
use crate::state::AppContext;
use icons::X;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::request_animation_frame;

/// Buyer/seller chat for one item. The socket lives only while the panel is open.
#[component]
pub fn ChatPanel(item_id: i64) -> impl IntoView {
    let api_client = expect_context::<AppContext>().0.api_client;

    let open: RwSignal<bool> = RwSignal::new(false);
    let messages: RwSignal<Vec<String>> = RwSignal::new(vec![]);
    let draft: RwSignal<String> = RwSignal::new(String::new());
    let session: RwSignal<Option<(Item, User)>> = RwSignal::new(None);
    let connection: StoredValue<Option<ChatConnection>, LocalStorage> =
        StoredValue::new_local(None);
    let tickets: StoredValue<OpenTickets> = StoredValue::new(OpenTickets::default());
    let list_ref: NodeRef<html::Div> = NodeRef::new();

    // Keep the newest line in view.
    Effect::new(move |_| {
        messages.track();
        request_animation_frame(move || {
            if let Some(list) = list_ref.get_untracked() {
                list.set_scroll_top(list.scroll_height());
            }
        });
    });

    let leave_event = move || {
        session
            .try_get_untracked()
            .flatten()
            .map(|(item, user)| ChatEvent::Leave { item, user })
    };

    // Drops the current socket (if any) after announcing `leave`.
    let disconnect = move || {
        tickets.try_update_value(|t| t.revoke());
        if let Some(conn) = connection.try_update_value(|c| c.take()).flatten() {
            conn.close(leave_event());
        }
    };

    on_cleanup(disconnect);

    let on_open = move |_: web_sys::MouseEvent| {
        if open.get_untracked() {
            return;
        }
        open.set(true);
        messages.set(vec![]);
        let Some(ticket) = tickets.try_update_value(|t| t.issue()) else {
            return;
        };

        let api = api_client.get_untracked();
        spawn_local(async move {
            let user = match api.profile_me().await {
                Ok(u) => u,
                Err(e) => {
                    log::error!("chat: failed to load current user: {e}");
                    return;
                }
            };
            let item = match api.get_item(item_id).await {
                Ok(i) => i,
                Err(e) => {
                    log::error!("chat: failed to load item {item_id}: {e}");
                    return;
                }
            };

            // Closed, reopened or unmounted while loading.
            if !tickets.try_with_value(|t| t.is_current(ticket)).unwrap_or(false) {
                return;
            }

            let join = ChatEvent::Join {
                item: item.clone(),
                user: user.clone(),
            };
            let on_line = move |line: String| {
                messages.try_update(|m| m.push(line));
            };
            match ChatConnection::open(&EnvConfig::new().chat_url, join, on_line) {
                Ok(conn) => {
                    session.set(Some((item, user)));
                    let replaced = connection.try_update_value(|c| c.replace(conn)).flatten();
                    if let Some(stale) = replaced {
                        stale.close(None);
                    }
                }
                Err(e) => log::error!("chat: {e}"),
            }
        });
    };

    let on_close = move |_: web_sys::MouseEvent| {
        disconnect();
        session.set(None);
        open.set(false);
    };

    let on_send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let message = draft.get_untracked();
        if message.trim().is_empty() {
            return;
        }

        // The sender is looked up again on every message.
        let api = api_client.get_untracked();
        spawn_local(async move {
            let user = match api.profile_me().await {
                Ok(u) => u,
                Err(e) => {
                    log::error!("chat: failed to load current user: {e}");
                    return;
                }
            };
            let sent = connection.with_value(|c| match c {
                Some(conn) => conn.emit(&ChatEvent::Send { message, user }),
                None => Ok(()),
            });
            if let Err(e) = sent {
                log::error!("chat: {e}");
            }
            let _ = draft.try_set(String::new());
        });
    };

    view! {
        <div class="chat">
            <Show
                when=move || open.get()
                fallback=move || view! {
                    <Button size=ButtonSize::Sm attr:id="open-chat" on:click=on_open>
                        "Message seller"
                    </Button>
                }
            >
                <div id="chatForm" class="chat-popup w-full max-w-sm rounded-xl border bg-card shadow-lg">
                    <div class="flex items-center justify-between border-b px-4 py-2">
                        <span class="text-sm font-medium">"Chat"</span>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:aria-label="Close chat"
                            on:click=on_close
                        >
                            <X />
                        </Button>
                    </div>
                    <div id="chat-messages" class="h-64 overflow-y-auto px-4 py-2 text-sm" node_ref=list_ref>
                        <For
                            each=move || messages.get().into_iter().enumerate()
                            key=|(i, _)| *i
                            children=|(_, line)| view! { <div class="chat-message">{line}</div> }
                        />
                    </div>
                    <form class="flex gap-2 border-t p-2" on:submit=on_send>
                        <Input id="msg" placeholder="Type a message" bind_value=draft class="h-8" />
                        <Button size=ButtonSize::Sm>"Send"</Button>
                    </form>
                </div>
            </Show>
        </div>
    }
}
