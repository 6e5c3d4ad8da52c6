//! Item chat channel: JSON event frames over a WebSocket.
//!
//! Every frame is `{"event": <name>, "args": [...]}`. Outbound events are
//! `join`/`leave` with `[item, user]` and `message` with `[text, user]`; the
//! server only ever pushes `message` with `[text]`.

mod panel;

pub(crate) use panel::ChatPanel;

use crate::models::{Item, User};
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ChatError {
    #[error("malformed chat frame: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("chat socket error: {0}")]
    Socket(String),
}

impl ChatError {
    fn socket(e: wasm_bindgen::JsValue) -> Self {
        Self::Socket(format!("{e:?}"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ChatEvent {
    Join { item: Item, user: User },
    Leave { item: Item, user: User },
    Send { message: String, user: User },
    Message(String),
}

#[derive(Serialize, Deserialize, Debug)]
struct Frame {
    event: String,
    #[serde(default)]
    args: Vec<serde_json::Value>,
}

impl ChatEvent {
    pub fn encode(&self) -> Result<String, ChatError> {
        let frame = match self {
            Self::Join { item, user } => Frame {
                event: "join".to_string(),
                args: vec![serde_json::to_value(item)?, serde_json::to_value(user)?],
            },
            Self::Leave { item, user } => Frame {
                event: "leave".to_string(),
                args: vec![serde_json::to_value(item)?, serde_json::to_value(user)?],
            },
            Self::Send { message, user } => Frame {
                event: "message".to_string(),
                args: vec![
                    serde_json::Value::String(message.clone()),
                    serde_json::to_value(user)?,
                ],
            },
            Self::Message(text) => Frame {
                event: "message".to_string(),
                args: vec![serde_json::Value::String(text.clone())],
            },
        };
        Ok(serde_json::to_string(&frame)?)
    }

    /// Parses an inbound frame. Events this client does not handle yield `None`.
    pub fn decode(text: &str) -> Result<Option<Self>, ChatError> {
        let frame: Frame = serde_json::from_str(text)?;
        if frame.event != "message" {
            return Ok(None);
        }

        let line = match frame.args.into_iter().next() {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Ok(Some(Self::Message(line)))
    }
}

/// Counts panel opens and closes so a slow open can tell it was superseded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct OpenTickets {
    current: u64,
}

impl OpenTickets {
    /// Starts a new open; every earlier ticket stops being current.
    pub fn issue(&mut self) -> u64 {
        self.current = self.current.wrapping_add(1);
        self.current
    }

    /// Invalidates any open still in flight.
    pub fn revoke(&mut self) {
        self.current = self.current.wrapping_add(1);
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current == ticket
    }
}

/// Open chat socket plus the JS callbacks it needs kept alive.
pub(crate) struct ChatConnection {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut()>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
}

impl ChatConnection {
    /// Connects, emits `join` once the socket opens and feeds every inbound
    /// message line to `on_line`.
    pub fn open(
        url: &str,
        join: ChatEvent,
        on_line: impl Fn(String) + 'static,
    ) -> Result<Self, ChatError> {
        let ws = WebSocket::new(url).map_err(ChatError::socket)?;
        let join_frame = join.encode()?;

        let ws_for_open = ws.clone();
        let on_open = Closure::<dyn FnMut()>::new(move || {
            if let Err(e) = ws_for_open.send_with_str(&join_frame) {
                log::error!("failed to join chat: {e:?}");
            }
        });
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(text) = ev.data().as_string() else {
                return;
            };
            match ChatEvent::decode(&text) {
                Ok(Some(ChatEvent::Message(line))) => on_line(line),
                Ok(_) => {}
                Err(e) => log::warn!("{e}"),
            }
        });
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        Ok(Self {
            ws,
            _on_open: on_open,
            _on_message: on_message,
        })
    }

    pub fn emit(&self, event: &ChatEvent) -> Result<(), ChatError> {
        let text = event.encode()?;
        self.ws.send_with_str(&text).map_err(ChatError::socket)
    }

    /// Sends `leave` (best effort) and closes the socket.
    pub fn close(self, leave: Option<ChatEvent>) {
        if let Some(leave) = leave {
            if let Err(e) = self.emit(&leave) {
                log::warn!("failed to leave chat: {e}");
            }
        }
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        if let Err(e) = self.ws.close() {
            log::warn!("failed to close chat socket: {e:?}");
        }
    }
}
