//! Chat completions (text and vision).

mod client;
mod types;

pub use client::{ChatClient, ChatClientBuilder};
pub use types::{ChatRequest, ChatResult, InlineImage, DEFAULT_CHAT_MODEL, DEFAULT_SYSTEM_PROMPT};
