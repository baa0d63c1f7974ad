//! Chat request/response types.

use crate::error::{Result, SoraChatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-5-pro";

/// Default system instruction sent ahead of every prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are GPT5 PRO, an advanced AI assistant with enhanced reasoning capabilities.";

/// An image attached to a chat prompt, carried inline as base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type (e.g., "image/png").
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl InlineImage {
    /// Creates an inline image from an already-encoded base64 payload.
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64_data.into(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        use base64::Engine;
        Self::new(
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(bytes),
        )
    }

    /// Reads an image file, guessing the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let mime_type = mime_type_for_extension(ext).ok_or_else(|| {
            SoraChatError::InvalidRequest(format!(
                "unsupported image type: {}",
                path.display()
            ))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(mime_type, &bytes))
    }

    /// Returns the image as a data URI.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A single-turn chat request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// System instruction describing the assistant.
    pub system_prompt: String,
    /// The user's prompt.
    pub user_prompt: String,
    /// Optional image sent alongside the prompt.
    pub inline_image: Option<InlineImage>,
}

impl ChatRequest {
    /// Creates a request with the default model and system prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: prompt.into(),
            inline_image: None,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Attaches an inline image.
    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.inline_image = Some(image);
        self
    }

    /// Builds the two-entry message list: system, then user.
    ///
    /// With an image the user content is `[text, image_url]`, in that order.
    pub(crate) fn messages(&self) -> Vec<ChatMessage> {
        let user_content = match &self.inline_image {
            None => MessageContent::Text(self.user_prompt.clone()),
            Some(image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: self.user_prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                    },
                },
            ]),
        };

        vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(self.system_prompt.clone()),
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ]
    }
}

/// The assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResult {
    /// Reply text.
    pub text: String,
    /// Model reported by the server, if any.
    pub model: Option<String>,
}

// Wire types

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
