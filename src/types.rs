//! Request and response records for the chat-completions wire format.

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation.
    System,
    /// The person asking.
    User,
}

/// One role/content pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model to answer with.
    pub model: String,
    /// Optional system message followed by exactly one user message.
    pub messages: Vec<Message>,
    /// Always true; replies are consumed incrementally.
    pub stream: bool,
}

impl ChatRequest {
    /// Builds a streaming request for `prompt`.
    ///
    /// The system message is only included when `system_prompt` is non-empty.
    /// The prompt is sent verbatim.
    pub fn new(model: impl Into<String>, system_prompt: &str, prompt: impl Into<String>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(Message::system(system_prompt));
        }
        messages.push(Message::user(prompt));
        Self {
            model: model.into(),
            messages,
            stream: true,
        }
    }
}

/// One `data:` payload of a streamed reply.
///
/// Only the fields needed to recover the text are modeled; everything else
/// the provider sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatChunk {
    /// Incremental choices; only the first is rendered.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A single choice within a [`ChatChunk`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChunkChoice {
    /// The increment carried by this choice.  `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub delta: Delta,
}

/// Incremental content of a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Delta {
    /// Text to append to the reply.  Absent and `null` both read as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatChunk {
    /// The first choice's content, if the chunk has any choice at all.
    pub fn first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|choice| choice.delta.content)
    }
}
