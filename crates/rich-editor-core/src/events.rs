//! Content-changed notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What caused a content change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeSource {
    /// A URL was turned into a link while typing.
    AutoLink,
    /// A link was created explicitly.
    CreateLink,
    /// A formatting command ran.
    Format,
    /// An image was resized.
    ImageResize,
    /// Content was pasted.
    Paste,
    /// The whole content was replaced.
    SetContent,
    /// Content was cut.
    Cut,
    /// Content was dropped.
    Drop,
    /// An undo step was applied.
    Undo,
    /// A redo step was applied.
    Redo,
    /// Any other, caller-defined source.
    Other(String),
}

impl ChangeSource {
    /// Stable string form of the source.
    pub fn as_str(&self) -> &str {
        match self {
            ChangeSource::AutoLink => "AutoLink",
            ChangeSource::CreateLink => "CreateLink",
            ChangeSource::Format => "Format",
            ChangeSource::ImageResize => "ImageResize",
            ChangeSource::Paste => "Paste",
            ChangeSource::SetContent => "SetContent",
            ChangeSource::Cut => "Cut",
            ChangeSource::Drop => "Drop",
            ChangeSource::Undo => "Undo",
            ChangeSource::Redo => "Redo",
            ChangeSource::Other(other) => other,
        }
    }
}

impl From<&str> for ChangeSource {
    fn from(value: &str) -> Self {
        match value {
            "AutoLink" => ChangeSource::AutoLink,
            "CreateLink" => ChangeSource::CreateLink,
            "Format" => ChangeSource::Format,
            "ImageResize" => ChangeSource::ImageResize,
            "Paste" => ChangeSource::Paste,
            "SetContent" => ChangeSource::SetContent,
            "Cut" => ChangeSource::Cut,
            "Drop" => ChangeSource::Drop,
            "Undo" => ChangeSource::Undo,
            "Redo" => ChangeSource::Redo,
            other => ChangeSource::Other(other.to_string()),
        }
    }
}

impl From<String> for ChangeSource {
    fn from(value: String) -> Self {
        ChangeSource::from(value.as_str())
    }
}

impl From<ChangeSource> for String {
    fn from(value: ChangeSource) -> Self {
        match value {
            ChangeSource::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to content-changed observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChangedEvent {
    /// What caused the change.
    pub source: ChangeSource,
    /// Optional data attached by the emitter (for transactions, the callback's return value).
    pub data: Option<serde_json::Value>,
}

/// Observer callback registered with [`Editor::subscribe`](crate::Editor::subscribe).
pub type ContentChangedCallback = Box<dyn FnMut(&ContentChangedEvent)>;
