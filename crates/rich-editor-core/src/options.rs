//! Editor configuration.

use rich_editor_schema::ElementSchema;

use crate::undo::DEFAULT_UNDO_MAX_SIZE;

/// Options used to build an [`Editor`](crate::Editor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Element classification.
    pub schema: ElementSchema,
    /// Tag of the editable root element.
    pub root_tag: String,
    /// Serialized content loaded at construction.
    pub initial_content: Option<String>,
    /// Cap on the total content chars kept in undo history.
    pub undo_max_size: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            schema: ElementSchema::default(),
            root_tag: "div".to_string(),
            initial_content: None,
            undo_max_size: DEFAULT_UNDO_MAX_SIZE,
        }
    }
}

impl EditorOptions {
    /// Use a custom element schema.
    pub fn with_schema(mut self, schema: ElementSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Use a different root tag.
    pub fn with_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.root_tag = tag.into();
        self
    }

    /// Load `content` at construction.
    pub fn with_initial_content(mut self, content: impl Into<String>) -> Self {
        self.initial_content = Some(content.into());
        self
    }

    /// Change the undo history size cap.
    pub fn with_undo_max_size(mut self, max_size: usize) -> Self {
        self.undo_max_size = max_size;
        self
    }
}
