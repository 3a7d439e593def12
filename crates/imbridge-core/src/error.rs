//! Error types for imbridge

use std::collections::HashMap;
use thiserror::Error;

use crate::texture::TextureId;

/// Where and while doing what an error happened
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation in progress, e.g. `create_texture`
    pub operation: String,
    /// Subsystem that failed, e.g. `registry`
    pub component: String,
    /// Free-form key/value details
    pub metadata: HashMap<String, String>,
    /// Call path if available
    pub call_path: Option<String>,
}

impl ErrorContext {
    /// Context for `operation` in `component`
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            metadata: HashMap::new(),
            call_path: None,
        }
    }

    /// Attach a key/value pair
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Record the call path leading to the failure
    pub fn with_call_path(mut self, path: impl Into<String>) -> Self {
        self.call_path = Some(path.into());
        self
    }

    /// Single-line `key=value` rendering
    pub fn format_for_log(&self) -> String {
        let mut parts = vec![
            format!("operation={}", self.operation),
            format!("component={}", self.component),
        ];

        if !self.metadata.is_empty() {
            let mut entries: Vec<_> = self.metadata.iter().collect();
            entries.sort();
            let metadata_str = entries
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("metadata=[{}]", metadata_str));
        }

        if let Some(ref path) = self.call_path {
            parts.push(format!("call_path={}", path));
        }

        parts.join(", ")
    }
}

/// Main error type for bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host failed to allocate a GPU texture
    #[error("Texture creation failed: {message}")]
    TextureCreation {
        message: String,
        context: Option<ErrorContext>,
    },

    /// The host failed to upload pixels into an existing texture
    #[error("Texture upload failed: {message}")]
    TextureUpload {
        message: String,
        context: Option<ErrorContext>,
    },

    /// A handle was used that the registry never handed out or already released
    #[error("Texture handle {handle} is not registered")]
    TextureNotRegistered { handle: u64 },

    /// A descriptor asked for an update before it was ever assigned a handle
    #[error("Texture descriptor {uid} has no assigned handle")]
    TextureUnassigned { uid: u32 },

    #[error("Renderer error: {message}")]
    Renderer {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Create a texture creation error with context
    pub fn texture_creation_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::TextureCreation {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a texture upload error with context
    pub fn texture_upload_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::TextureUpload {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Renderer error carrying `context`
    pub fn renderer_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Renderer {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Initialization error without context
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Self::Initialization {
            message: msg.into(),
            context: None,
        }
    }

    /// Configuration error without context
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration {
            message: msg.into(),
            context: None,
        }
    }

    /// Error for a handle that does not name an occupied registry slot
    pub fn not_registered(handle: Option<TextureId>) -> Self {
        Self::TextureNotRegistered {
            handle: TextureId::to_raw(handle),
        }
    }

    /// Context attached to this error
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::TextureCreation { context, .. }
            | Self::TextureUpload { context, .. }
            | Self::Renderer { context, .. }
            | Self::Initialization { context, .. }
            | Self::Configuration { context, .. } => context.as_ref(),
            Self::TextureNotRegistered { .. }
            | Self::TextureUnassigned { .. }
            | Self::Io(_)
            | Self::Serialization(_) => None,
        }
    }

    /// Whether this error is a caller bug rather than a runtime failure
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::TextureNotRegistered { .. } | Self::TextureUnassigned { .. }
        )
    }

    /// Error message followed by its context, if any
    pub fn format_for_log(&self) -> String {
        let base_msg = self.to_string();
        if let Some(context) = self.context() {
            format!("{} [{}]", base_msg, context.format_for_log())
        } else {
            base_msg
        }
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
