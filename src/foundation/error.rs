/// Convenience result type used across typebanner.
pub type TypebannerResult<T> = Result<T, TypebannerError>;

/// Top-level error taxonomy.
///
/// Missing or unreadable background images are not represented here: they degrade to a flat fill
/// inside the renderer and are only logged.
#[derive(thiserror::Error, Debug)]
pub enum TypebannerError {
    /// Invalid caller-provided input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single frame could not be rasterized.
    #[error("render error: {0}")]
    Render(String),

    /// No frame at all was produced for a sequence.
    #[error("empty sequence: {0}")]
    EmptySequence(String),

    /// The video writer failed to start, accept frames, or finalize the file.
    #[error("encode error: {0}")]
    Encode(String),

    /// The greeting could not be handed to the chat platform.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TypebannerError {
    /// Build a [`TypebannerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TypebannerError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TypebannerError::EmptySequence`] value.
    pub fn empty_sequence(msg: impl Into<String>) -> Self {
        Self::EmptySequence(msg.into())
    }

    /// Build a [`TypebannerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TypebannerError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`TypebannerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures that abort a whole assembly rather than a single frame.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Render(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
