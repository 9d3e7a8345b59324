/// Convenience result type used across undula.
pub type UndulaResult<T> = Result<T, UndulaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Nothing in the engine surfaces errors to end users: hosts are expected to
/// treat any `Err` as "nothing drawn this frame" and carry on.
#[derive(thiserror::Error, Debug)]
pub enum UndulaError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors provisioning or addressing the backing pixel surface.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UndulaError {
    /// Build a [`UndulaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UndulaError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`UndulaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let e = UndulaError::validation("count must be > 0");
        assert_eq!(e.to_string(), "validation error: count must be > 0");
        let e = UndulaError::surface("width exceeds u16");
        assert_eq!(e.to_string(), "surface error: width exceeds u16");
    }

    #[test]
    fn anyhow_errors_wrap_transparently() {
        let e: UndulaError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(e.to_string(), "disk on fire");
    }
}
