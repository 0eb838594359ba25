//! Error types for sc-template

use thiserror::Error;

/// Template loading and rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No template with this name in the active source (T001)
    #[error("[T001] Template not found: {name}")]
    TemplateNotFound { name: String },

    /// Template uses a token nobody supplied a value for (T002)
    #[error("[T002] Template '{template}' uses placeholder ___{token}___ but no value was supplied")]
    MissingPlaceholder { template: String, token: String },

    /// Template render error (T003)
    #[error("[T003] Template render error: {0}")]
    RenderError(String),

    /// Template folder does not exist (T004)
    #[error("[T004] Template folder not found: {path}")]
    TemplateFolderMissing { path: String },

    /// IO error with file path context (T005)
    #[error("[T005] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for TemplateError
pub type TemplateResult<T> = Result<T, TemplateError>;

impl From<minijinja::Error> for TemplateError {
    fn from(err: minijinja::Error) -> Self {
        TemplateError::RenderError(err.to_string())
    }
}
