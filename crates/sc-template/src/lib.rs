//! sc-template - Template rendering for Schemacheck
//!
//! Test templates are plain T-SQL files with `___TOKEN___` placeholders.
//! They are served either from a template folder or from the built-in set
//! compiled into the binary, and rendered through minijinja.

pub mod builtin;
pub mod context;
pub mod error;
pub mod renderer;

pub use context::{tokens, PlaceholderValues, RenderContext};
pub use error::{TemplateError, TemplateResult};
pub use renderer::{template_tokens, TemplateRenderer, TemplateSource};
