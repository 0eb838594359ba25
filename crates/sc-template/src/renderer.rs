//! Template loading and rendering
//!
//! Templates are plain text with `___TOKEN___` placeholders. On load the
//! text is translated into a minijinja template where every token becomes a
//! variable and everything else is wrapped in raw blocks, so T-SQL that
//! happens to contain `{` is never interpreted. Output is identical to
//! replacing every occurrence of every token with its value.

use crate::builtin;
use crate::context::PlaceholderValues;
use crate::error::{TemplateError, TemplateResult};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"___([A-Z][A-Z0-9]*)___").expect("valid regex"))
}

/// Where templates are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Builtin,
    /// `*.template` files in a directory
    Folder(PathBuf),
}

impl TemplateSource {
    /// Untranslated template text, `None` when the source has no such template
    fn read(&self, name: &str) -> std::io::Result<Option<String>> {
        match self {
            TemplateSource::Builtin => Ok(builtin::get(name).map(str::to_string)),
            TemplateSource::Folder(dir) => {
                if !is_plain_file_name(name) {
                    return Ok(None);
                }
                match std::fs::read_to_string(dir.join(name)) {
                    Ok(text) => Ok(Some(text)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Renders named templates from one [`TemplateSource`]
pub struct TemplateRenderer {
    env: Environment<'static>,
    source: TemplateSource,
}

impl TemplateRenderer {
    /// Renderer over the built-in templates
    pub fn builtin() -> Self {
        Self::with_source(TemplateSource::Builtin)
    }

    /// Renderer over a template folder
    pub fn from_folder(path: &Path) -> TemplateResult<Self> {
        if !path.is_dir() {
            return Err(TemplateError::TemplateFolderMissing {
                path: path.display().to_string(),
            });
        }
        Ok(Self::with_source(TemplateSource::Folder(path.to_path_buf())))
    }

    /// Built-in templates unless a folder is given
    pub fn for_folder(folder: Option<&Path>) -> TemplateResult<Self> {
        match folder {
            Some(path) => Self::from_folder(path),
            None => Ok(Self::builtin()),
        }
    }

    fn with_source(source: TemplateSource) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let loader_source = source.clone();
        env.set_loader(move |name| {
            let text = loader_source.read(name).map_err(|e| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template '{name}'"),
                )
                .with_source(e)
            })?;
            Ok(text.map(|t| translate(&t)))
        });

        Self { env, source }
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render a template, substituting every token occurrence.
    ///
    /// Values for tokens the template does not use are ignored. A token the
    /// template uses without a supplied value is an error.
    pub fn render(&self, name: &str, values: &PlaceholderValues) -> TemplateResult<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| self.map_error(name, values, e))?;
        template
            .render(values.as_map())
            .map_err(|e| self.map_error(name, values, e))
    }

    /// Tokens a template uses, in order of first appearance
    pub fn tokens(&self, name: &str) -> TemplateResult<Vec<String>> {
        let text = self.read_source(name)?;
        Ok(template_tokens(&text))
    }

    fn read_source(&self, name: &str) -> TemplateResult<String> {
        self.source
            .read(name)
            .map_err(|e| TemplateError::IoWithPath {
                path: name.to_string(),
                source: e,
            })?
            .ok_or_else(|| TemplateError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    fn map_error(
        &self,
        name: &str,
        values: &PlaceholderValues,
        err: minijinja::Error,
    ) -> TemplateError {
        match err.kind() {
            ErrorKind::TemplateNotFound => TemplateError::TemplateNotFound {
                name: name.to_string(),
            },
            ErrorKind::UndefinedError => {
                let missing = self
                    .tokens(name)
                    .ok()
                    .and_then(|tokens| tokens.into_iter().find(|t| !values.contains(t)));
                match missing {
                    Some(token) => TemplateError::MissingPlaceholder {
                        template: name.to_string(),
                        token,
                    },
                    None => TemplateError::from(err),
                }
            }
            _ => TemplateError::from(err),
        }
    }
}

/// Tokens used by template text, in order of first appearance
pub fn template_tokens(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for caps in token_re().captures_iter(text) {
        let token = &caps[1];
        if !found.iter().any(|t| t == token) {
            found.push(token.to_string());
        }
    }
    found
}

/// Translate `___TOKEN___` template text into minijinja source
fn translate(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    let mut last = 0;
    for caps in token_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut out, &text[last..whole.start()]);
        out.push_str("{{ ");
        out.push_str(&caps[1]);
        out.push_str(" }}");
        last = whole.end();
    }
    push_literal(&mut out, &text[last..]);
    out
}

fn push_literal(out: &mut String, literal: &str) {
    if literal.contains('{') {
        out.push_str("{% raw %}");
        out.push_str(literal);
        out.push_str("{% endraw %}");
    } else {
        out.push_str(literal);
    }
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;
