use std::collections::HashMap;
use std::sync::LazyLock;

use handlebars::{no_escape, Handlebars};
use indexmap::IndexSet;
use log::debug;
use regex::Regex;

use crate::command_definitions::VariableRecord;
use crate::error::Result;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("Invalid placeholder regex")
});

/// Turns a stored command into the text that gets printed.
pub trait Renderer {
    /// Substitutes `bindings` into `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a valid template.
    fn render(&self, text: &str, bindings: &HashMap<String, String>) -> Result<String>;
}

/// Renders `{{ name }}` placeholders.
///
/// Everything outside double braces is copied as is, so shell syntax such as
/// `${HOME}`, `{a,b}` or `find -exec rm {} \;` survives rendering. Unbound
/// names render as empty and values are not HTML-escaped.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);

        Self { handlebars }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the text untouched.
pub struct RawRenderer;

impl Renderer for TemplateRenderer {
    fn render(&self, text: &str, bindings: &HashMap<String, String>) -> Result<String> {
        for name in get_placeholders(text) {
            if !bindings.contains_key(&name) {
                debug!("No variable named `{name}`, rendering it empty");
            }
        }

        Ok(self.handlebars.render_template(text, bindings)?)
    }
}

impl Renderer for RawRenderer {
    fn render(&self, text: &str, _bindings: &HashMap<String, String>) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Picks the renderer for an invocation.
pub fn renderer_for(no_render: bool) -> Box<dyn Renderer> {
    if no_render {
        Box::new(RawRenderer)
    } else {
        Box::new(TemplateRenderer::new())
    }
}

/// Builds the flat name to value lookup used for rendering.
pub fn build_bindings(variables: &[VariableRecord]) -> HashMap<String, String> {
    variables
        .iter()
        .map(|variable| (variable.name.clone(), variable.value.clone()))
        .collect()
}

/// Find all placeholders of a command, in order of first appearance.
pub fn get_placeholders(text: &str) -> IndexSet<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}
