//! Template system for SDK code generation
//!
//! Contains the Handlebars skeletons for every generated file. Method bodies
//! are assembled by the renderers and spliced in as pre-rendered sections.

use cpm_core::{Error, Result};
use handlebars::Handlebars;

const TEMPLATES: &[(&str, &str)] = &[
    ("csharp_contract", include_str!("csharp_contract.hbs")),
    ("go_onchain", include_str!("go_onchain.hbs")),
    ("go_offchain", include_str!("go_offchain.hbs")),
    ("java_onchain", include_str!("java_onchain.hbs")),
    ("java_offchain", include_str!("java_offchain.hbs")),
    ("python_init", include_str!("python_init.hbs")),
    ("python_onchain", include_str!("python_onchain.hbs")),
    ("python_offchain", include_str!("python_offchain.hbs")),
    ("ts_api", include_str!("ts_api.hbs")),
    ("ts_class", include_str!("ts_class.hbs")),
    ("ts_index", include_str!("ts_index.hbs")),
];

/// Template manager for SDK code generation
pub struct TemplateManager {
    handlebars: Handlebars<'static>,
}

impl TemplateManager {
    /// Create a new template manager and register all templates
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Generated sources are not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        Self::register_templates(&mut handlebars)?;

        Ok(Self { handlebars })
    }

    /// Register all built-in templates
    fn register_templates(handlebars: &mut Handlebars) -> Result<()> {
        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, *source)
                .map_err(|e| Error::template(format!("Failed to register {} template: {}", name, e)))?;
        }
        Ok(())
    }

    /// Render a template with the given data
    pub fn render(&self, template_name: &str, data: &serde_json::Value) -> Result<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| Error::template(format!("Failed to render template {}: {}", template_name, e)))
    }

    /// Get list of available templates
    pub fn available_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }
}
