//! Named, predefined field sets used to bulk-initialize a schema.
//!
//! Templates are validated in full before the store is touched; an invalid
//! template never leaves a half-applied schema behind.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{StoreError, StoreResult};
use crate::schema::{FieldDef, Layout};

/// A named field set. Prototype field ids are placeholders; the store
/// assigns fresh ids on application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Layout the template ships with, if any
    #[serde(default)]
    pub layout: Option<Layout>,
    pub fields: Vec<FieldDef>,
}

/// How a template is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Replace the schema layout with the template's (when it has one)
    pub replace_layout: bool,
    /// Treat duplicate field names inside the template as invalid
    pub require_unique_names: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            replace_layout: true,
            require_unique_names: false,
        }
    }
}

/// The templates known to a store, looked up by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn register(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Validates a template payload before any store mutation.
///
/// Fails with [`StoreError::InvalidTemplateSchema`] on malformed fields,
/// an invalid layout, or (when required) duplicate names.
pub fn validate(template: &Template, options: &TemplateOptions) -> StoreResult<()> {
    if let Some(layout) = &template.layout {
        layout
            .check()
            .map_err(StoreError::InvalidTemplateSchema)?;
    }

    for field in &template.fields {
        field.check().map_err(|e| {
            StoreError::InvalidTemplateSchema(format!("field {:?}: {e}", field.name))
        })?;
    }

    if options.require_unique_names {
        let mut seen = HashSet::new();
        for field in &template.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(StoreError::InvalidTemplateSchema(format!(
                    "duplicate field name: {:?}",
                    field.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::generate_field_id;
    use crate::schema::FieldType;

    fn template_with_fields(fields: Vec<FieldDef>) -> Template {
        Template {
            id: "t1".to_string(),
            name: "Test".to_string(),
            layout: None,
            fields,
        }
    }

    #[test]
    fn well_formed_template_passes() {
        let template = template_with_fields(vec![
            FieldDef::new(generate_field_id(), "a", FieldType::Text, "A"),
            FieldDef::new(generate_field_id(), "b", FieldType::Number, "B"),
        ]);
        assert!(validate(&template, &TemplateOptions::default()).is_ok());
    }

    #[test]
    fn out_of_range_width_is_invalid() {
        let mut field = FieldDef::new(generate_field_id(), "a", FieldType::Text, "A");
        field.width = 150;
        let template = template_with_fields(vec![field]);
        let err = validate(&template, &TemplateOptions::default()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTemplateSchema(_)));
    }

    #[test]
    fn duplicate_names_only_rejected_when_required() {
        let template = template_with_fields(vec![
            FieldDef::new(generate_field_id(), "email", FieldType::Text, "Email"),
            FieldDef::new(generate_field_id(), "email", FieldType::Text, "Backup"),
        ]);

        assert!(validate(&template, &TemplateOptions::default()).is_ok());

        let strict = TemplateOptions {
            require_unique_names: true,
            ..Default::default()
        };
        assert!(validate(&template, &strict).is_err());
    }
}
