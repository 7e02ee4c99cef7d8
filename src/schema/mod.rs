// Schema document types: the form definition owned by the store.

mod field;
pub mod validation;

pub use field::{FieldDef, FieldPatch, FieldType, FieldValue};
pub use validation::{evaluate_field, CustomRules, RuleFailure, RuleKind, ValidationRule};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grid layout metadata for the whole form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Number of grid columns; must be greater than zero
    pub col_size: u32,
    /// Gap between cells, in layout units
    pub gap: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            col_size: 12,
            gap: 4,
        }
    }
}

impl Layout {
    /// Validates the layout constraints
    pub fn check(&self) -> Result<(), String> {
        if self.col_size == 0 {
            return Err("layout col_size must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// The full form definition document.
///
/// `fields` order is the canvas render order; there is no separate index
/// field. The document is only ever mutated through store actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Stable, externally assigned identifier
    pub id: String,
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub layout: Layout,
    pub fields: Vec<FieldDef>,
}

impl FormSchema {
    /// Creates an empty schema with default layout
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: "1".to_string(),
            title: title.into(),
            description: String::new(),
            layout: Layout::default(),
            fields: Vec::new(),
        }
    }

    /// Linear field lookup by id; projections over a snapshot use this,
    /// the store keeps its own constant-time index
    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Position of a field in render order
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Validates the structural invariants of the whole document: unique
    /// field ids, valid layout, well-formed fields
    pub fn check_invariants(&self) -> Result<(), String> {
        self.layout.check()?;
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(format!("duplicate field id: {}", field.id));
            }
            field
                .check()
                .map_err(|e| format!("field {}: {e}", field.id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::generate_field_id;

    #[test]
    fn zero_col_size_is_rejected() {
        let layout = Layout {
            col_size: 0,
            gap: 0,
        };
        assert!(layout.check().is_err());
    }

    #[test]
    fn duplicate_ids_fail_invariant_check() {
        let mut schema = FormSchema::new("form-1", "Test");
        let field = FieldDef::new(generate_field_id(), "a", FieldType::Text, "A");
        schema.fields.push(field.clone());
        schema.fields.push(field);
        assert!(schema.check_invariants().is_err());
    }

    #[test]
    fn empty_schema_is_well_formed() {
        let schema = FormSchema::new("form-1", "Test");
        assert!(schema.check_invariants().is_ok());
        assert!(schema.field("missing").is_none());
    }
}
