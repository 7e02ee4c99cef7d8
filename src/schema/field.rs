use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationRule};
use super::Layout;
use crate::id::FieldId;

/// The kind of input a field represents.
///
/// Per-type behavior (default value, value compatibility) goes through the
/// exhaustive dispatch tables below, never through downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// The value a freshly spawned field of this type starts with
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Number => FieldValue::Empty,
            FieldType::Select => FieldValue::Empty,
            FieldType::Checkbox => FieldValue::Bool(false),
        }
    }

    /// Whether a value is compatible with this field type. `Empty` is
    /// compatible with every type; `Required` rules decide if that is
    /// acceptable, not the type system.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Empty) => true,
            (FieldType::Text, FieldValue::Text(_)) => true,
            (FieldType::Number, FieldValue::Number(_)) => true,
            // select stores the chosen option key
            (FieldType::Select, FieldValue::Text(_)) => true,
            (FieldType::Checkbox, FieldValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field's current value, tagged by shape rather than by field type so
/// that hosts can serialize it directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

/// One input element definition within a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Unique within the owning schema
    pub id: FieldId,
    /// Data key; uniqueness is a convention, not a structural invariant
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub value: FieldValue,
    /// Width as a percentage of the form, 0..=100
    pub width: u8,
    #[serde(default)]
    pub validations: Vec<ValidationRule>,
}

impl FieldDef {
    /// Creates a full-width field with the type's default value
    pub fn new(
        id: FieldId,
        name: impl Into<String>,
        field_type: FieldType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            label: label.into(),
            placeholder: String::new(),
            value: field_type.default_value(),
            width: 100,
            validations: Vec::new(),
        }
    }

    /// Effective column span for the given layout, always in
    /// `1..=col_size` so a rendered field never overflows the grid
    pub fn span(&self, layout: &Layout) -> u32 {
        let cols = (f64::from(self.width) / 100.0 * f64::from(layout.col_size)).round() as u32;
        cols.clamp(1, layout.col_size.max(1))
    }

    /// Validates this field in isolation: width range, value/type
    /// compatibility, well-formed validation rules
    pub fn check(&self) -> Result<(), String> {
        if self.width > 100 {
            return Err(format!("width {} exceeds 100", self.width));
        }
        if !self.field_type.accepts(&self.value) {
            return Err(format!(
                "value {:?} is not compatible with field type {}",
                self.value, self.field_type
            ));
        }
        validation::check_rules(&self.validations)
    }
}

/// Partial change set for [`FieldDef`]; `None` fields are left untouched.
///
/// Applied atomically by the store: the patched field is validated as a
/// whole before anything is committed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<FieldValue>,
    pub width: Option<u8>,
    pub validations: Option<Vec<ValidationRule>>,
}

impl FieldPatch {
    pub fn apply_to(&self, field: &mut FieldDef) {
        if let Some(name) = &self.name {
            field.name = name.clone();
        }
        if let Some(field_type) = self.field_type {
            field.field_type = field_type;
        }
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = placeholder.clone();
        }
        if let Some(value) = &self.value {
            field.value = value.clone();
        }
        if let Some(width) = self.width {
            field.width = width;
        }
        if let Some(validations) = &self.validations {
            field.validations = validations.clone();
        }
    }

    /// Builds the patch that would restore `current` after this patch is
    /// applied; used for undo
    pub fn capture_inverse(&self, current: &FieldDef) -> FieldPatch {
        FieldPatch {
            name: self.name.as_ref().map(|_| current.name.clone()),
            field_type: self.field_type.map(|_| current.field_type),
            label: self.label.as_ref().map(|_| current.label.clone()),
            placeholder: self.placeholder.as_ref().map(|_| current.placeholder.clone()),
            value: self.value.as_ref().map(|_| current.value.clone()),
            width: self.width.map(|_| current.width),
            validations: self.validations.as_ref().map(|_| current.validations.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::generate_field_id;

    #[test]
    fn default_values_match_types() {
        assert_eq!(
            FieldType::Checkbox.default_value(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            FieldType::Text.default_value(),
            FieldValue::Text(String::new())
        );
        assert!(FieldType::Number.default_value().is_empty());
    }

    #[test]
    fn incompatible_value_fails_check() {
        let mut field = FieldDef::new(generate_field_id(), "age", FieldType::Number, "Age");
        field.value = FieldValue::Bool(true);
        assert!(field.check().is_err());

        field.value = FieldValue::Number(42.0);
        assert!(field.check().is_ok());
    }

    #[test]
    fn span_stays_within_grid() {
        let layout = Layout {
            col_size: 12,
            gap: 0,
        };
        let mut field = FieldDef::new(generate_field_id(), "a", FieldType::Text, "A");

        field.width = 100;
        assert_eq!(field.span(&layout), 12);

        field.width = 50;
        assert_eq!(field.span(&layout), 6);

        // narrow fields still occupy at least one column
        field.width = 0;
        assert_eq!(field.span(&layout), 1);
    }

    #[test]
    fn patch_inverse_round_trips() {
        let mut field = FieldDef::new(generate_field_id(), "a", FieldType::Text, "A");
        let original = field.clone();

        let patch = FieldPatch {
            label: Some("B".to_string()),
            width: Some(50),
            ..Default::default()
        };
        let inverse = patch.capture_inverse(&field);

        patch.apply_to(&mut field);
        assert_eq!(field.label, "B");
        assert_eq!(field.width, 50);

        inverse.apply_to(&mut field);
        assert_eq!(field, original);
    }
}
