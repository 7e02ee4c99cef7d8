//! Toolbox catalog: the palette items that spawn new fields, plus the pure
//! read projections the toolbox and drag overlay render from.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldDef, FieldType, FormSchema};

/// Palette entry spawning a blank field of one type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTypeDef {
    pub kind: FieldType,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl FieldTypeDef {
    pub fn new(kind: FieldType, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            icon: None,
            image: None,
        }
    }
}

/// Palette entry spawning a preconfigured field (label, width, validations
/// already filled in). The prototype's id is replaced on spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetTypeDef {
    pub name: String,
    pub label: String,
    pub prototype: FieldDef,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A toolbox palette item; not part of the live schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolboxItem {
    FieldType(FieldTypeDef),
    Preset(PresetTypeDef),
}

impl ToolboxItem {
    pub fn label(&self) -> &str {
        match self {
            ToolboxItem::FieldType(def) => &def.label,
            ToolboxItem::Preset(def) => &def.label,
        }
    }

    /// Resolves the display for a palette item. An image always takes
    /// precedence over an icon.
    pub fn thumbnail(&self) -> Thumbnail<'_> {
        let (image, icon) = match self {
            ToolboxItem::FieldType(def) => (def.image.as_deref(), def.icon.as_deref()),
            ToolboxItem::Preset(def) => (def.image.as_deref(), def.icon.as_deref()),
        };
        match (image, icon) {
            (Some(image), _) => Thumbnail::Image(image),
            (None, Some(icon)) => Thumbnail::Icon(icon),
            (None, None) => Thumbnail::Placeholder,
        }
    }
}

/// Resolved thumbnail display for a toolbox item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumbnail<'a> {
    Image(&'a str),
    Icon(&'a str),
    Placeholder,
}

/// The palette shown beside the canvas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Toolbox {
    items: Vec<ToolboxItem>,
}

impl Toolbox {
    pub fn new(items: Vec<ToolboxItem>) -> Self {
        Self { items }
    }

    /// A palette with one entry per field type
    pub fn standard() -> Self {
        let items = [
            (FieldType::Text, "Text"),
            (FieldType::Number, "Number"),
            (FieldType::Select, "Select"),
            (FieldType::Checkbox, "Checkbox"),
        ]
        .into_iter()
        .map(|(kind, label)| ToolboxItem::FieldType(FieldTypeDef::new(kind, label)))
        .collect();
        Self { items }
    }

    pub fn push(&mut self, item: ToolboxItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ToolboxItem] {
        &self.items
    }
}

/// Resolves the live field a drag overlay previews.
///
/// Returns `None` when the id is not (yet) present in the snapshot, in
/// which case the overlay renders nothing; this is the ordinary race
/// between pointer input and store mutations, not an error.
pub fn overlay_field<'a>(schema: &'a FormSchema, id: &str) -> Option<&'a FieldDef> {
    schema.field(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_overrides_icon() {
        let mut def = FieldTypeDef::new(FieldType::Text, "Text");
        def.icon = Some("text-icon".to_string());
        def.image = Some("text.png".to_string());
        let item = ToolboxItem::FieldType(def);
        assert_eq!(item.thumbnail(), Thumbnail::Image("text.png"));
    }

    #[test]
    fn icon_used_without_image() {
        let mut def = FieldTypeDef::new(FieldType::Text, "Text");
        def.icon = Some("text-icon".to_string());
        let item = ToolboxItem::FieldType(def);
        assert_eq!(item.thumbnail(), Thumbnail::Icon("text-icon"));
    }

    #[test]
    fn neither_yields_placeholder() {
        let item = ToolboxItem::FieldType(FieldTypeDef::new(FieldType::Text, "Text"));
        assert_eq!(item.thumbnail(), Thumbnail::Placeholder);
    }
}
