use std::collections::HashSet;

use form_builder_core::schema::{FieldDef, FieldType, FormSchema, Layout, RuleKind, ValidationRule};
use form_builder_core::store::FormStore;
use form_builder_core::template::{Template, TemplateCatalog, TemplateOptions};
use form_builder_core::StoreError;

fn contact_template() -> Template {
    Template {
        id: "t1".to_string(),
        name: "Contact".to_string(),
        layout: Some(Layout {
            col_size: 6,
            gap: 2,
        }),
        fields: vec![
            FieldDef::new("proto-name".to_string(), "name", FieldType::Text, "Name"),
            FieldDef::new("proto-email".to_string(), "email", FieldType::Text, "Email"),
        ],
    }
}

fn broken_template() -> Template {
    let mut field = FieldDef::new("proto-wide".to_string(), "wide", FieldType::Text, "Wide");
    field.width = 150;
    Template {
        id: "t2".to_string(),
        name: "Broken".to_string(),
        layout: None,
        fields: vec![field],
    }
}

// Store seeded with one existing field and the two templates above
fn create_test_store() -> FormStore {
    let mut schema = FormSchema::new("form-1", "Test form");
    schema.fields.push(FieldDef::new(
        "fld-old".to_string(),
        "old",
        FieldType::Number,
        "Old",
    ));
    let mut catalog = TemplateCatalog::default();
    catalog.register(contact_template());
    catalog.register(broken_template());
    FormStore::new(schema, catalog).unwrap()
}

#[test]
fn apply_replaces_fields_with_fresh_ids() {
    let mut store = create_test_store();

    store
        .apply_template("t1", &TemplateOptions::default())
        .unwrap();

    let fields = &store.schema().fields;
    assert_eq!(fields.len(), 2);
    // previous fields are fully gone
    assert!(store.get_field("fld-old").is_none());
    // prototype ids were not reused
    let ids: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains("proto-name"));
    assert!(!ids.contains("proto-email"));
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[1].name, "email");
}

#[test]
fn apply_replaces_layout_by_default() {
    let mut store = create_test_store();

    store
        .apply_template("t1", &TemplateOptions::default())
        .unwrap();

    assert_eq!(store.schema().layout.col_size, 6);
}

#[test]
fn apply_can_preserve_layout() {
    let mut store = create_test_store();
    let original = store.schema().layout.clone();

    let options = TemplateOptions {
        replace_layout: false,
        ..Default::default()
    };
    store.apply_template("t1", &options).unwrap();

    assert_eq!(store.schema().layout, original);
}

#[test]
fn unknown_template_fails_without_touching_the_schema() {
    let mut store = create_test_store();
    let before = store.schema().clone();

    let err = store
        .apply_template("missing", &TemplateOptions::default())
        .unwrap_err();

    assert!(matches!(err, StoreError::TemplateNotFound(_)));
    assert_eq!(store.schema(), &before);
}

#[test]
fn invalid_template_is_rejected_atomically() {
    let mut store = create_test_store();
    let before = store.latest_snapshot();

    let err = store
        .apply_template("t2", &TemplateOptions::default())
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidTemplateSchema(_)));
    // the published snapshot is identical before and after the call
    assert_eq!(*store.latest_snapshot(), *before);
}

#[test]
fn uncompilable_pattern_rule_is_invalid() {
    let mut field = FieldDef::new("proto-p".to_string(), "p", FieldType::Text, "P");
    field.validations.push(ValidationRule::new(
        RuleKind::Pattern {
            pattern: "(".to_string(),
        },
        "broken",
    ));
    let mut catalog = TemplateCatalog::default();
    catalog.register(Template {
        id: "bad-regex".to_string(),
        name: "Bad".to_string(),
        layout: None,
        fields: vec![field],
    });
    let mut store = FormStore::new(FormSchema::new("form-1", "Test"), catalog).unwrap();

    let err = store
        .apply_template("bad-regex", &TemplateOptions::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTemplateSchema(_)));
}

#[test]
fn duplicate_names_rejected_only_when_required() {
    let mut catalog = TemplateCatalog::default();
    catalog.register(Template {
        id: "dup".to_string(),
        name: "Dup".to_string(),
        layout: None,
        fields: vec![
            FieldDef::new("proto-1".to_string(), "email", FieldType::Text, "Email"),
            FieldDef::new("proto-2".to_string(), "email", FieldType::Text, "Backup"),
        ],
    });
    let mut store = FormStore::new(FormSchema::new("form-1", "Test"), catalog).unwrap();

    assert!(store.apply_template("dup", &TemplateOptions::default()).is_ok());

    let strict = TemplateOptions {
        require_unique_names: true,
        ..Default::default()
    };
    let err = store.apply_template("dup", &strict).unwrap_err();
    assert!(matches!(err, StoreError::InvalidTemplateSchema(_)));
}
