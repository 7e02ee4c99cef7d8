use form_builder_core::command::{Command, CommandHistory};
use form_builder_core::schema::{FieldDef, FieldPatch, FieldType, FormSchema, Layout};
use form_builder_core::store::FormStore;
use form_builder_core::template::{Template, TemplateCatalog, TemplateOptions};

fn store_with_fields(labels: &[&str]) -> FormStore {
    let mut schema = FormSchema::new("form-1", "Test form");
    for label in labels {
        let key = label.to_lowercase();
        schema
            .fields
            .push(FieldDef::new(format!("fld-{key}"), key, FieldType::Text, *label));
    }
    let mut catalog = TemplateCatalog::default();
    catalog.register(Template {
        id: "t1".to_string(),
        name: "Contact".to_string(),
        layout: Some(Layout {
            col_size: 6,
            gap: 2,
        }),
        fields: vec![FieldDef::new(
            "proto-name".to_string(),
            "name",
            FieldType::Text,
            "Name",
        )],
    });
    FormStore::new(schema, catalog).unwrap()
}

fn field_ids(store: &FormStore) -> Vec<String> {
    store.schema().fields.iter().map(|f| f.id.clone()).collect()
}

#[test]
fn add_undo_redo_round_trip() {
    let mut store = store_with_fields(&["A"]);
    let mut history = CommandHistory::new();

    let field = FieldDef::new("fld-new".to_string(), "new", FieldType::Text, "New");
    history
        .execute(
            Command::AddField {
                field,
                at: Some(0),
            },
            &mut store,
        )
        .unwrap();
    assert_eq!(field_ids(&store), vec!["fld-new", "fld-a"]);

    history.undo(&mut store).unwrap();
    assert_eq!(field_ids(&store), vec!["fld-a"]);

    // redo re-inserts the same field with the same id
    history.redo(&mut store).unwrap();
    assert_eq!(field_ids(&store), vec!["fld-new", "fld-a"]);
}

#[test]
fn undo_of_remove_restores_field_in_place() {
    let mut store = store_with_fields(&["A", "B", "C"]);
    let mut history = CommandHistory::new();

    history
        .execute(
            Command::RemoveField {
                id: "fld-b".to_string(),
            },
            &mut store,
        )
        .unwrap();
    assert_eq!(field_ids(&store), vec!["fld-a", "fld-c"]);

    history.undo(&mut store).unwrap();
    assert_eq!(field_ids(&store), vec!["fld-a", "fld-b", "fld-c"]);
    assert_eq!(store.get_field("fld-b").unwrap().label, "B");
}

#[test]
fn undo_of_move_restores_order() {
    let mut store = store_with_fields(&["A", "B", "C"]);
    let mut history = CommandHistory::new();

    history
        .execute(
            Command::MoveField {
                id: "fld-c".to_string(),
                to: 0,
            },
            &mut store,
        )
        .unwrap();
    assert_eq!(field_ids(&store), vec!["fld-c", "fld-a", "fld-b"]);

    history.undo(&mut store).unwrap();
    assert_eq!(field_ids(&store), vec!["fld-a", "fld-b", "fld-c"]);
}

#[test]
fn undo_of_update_restores_previous_values() {
    let mut store = store_with_fields(&["A"]);
    let mut history = CommandHistory::new();

    let patch = FieldPatch {
        label: Some("Renamed".to_string()),
        ..Default::default()
    };
    history
        .execute(
            Command::UpdateField {
                id: "fld-a".to_string(),
                patch,
            },
            &mut store,
        )
        .unwrap();
    assert_eq!(store.get_field("fld-a").unwrap().label, "Renamed");

    history.undo(&mut store).unwrap();
    assert_eq!(store.get_field("fld-a").unwrap().label, "A");
}

#[test]
fn undo_of_template_apply_restores_previous_field_set() {
    let mut store = store_with_fields(&["A", "B"]);
    let before = store.schema().clone();
    let mut history = CommandHistory::new();

    history
        .execute(
            Command::ApplyTemplate {
                template_id: "t1".to_string(),
                options: TemplateOptions::default(),
            },
            &mut store,
        )
        .unwrap();
    assert_eq!(store.schema().fields.len(), 1);
    assert_eq!(store.schema().layout.col_size, 6);

    history.undo(&mut store).unwrap();
    assert_eq!(store.schema(), &before);
}

#[test]
fn failed_commands_are_not_recorded() {
    let mut store = store_with_fields(&["A"]);
    let mut history = CommandHistory::new();

    let result = history.execute(
        Command::MoveField {
            id: "ghost".to_string(),
            to: 0,
        },
        &mut store,
    );

    assert!(result.is_err());
    assert!(!history.can_undo());
}

#[test]
fn new_command_clears_the_redo_stack() {
    let mut store = store_with_fields(&["A", "B"]);
    let mut history = CommandHistory::new();

    history
        .execute(
            Command::RemoveField {
                id: "fld-a".to_string(),
            },
            &mut store,
        )
        .unwrap();
    history.undo(&mut store).unwrap();
    assert!(history.can_redo());

    history
        .execute(
            Command::RemoveField {
                id: "fld-b".to_string(),
            },
            &mut store,
        )
        .unwrap();
    assert!(!history.can_redo());
}
