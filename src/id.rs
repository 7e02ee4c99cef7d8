use uuid::Uuid;

/// Identifier of a field within a schema. Stable for the lifetime of the
/// field; never reused after removal.
pub type FieldId = String;

/// Generate a fresh field id.
///
/// Ids are random, so fields copied out of a template never collide with
/// ids already handed out to external consumers.
pub fn generate_field_id() -> FieldId {
    format!("fld-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_field_id();
        let b = generate_field_id();
        assert_ne!(a, b);
        assert!(a.starts_with("fld-"));
    }
}
