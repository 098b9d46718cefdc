//! Output schema configuration and the tag hierarchy resolver.
//!
//! The schema is data, not code: a versioned JSON document describing the
//! fixed skeleton of the output document, which elements an instance of each
//! tag segment creates, and where each leaf value lands.

mod error;
mod grammar;
mod model;

pub use error::SchemaError;
pub use grammar::{Segment, TagGrammar, TagPath, natural_cmp};
pub use model::{
    CodeTable, DECLARED_RANK_BASE, FieldDef, GroupDef, Schema, StaticNode, Target,
};

/// Decomposes a tag with the default grammar.
pub fn decompose(tag: &str) -> Result<TagPath, SchemaError> {
    TagGrammar::default().decompose(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "name": "small",
        "version": "1",
        "attribute_order": ["code", "value", "unit"],
        "skeleton": { "name": "doc", "anchor": "top" },
        "groups": [
            { "tag": "A", "chain": [{ "name": "a" }] },
            { "tag": "A.2" }
        ],
        "fields": [
            { "tag": "A.1", "host": [{ "name": "one" }], "order": 5 },
            { "tag": "A.2.1", "host": [{ "name": "qty" }], "target": { "attribute": "value" }, "slot": "qty" },
            { "tag": "A.2.2", "host": [{ "name": "qty" }], "target": { "attribute": "unit" }, "slot": "qty", "order": 3 }
        ]
    }"#;

    #[test]
    fn parses_and_ranks() {
        let schema = Schema::from_json_str(SMALL).unwrap();
        assert_eq!(schema.grammar, TagGrammar::default());
        assert_eq!(schema.group_rank("A"), Some(DECLARED_RANK_BASE));
        assert_eq!(schema.field_rank("A.1"), Some(5));
        // A.2 is transparent, so both qty fields are owned by A and share rank 3.
        assert_eq!(schema.field_rank("A.2.1"), Some(3));
        assert_eq!(schema.field_rank("A.2.2"), Some(3));
        assert_eq!(schema.attribute_rank("unit"), 2);
        assert_eq!(schema.attribute_rank("other"), 3);
        assert_eq!(
            schema.field("A.2.1").map(|f| &f.target),
            Some(&Target::Attribute("value".to_string()))
        );
    }

    #[test]
    fn owner_skips_transparent_groups() {
        let schema = Schema::from_json_str(SMALL).unwrap();
        let path = schema.grammar.decompose("A.2.1").unwrap();
        assert_eq!(schema.owner_of(&path), "A");
    }

    #[test]
    fn rejects_unknown_anchor_and_fixed_attribute() {
        let bad_anchor = SMALL.replace(r#""tag": "A", "chain""#, r#""tag": "A", "anchor": "nowhere", "chain""#);
        assert!(matches!(
            Schema::from_json_str(&bad_anchor),
            Err(SchemaError::UnknownAnchor { .. })
        ));

        let fixed = SMALL.replace(
            r#"{ "tag": "A.2.1", "host": [{ "name": "qty" }]"#,
            r#"{ "tag": "A.2.1", "host": [{ "name": "qty", "attributes": { "value": "1" } }]"#,
        );
        assert!(matches!(
            Schema::from_json_str(&fixed),
            Err(SchemaError::FixedAttribute { .. })
        ));
    }

    #[test]
    fn rejects_conflicting_slot_hosts() {
        let conflict = SMALL.replace(
            r#"{ "tag": "A.2.2", "host": [{ "name": "qty" }]"#,
            r#"{ "tag": "A.2.2", "host": [{ "name": "amount" }]"#,
        );
        assert!(matches!(
            Schema::from_json_str(&conflict),
            Err(SchemaError::SlotConflict { .. })
        ));
    }

    #[test]
    fn code_table_is_case_insensitive_with_fallbacks() {
        let mut codes = CodeTable::default();
        codes.values.insert("Oral".into(), "PO".into());
        assert_eq!(codes.translate("ORAL"), "PO");
        assert_eq!(codes.translate("nasal"), "nasal");
        codes.default = Some("OTH".into());
        assert_eq!(codes.translate("nasal"), "OTH");
    }

    #[test]
    fn builtin_schema_loads() {
        let schema = Schema::builtin().unwrap();
        assert_eq!(schema.skeleton.name, "MCCI_IN200100UV01");
        assert_eq!(schema.anchors(), vec!["case"]);
        assert!(schema.group("G.k.4.r").is_some());
        assert!(schema.group("C").unwrap().is_transparent());
        for field in &schema.fields {
            assert!(schema.field_rank(&field.tag).is_some(), "{}", field.tag);
        }
    }
}
