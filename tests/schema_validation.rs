// tests/schema_validation.rs
use daily_nugget_feed::schema::{validate, Schema, SchemaViolation, Violation};
use serde_json::{json, Value};

const SCHEMA: &str = include_str!("../data/schema.json");

fn schema() -> Schema {
    Schema::from_json_str(SCHEMA).expect("bundled schema parses")
}

fn words(n: usize) -> String {
    vec!["Wort"; n].join(" ")
}

fn valid_record() -> Value {
    json!({
        "title": "Ein ruhiger Morgen",
        "body": words(160),
        "url": "https://example.com/morgen",
        "category": "Selbstentwicklung"
    })
}

#[test]
fn valid_record_passes() {
    assert_eq!(validate(&valid_record(), &schema()), Ok(()));
}

#[test]
fn each_missing_required_field_is_named() {
    for field in ["title", "body", "url", "category"] {
        let mut rec = valid_record();
        rec.as_object_mut().unwrap().remove(field);
        let err = validate(&rec, &schema()).unwrap_err();
        assert_eq!(err, SchemaViolation::new(field, Violation::Missing));
    }
}

#[test]
fn undeclared_field_is_rejected() {
    let mut rec = valid_record();
    rec["author"] = json!("Anna");
    let err = validate(&rec, &schema()).unwrap_err();
    assert_eq!(err.field, "author");
    assert_eq!(err.kind, Violation::Unexpected);
}

#[test]
fn topic_is_not_part_of_the_generated_record() {
    // The topic is attached after validation; a generator echoing it is rejected.
    let mut rec = valid_record();
    rec["topic"] = json!("Minimalismus");
    assert!(validate(&rec, &schema()).is_err());
}

#[test]
fn body_word_bounds_are_inclusive() {
    let cases = [
        (149, false),
        (150, true),
        (175, true),
        (200, true),
        (201, false),
    ];
    for (n, ok) in cases {
        let mut rec = valid_record();
        rec["body"] = json!(words(n));
        assert_eq!(validate(&rec, &schema()).is_ok(), ok, "{n} words");
    }
}

#[test]
fn words_are_split_on_any_whitespace() {
    let mut rec = valid_record();
    let body = words(150).replace(' ', "\n\t  ");
    rec["body"] = json!(format!("  {body}  "));
    assert!(validate(&rec, &schema()).is_ok());
}

#[test]
fn category_outside_enum_is_rejected() {
    let mut rec = valid_record();
    rec["category"] = json!("Kochen");
    let err = validate(&rec, &schema()).unwrap_err();
    assert_eq!(err.field, "category");
    assert!(matches!(err.kind, Violation::NotInEnum { .. }));
    assert!(err.to_string().contains("Minimalismus"));
}

#[test]
fn url_must_match_pattern() {
    let mut rec = valid_record();
    rec["url"] = json!("example.com/morgen");
    let err = validate(&rec, &schema()).unwrap_err();
    assert!(matches!(err.kind, Violation::Pattern { .. }));

    rec["url"] = json!("https://example.com/mit leerzeichen");
    assert!(validate(&rec, &schema()).is_err());
}

#[test]
fn title_length_bounds() {
    let mut rec = valid_record();
    rec["title"] = json!("Kurz");
    let err = validate(&rec, &schema()).unwrap_err();
    assert_eq!(err.kind, Violation::MinLength { min: 10, actual: 4 });

    rec["title"] = json!("x".repeat(121));
    let err = validate(&rec, &schema()).unwrap_err();
    assert_eq!(err.kind, Violation::MaxLength { max: 120, actual: 121 });
}

#[test]
fn non_string_value_is_wrong_type() {
    let mut rec = valid_record();
    rec["body"] = json!(vec!["Wort"; 160]);
    let err = validate(&rec, &schema()).unwrap_err();
    assert_eq!(err.field, "body");
    assert!(matches!(err.kind, Violation::WrongType { .. }));
}

#[test]
fn validation_is_pure() {
    let rec = valid_record();
    let before = rec.clone();
    let s = schema();
    let _ = validate(&rec, &s);
    let _ = validate(&rec, &s);
    assert_eq!(rec, before);
}
