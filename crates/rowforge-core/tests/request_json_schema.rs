use rowforge_core::GenerationRequest;
use schemars::schema_for;

#[test]
fn emits_json_schema_for_request() {
    let schema = schema_for!(GenerationRequest);
    let json = serde_json::to_value(&schema).expect("serialize json schema");

    let properties = json
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("schema properties");
    assert!(properties.contains_key("config"));
    assert!(properties.contains_key("tables"));

    let definitions = json
        .get("definitions")
        .and_then(|value| value.as_object())
        .expect("schema definitions");
    assert!(definitions.contains_key("Field"));
    assert!(definitions.contains_key("FieldKind"));
    assert!(definitions.contains_key("OutputFormat"));
}
