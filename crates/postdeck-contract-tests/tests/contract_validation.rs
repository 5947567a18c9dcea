//! Validates contract fixtures against frozen JSON schemas.

use jsonschema::JSONSchema;
use serde_json::Value;

fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path).expect("json file should be readable");
    serde_json::from_str(&raw).expect("json file should be valid")
}

fn compile_validator(schema_path: &str) -> JSONSchema {
    let schema = load_json(schema_path);
    JSONSchema::compile(&schema).expect("schema should compile")
}

fn contracts_path(file: &str) -> String {
    format!(
        "{}/../../contracts/{file}",
        env!("CARGO_MANIFEST_DIR")
    )
}

#[test]
fn generate_request_fixture_matches_schema() {
    let validator = compile_validator(&contracts_path("generate-request.schema.json"));
    let fixture = load_json(&contracts_path("fixtures/generate-request.valid.json"));
    assert!(
        validator.is_valid(&fixture),
        "generation request fixture should validate against schema"
    );
}

#[test]
fn generate_response_fixture_matches_schema() {
    let validator = compile_validator(&contracts_path("generate-response.schema.json"));
    let fixture = load_json(&contracts_path("fixtures/generate-response.valid.json"));
    assert!(
        validator.is_valid(&fixture),
        "generation response fixture should validate against schema"
    );
}

#[test]
fn generate_response_without_images_is_rejected() {
    let validator = compile_validator(&contracts_path("generate-response.schema.json"));
    let missing_images = serde_json::json!({ "captions": ["A", "B"] });
    assert!(
        !validator.is_valid(&missing_images),
        "a response without images must violate the contract"
    );
}

#[test]
fn submit_request_fixture_matches_schema() {
    let validator = compile_validator(&contracts_path("submit-request.schema.json"));
    let fixture = load_json(&contracts_path("fixtures/submit-request.valid.json"));
    assert!(
        validator.is_valid(&fixture),
        "submission request fixture should validate against schema"
    );
}

#[test]
fn logout_response_fixtures_match_schema() {
    let validator = compile_validator(&contracts_path("logout-response.schema.json"));
    for fixture_file in [
        "fixtures/logout-response.success.json",
        "fixtures/logout-response.rejected.json",
    ] {
        let fixture = load_json(&contracts_path(fixture_file));
        assert!(
            validator.is_valid(&fixture),
            "{fixture_file} should validate against schema"
        );
    }
}
