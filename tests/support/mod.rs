use geoconform::{CandidateType, Specification, TypeCategory, TypeIdentifier, TypeKey};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of the registry document shipped with the crate.
pub fn bundled_registry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/type_registry.json")
}

/// Write a registry document into `dir`, next to a copy of the bundled
/// schema so loading resolves the contract locally.
pub fn write_registry(dir: &Path, document: &Value) -> PathBuf {
    let schema_src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/type_registry.schema.json");
    fs::copy(&schema_src, dir.join("type_registry.schema.json")).expect("copy registry schema");

    let path = dir.join("type_registry.json");
    fs::write(&path, serde_json::to_string_pretty(document).expect("encode registry"))
        .expect("write registry fixture");
    path
}

/// Minimal registry document with the given type entries.
pub fn registry_document(types: Value) -> Value {
    json!({
        "schema_version": "geo_type_registry_v1",
        "description": "integration fixture",
        "types": types
    })
}

/// Candidate built in code, for exercising the builder without JSON.
pub fn candidate(identifier: &str, key: &str, deprecated: bool) -> CandidateType {
    CandidateType {
        identifier: TypeIdentifier(identifier.to_string()),
        key: TypeKey(key.to_string()),
        specification: Specification::Iso19115,
        category: TypeCategory::Interface,
        deprecated,
        supertypes: Vec::new(),
    }
}
