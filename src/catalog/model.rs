//! Deserializable representation of `schema/type_registry.json`.
//!
//! The registry is the closed universe of candidate types the index is built
//! from: an explicit document rather than anything discovered by scanning.
//! Use `TypeIndex` for collision resolution and lookup; use these structs
//! when the raw candidate list is required.

use crate::catalog::identity::{Specification, TypeCategory, TypeIdentifier, TypeKey};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Full candidate-type registry as stored on disk.
pub struct TypeRegistry {
    pub schema_version: String,
    pub description: String,
    pub types: Vec<CandidateType>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
/// One candidate type declared by a standard.
///
/// `supertypes` lists the keys of immediately declared parents within the
/// registry universe; parents outside the universe are simply not listed.
pub struct CandidateType {
    pub identifier: TypeIdentifier,
    pub key: TypeKey,
    pub specification: Specification,
    pub category: TypeCategory,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub supertypes: Vec<TypeKey>,
}

impl CandidateType {
    /// Lookup name of this candidate after prefix stripping.
    pub fn normalized_name(&self) -> &str {
        self.identifier.normalized()
    }
}

/// Read and parse a type registry from disk without additional validation.
pub fn load_registry_from_path(path: &Path) -> Result<TypeRegistry> {
    let data = fs::read_to_string(path)?;
    let registry: TypeRegistry = serde_json::from_str(&data)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_deserializes_with_optional_fields_defaulted() {
        let registry: TypeRegistry = serde_json::from_value(json!({
            "schema_version": "geo_type_registry_v1",
            "description": "fixture",
            "types": [{
                "identifier": "MD_Identifier",
                "key": "metadata::Identifier",
                "specification": "ISO_19115",
                "category": "interface"
            }]
        }))
        .expect("minimal candidate parses");

        let candidate = &registry.types[0];
        assert_eq!(candidate.normalized_name(), "Identifier");
        assert!(!candidate.deprecated);
        assert!(candidate.supertypes.is_empty());
    }

    #[test]
    fn candidate_round_trips_through_json() {
        let candidate = CandidateType {
            identifier: TypeIdentifier("EX_GeographicBoundingBox".into()),
            key: TypeKey("metadata::extent::GeographicBoundingBox".into()),
            specification: Specification::Iso19115,
            category: TypeCategory::Interface,
            deprecated: false,
            supertypes: vec![TypeKey("metadata::extent::GeographicExtent".into())],
        };
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["specification"], "ISO_19115");
        let back: CandidateType = serde_json::from_value(value).unwrap();
        assert_eq!(back.key, candidate.key);
        assert_eq!(back.supertypes, candidate.supertypes);
    }
}
