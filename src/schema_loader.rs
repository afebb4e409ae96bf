//! Shared JSON Schema loader for the registry contract.
//!
//! Keeps registry schema handling in one place: callers can restrict the
//! accepted `schema_version` values, pin an expected version, and get back a
//! compiled validator together with the schema payload.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Result of loading and compiling a JSON Schema.
#[derive(Debug)]
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
    /// Keeps the payload borrowed by `compiled` alive.
    _raw: Arc<Value>,
}

/// Controls how schemas are checked before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Version the caller expects; mismatches fail loading.
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            expected_version: None,
            allowed_versions: None,
        }
    }
}

pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let schema_value: Value = serde_json::from_reader(
        File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
    )
    .with_context(|| format!("parsing schema {}", path.display()))?;

    let schema_version = extract_schema_version(&schema_value, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("schema {} missing schema_version const", path.display()))?;

    if let Some(expected) = options.expected_version {
        if expected != schema_version {
            bail!(
                "schema {} declares version '{}' but '{}' was expected",
                path.display(),
                schema_version,
                expected
            );
        }
    }

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let raw = Arc::new(schema_value);
    // JSONSchema::compile borrows the schema for 'static; the Arc in the
    // result keeps the payload alive as long as the compiled validator.
    let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
    let compiled = JSONSchema::compile(raw_static)
        .with_context(|| format!("compiling schema {}", path.display()))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
        _raw: raw,
    })
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_schema(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp schema file");
        write!(file, "{value}").unwrap();
        file
    }

    fn sample_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "required": ["schema_version"],
            "properties": {
                "schema_version": {"const": "fixture_v1"}
            }
        })
    }

    #[test]
    fn loads_and_compiles_a_versioned_schema() {
        let file = write_schema(&sample_schema());
        let result =
            load_json_schema(file.path(), SchemaLoadOptions::default()).expect("schema loads");
        assert_eq!(result.schema_version, "fixture_v1");
        assert!(
            result
                .compiled
                .is_valid(&json!({"schema_version": "fixture_v1"}))
        );
        assert!(!result.compiled.is_valid(&json!({})));
    }

    #[test]
    fn rejects_versions_outside_the_allowed_set() {
        let file = write_schema(&sample_schema());
        let allowed = BTreeSet::from_iter(["other_v1".to_string()]);
        let err = load_json_schema(
            file.path(),
            SchemaLoadOptions {
                allowed_versions: Some(&allowed),
                ..Default::default()
            },
        )
        .expect_err("version outside allowed set must fail");
        assert!(err.to_string().contains("fixture_v1"));
    }

    #[test]
    fn rejects_mismatched_expected_version() {
        let file = write_schema(&sample_schema());
        let err = load_json_schema(
            file.path(),
            SchemaLoadOptions {
                expected_version: Some("fixture_v2"),
                ..Default::default()
            },
        )
        .expect_err("expected version mismatch must fail");
        assert!(err.to_string().contains("fixture_v2"));
    }

    #[test]
    fn rejects_schemas_without_a_version_const() {
        let file = write_schema(&json!({"type": "object"}));
        assert!(load_json_schema(file.path(), SchemaLoadOptions::default()).is_err());
    }
}
