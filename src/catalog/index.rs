//! Indexed view of the candidate-type registry.
//!
//! Building the index resolves identifier collisions left behind by merged
//! and deprecated standard types, records the losers in an explicit
//! exclusion set, and derives a per-type "has subtypes" flag so consumers
//! can skip subtype probing for leaf types. The index is strict about
//! ambiguous collisions and unknown schema versions; both abort
//! construction instead of producing a partially trusted catalog.

use crate::catalog::identity::{Specification, TypeIdentifier, TypeKey};
use crate::catalog::model::{CandidateType, TypeRegistry, load_registry_from_path};
use crate::schema_loader::{SchemaLoadOptions, load_json_schema};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// One registry contract ships with the crate; reject unexpected versions
// rather than risk building an index from a mismatched document.
const DEFAULT_SCHEMA_VERSION: &str = "geo_type_registry_v1";

/// Restricts which specification families contribute candidates.
#[derive(Clone, Debug)]
pub enum SpecificationFilter {
    /// Admit every candidate.
    Any,
    /// Admit only candidates from the listed families.
    Families(BTreeSet<Specification>),
}

impl SpecificationFilter {
    /// Filter admitting the given families.
    pub fn families<I: IntoIterator<Item = Specification>>(families: I) -> Self {
        SpecificationFilter::Families(families.into_iter().collect())
    }

    fn admits(&self, specification: &Specification) -> bool {
        match self {
            SpecificationFilter::Any => true,
            SpecificationFilter::Families(families) => families.contains(specification),
        }
    }
}

#[derive(Debug)]
/// Immutable name→type index with exclusion set and subtype flags.
pub struct TypeIndex {
    schema_version: String,
    by_name: BTreeMap<String, CandidateType>,
    excluded: BTreeSet<TypeIdentifier>,
    has_subtypes: BTreeMap<TypeKey, bool>,
}

impl TypeIndex {
    /// Load, schema-validate, and index the registry at the given path.
    pub fn load(path: &Path, filter: &SpecificationFilter) -> Result<Self> {
        validate_against_schema(path)?;
        let registry = load_registry_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Self::build(&registry, filter)
    }

    /// Build the index from an in-memory registry.
    ///
    /// Fails on empty input, malformed entries, duplicate type keys, and
    /// collisions that deprecation cannot resolve.
    pub fn build(registry: &TypeRegistry, filter: &SpecificationFilter) -> Result<Self> {
        validate_schema_version(&registry.schema_version)?;
        if registry.types.is_empty() {
            bail!("registry contains no candidate types");
        }

        let mut seen_keys = BTreeSet::new();
        let mut by_name: BTreeMap<String, CandidateType> = BTreeMap::new();
        let mut excluded: BTreeSet<TypeIdentifier> = BTreeSet::new();

        for candidate in &registry.types {
            if candidate.identifier.0.trim().is_empty() {
                bail!("encountered candidate type with no identifier");
            }
            if candidate.key.0.trim().is_empty() {
                bail!(
                    "candidate '{}' has an empty type key",
                    candidate.identifier.0
                );
            }
            if !filter.admits(&candidate.specification) {
                continue;
            }
            if !seen_keys.insert(candidate.key.clone()) {
                bail!("duplicate type key {}", candidate.key.0);
            }

            let name = candidate.normalized_name().to_string();
            match by_name.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate.clone());
                }
                Entry::Occupied(mut slot) => {
                    let previous = slot.get();
                    match (previous.deprecated, candidate.deprecated) {
                        (true, false) => {
                            // The replacement wins; remember the deprecated
                            // loser so consumers can tell it was dropped on
                            // purpose.
                            excluded.insert(previous.identifier.clone());
                            slot.insert(candidate.clone());
                        }
                        (false, true) => {
                            excluded.insert(candidate.identifier.clone());
                        }
                        _ => bail!(
                            "ambiguous name collision '{}' between '{}' and '{}'",
                            candidate.normalized_name(),
                            previous.identifier.0,
                            candidate.identifier.0
                        ),
                    }
                }
            }
        }

        if by_name.is_empty() {
            bail!("no candidate types match the requested specification families");
        }

        // Second pass over the resolved entries only: excluded types do not
        // contribute subtype relationships.
        let mut has_subtypes: BTreeMap<TypeKey, bool> = by_name
            .values()
            .map(|candidate| (candidate.key.clone(), false))
            .collect();
        for candidate in by_name.values() {
            for supertype in &candidate.supertypes {
                if let Some(flag) = has_subtypes.get_mut(supertype) {
                    *flag = true;
                }
            }
        }

        Ok(Self {
            schema_version: registry.schema_version.clone(),
            by_name,
            excluded,
            has_subtypes,
        })
    }

    /// The registry version this index was built from.
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Resolve a type by its normalized name.
    ///
    /// Returns `None` instead of erroring; callers surface unknown names
    /// with whatever context referenced them.
    pub fn lookup(&self, name: &str) -> Option<&CandidateType> {
        self.by_name.get(name)
    }

    /// Iterates normalized names in stable order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Iterates resolved entries in stable name order.
    pub fn entries(&self) -> impl Iterator<Item = &CandidateType> {
        self.by_name.values()
    }

    /// Identifiers dropped during collision resolution.
    pub fn excluded(&self) -> &BTreeSet<TypeIdentifier> {
        &self.excluded
    }

    /// True when the identifier lost a collision to a non-deprecated type.
    pub fn is_excluded(&self, identifier: &TypeIdentifier) -> bool {
        self.excluded.contains(identifier)
    }

    /// True when at least one resolved entry declares this key as a
    /// supertype. Unknown keys report `false`.
    pub fn has_subtypes(&self, key: &TypeKey) -> bool {
        self.has_subtypes.get(key).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Path of the registry document bundled with the crate.
pub fn default_registry_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/type_registry.json")
}

/// Process-wide index over the bundled registry.
///
/// The first caller builds the index; racing callers block on the same
/// one-time initialization and every later call returns the same immutable
/// reference. A failed build is remembered and re-reported, not retried.
pub fn shared_index() -> Result<&'static TypeIndex> {
    static SHARED: OnceLock<Result<TypeIndex, String>> = OnceLock::new();
    let built = SHARED.get_or_init(|| {
        TypeIndex::load(&default_registry_path(), &SpecificationFilter::Any)
            .map_err(|err| format!("{err:#}"))
    });
    built
        .as_ref()
        .map_err(|reason| anyhow!("type registry index unavailable: {reason}"))
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }

    if !schema_version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!(
            "schema_version must match ^[A-Za-z0-9_.-]+$, got {}",
            schema_version
        );
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([default_registry_schema_version()])
}

fn default_registry_schema_version() -> String {
    registry_schema_version_from_disk().unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string())
}

fn registry_schema_version_from_disk() -> Option<String> {
    let path = canonical_registry_schema_path();
    let file = File::open(path).ok()?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).ok()?;
    value
        .pointer("/properties/schema_version/const")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn canonical_registry_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/type_registry.schema.json")
}

fn validate_against_schema(registry_path: &Path) -> Result<()> {
    let registry_file = File::open(registry_path)
        .with_context(|| format!("opening registry {}", registry_path.display()))?;
    let registry_value: Value = serde_json::from_reader(BufReader::new(registry_file))
        .with_context(|| format!("parsing registry {}", registry_path.display()))?;

    let registry_version = registry_value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let schema_path = resolve_registry_schema_path(registry_path);
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(
        &schema_path,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            expected_version: Some(&registry_version),
            ..Default::default()
        },
    )
    .with_context(|| format!("loading registry schema {}", schema_path.display()))?;

    if let Err(errors) = schema.compiled.validate(&registry_value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "type registry {} failed validation against contract '{}':\n{}",
            registry_path.display(),
            schema.schema_version,
            details
        );
    }
    Ok(())
}

fn resolve_registry_schema_path(registry_path: &Path) -> PathBuf {
    if let Some(base) = registry_path.parent() {
        let candidate = base.join("type_registry.schema.json");
        if candidate.exists() {
            return candidate;
        }
    }

    canonical_registry_schema_path()
}
