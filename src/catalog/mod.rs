//! Candidate-type catalog wiring.
//!
//! This module wraps the registry under `schema/type_registry.json` so
//! consumers can load a validated snapshot and resolve standard-derived
//! types by name. Types here mirror the registry fields; callers use
//! `TypeIndex` for collision-resolved lookups and `shared_index` for the
//! process-wide instance.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{Specification, TypeCategory, TypeIdentifier, TypeKey};
pub use index::{SpecificationFilter, TypeIndex, default_registry_path, shared_index};
pub use model::{CandidateType, TypeRegistry, load_registry_from_path};
