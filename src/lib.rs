//! Shared library for the geoconform conformance harness.
//!
//! The crate exposes the two subsystems test suites depend on: the
//! structural validator for envelope/position object graphs (dimension and
//! CRS agreement, tolerance-aware range checks, hash and defensive-copy
//! contracts) and the candidate-type catalog (collision-resolved name→type
//! index built once from the registry under `schema/`). Domain objects reach
//! the validator through the narrow accessor traits in `geometry` and
//! `referencing`; nothing here depends on the wider standard type system.

pub mod catalog;
pub mod geometry;
pub mod model;
pub mod referencing;
pub mod report;
pub mod validator;

mod schema_loader;

pub use catalog::{
    CandidateType, Specification, SpecificationFilter, TypeCategory, TypeIdentifier, TypeIndex,
    TypeKey, TypeRegistry, default_registry_path, load_registry_from_path, shared_index,
};
pub use geometry::{Envelope, Position, coordinate_hash, exactly_equal};
pub use model::{GridAxis, GridCrs, GridCs, GridEnvelope, GridPosition};
pub use referencing::{CoordinateSystem, CoordinateSystemAxis, Crs, RangeMeaning, same_crs};
pub use report::{ValidationReport, Violation};
pub use validator::{DEFAULT_TOLERANCE, GeometryValidator, is_reversed_range};
