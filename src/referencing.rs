//! Accessor contracts for coordinate reference system collaborators.
//!
//! The validator never depends on concrete CRS classes; it consumes the
//! narrow traits declared here. Implementations live with the caller (or in
//! `model` for the in-memory fixtures). Axis metadata is what drives the
//! wraparound rules in `validator`, so the contracts are deliberately small.

use std::fmt;

/// Whether an axis range is a hard bound or a cyclic one.
///
/// Replaces the upstream standard's self-registering code list with a fixed
/// enumeration: the set of meanings is closed, so variants, names, and
/// ordinals are all derived statically.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RangeMeaning {
    /// Values outside the declared range are invalid.
    Exact,
    /// The range wraps around, like longitude crossing the antimeridian.
    Wraparound,
}

impl RangeMeaning {
    /// Stable identifier matching the standard's vocabulary entry.
    pub fn identifier(self) -> &'static str {
        match self {
            RangeMeaning::Exact => "exact",
            RangeMeaning::Wraparound => "wraparound",
        }
    }

    /// Declaration-order index of this meaning within its vocabulary.
    pub fn ordinal(self) -> usize {
        match self {
            RangeMeaning::Exact => 0,
            RangeMeaning::Wraparound => 1,
        }
    }

    /// All meanings in declaration order.
    pub fn values() -> &'static [RangeMeaning] {
        &[RangeMeaning::Exact, RangeMeaning::Wraparound]
    }
}

impl fmt::Display for RangeMeaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// One axis of a coordinate system.
///
/// Bounds default to the whole real line; implementations with no declared
/// range simply keep the defaults and leave the range meaning unset.
pub trait CoordinateSystemAxis {
    /// Lower bound of legal coordinate values on this axis.
    fn minimum_value(&self) -> f64 {
        f64::NEG_INFINITY
    }

    /// Upper bound of legal coordinate values on this axis.
    fn maximum_value(&self) -> f64 {
        f64::INFINITY
    }

    /// How the `[minimum, maximum]` range is to be interpreted, if declared.
    fn range_meaning(&self) -> Option<RangeMeaning> {
        None
    }
}

/// A coordinate system: an ordered sequence of axes.
pub trait CoordinateSystem {
    /// Number of axes.
    fn dimension(&self) -> usize;

    /// Axis at the given index, or `None` when the implementation does not
    /// expose axis metadata for that position.
    fn axis(&self, index: usize) -> Option<&dyn CoordinateSystemAxis>;
}

/// A coordinate reference system.
///
/// The validator compares CRS references by identity, so a shared CRS must be
/// handed out as references to one object rather than equal-valued copies.
pub trait Crs {
    /// The coordinate system carried by this reference system, if any.
    fn coordinate_system(&self) -> Option<&dyn CoordinateSystem>;

    /// Hash value this reference system contributes to position hash codes.
    fn hash_code(&self) -> u64;
}

/// Identity comparison for CRS trait objects.
///
/// Mirrors the reference-identity check of the upstream conformance suite:
/// two sides agree only when they point at the same object.
pub fn same_crs(a: &dyn Crs, b: &dyn Crs) -> bool {
    std::ptr::addr_eq(a, b)
}
