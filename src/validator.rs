//! Structural validation of envelope and position object graphs.
//!
//! The validator walks one object graph depth-first (corners before envelope
//! consistency, coordinates before CRS cross-checks) and records every
//! violated invariant in a [`ValidationReport`]. It holds no state beyond
//! the comparison tolerance, so one validator value can serve concurrent
//! callers.

use crate::geometry::{Envelope, Position, coordinate_hash, exactly_equal};
use crate::referencing::{CoordinateSystem, Crs, RangeMeaning, same_crs};
use crate::report::ValidationReport;
use anyhow::Result;

/// Relative tolerance applied to derived floating point comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
/// Checks envelopes, positions, and their CRS cross-consistency.
///
/// `tolerance` scales with the compared range: a span of `s` admits an
/// absolute deviation of `s * tolerance` on derived values. Set it before
/// validating when an implementation stores coordinates with reduced
/// precision.
pub struct GeometryValidator {
    pub tolerance: f64,
}

impl Default for GeometryValidator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GeometryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an envelope and everything it references.
    ///
    /// A `None` object is a no-op: absence of the envelope itself is the
    /// caller's concern, not a structural violation.
    pub fn validate_envelope(&self, object: Option<&dyn Envelope>, report: &mut ValidationReport) {
        let Some(object) = object else {
            return;
        };
        let dimension = object.dimension();
        let crs = object.crs();

        if let Some(cs) = crs.and_then(|crs| crs.coordinate_system()) {
            if cs.dimension() != dimension {
                report.record(
                    "envelope.crs.coordinate_system.dimension",
                    format!(
                        "coordinate system dimension must equal the envelope dimension: expected {dimension}, got {}",
                        cs.dimension()
                    ),
                );
            }
        }

        let lower = object.lower_corner();
        let upper = object.upper_corner();
        self.validate_corner("envelope.lower_corner", lower, dimension, crs, report);
        self.validate_corner("envelope.upper_corner", upper, dimension, crs, report);

        // Corner CRS references must also agree with each other when the
        // envelope itself declares none.
        if crs.is_none() {
            if let (Some(a), Some(b)) = (
                lower.and_then(|corner| corner.crs()),
                upper.and_then(|corner| corner.crs()),
            ) {
                if !same_crs(a, b) {
                    report.record(
                        "envelope.upper_corner.crs",
                        "lower and upper corner reference different coordinate reference systems",
                    );
                }
            }
        }

        let (Some(lower), Some(upper)) = (lower, upper) else {
            // Per-dimension consistency needs both corners.
            return;
        };
        let cs = crs.and_then(|crs| crs.coordinate_system());
        for i in 0..dimension {
            self.validate_dimension(object, lower, upper, cs, i, report);
        }
    }

    /// Validate a position: coordinate consistency, CRS cross-checks, the
    /// hash and equality contracts, and the defensive copy of the
    /// coordinate buffer.
    pub fn validate_position(&self, object: Option<&dyn Position>, report: &mut ValidationReport) {
        let Some(object) = object else {
            return;
        };
        let dimension = object.dimension();
        let coordinates = object.coordinates();

        if coordinates.len() != dimension {
            report.record(
                "position.coordinates",
                format!(
                    "coordinate count must equal the dimension: expected {dimension}, got {}",
                    coordinates.len()
                ),
            );
        }
        for (i, value) in coordinates.iter().enumerate().take(dimension) {
            let reported = object.ordinate(i);
            if !exactly_equal(*value, reported) {
                report.record(
                    format!("position.ordinate[{i}]"),
                    format!("must exactly equal coordinates()[{i}]: expected {value}, got {reported}"),
                );
            }
        }

        let crs = object.crs();
        if let Some(cs) = crs.and_then(|crs| crs.coordinate_system()) {
            if cs.dimension() != dimension {
                report.record(
                    "position.crs.coordinate_system.dimension",
                    format!(
                        "coordinate system dimension must equal the position dimension: expected {dimension}, got {}",
                        cs.dimension()
                    ),
                );
            }
            for (i, value) in coordinates.iter().enumerate().take(dimension) {
                let Some(axis) = cs.axis(i) else {
                    continue;
                };
                // Only hard bounds constrain individual coordinates; a
                // wraparound axis legitimately carries values outside its
                // declared range.
                if axis.range_meaning() != Some(RangeMeaning::Exact) {
                    continue;
                }
                let minimum = axis.minimum_value();
                let maximum = axis.maximum_value();
                if !within_bounds(minimum, maximum, *value) {
                    report.record(
                        format!("position.ordinate[{i}]"),
                        format!("out of axis bounds [{minimum}, {maximum}]: got {value}"),
                    );
                }
            }
        }

        let expected_hash = crs
            .map(|crs| crs.hash_code())
            .unwrap_or(0)
            .wrapping_add(coordinate_hash(&coordinates));
        let reported_hash = object.hash_code();
        if reported_hash != expected_hash {
            report.record(
                "position.hash_code",
                format!(
                    "must equal crs hash + coordinate hash: expected {expected_hash}, got {reported_hash}"
                ),
            );
        }
        if !object.equals(object) {
            report.record("position.equals", "position must be equal to itself");
        }

        // Mutating the caller-obtained buffer must leave the position's own
        // view of its ordinates untouched.
        let mut copy = coordinates;
        for i in 0..dimension.min(copy.len()) {
            let original = copy[i];
            copy[i] = copy[i] * 2.0 + 1.0;
            let reported = object.ordinate(i);
            if !exactly_equal(original, reported) {
                report.record(
                    format!("position.ordinate[{i}]"),
                    format!(
                        "coordinate buffer must be a defensive copy: ordinate changed from {original} to {reported}"
                    ),
                );
            }
        }
    }

    /// Validate an envelope and convert the outcome to pass/fail.
    pub fn check_envelope(&self, object: &dyn Envelope) -> Result<()> {
        let mut report = ValidationReport::new();
        self.validate_envelope(Some(object), &mut report);
        report.into_result("envelope")
    }

    /// Validate a position and convert the outcome to pass/fail.
    pub fn check_position(&self, object: &dyn Position) -> Result<()> {
        let mut report = ValidationReport::new();
        self.validate_position(Some(object), &mut report);
        report.into_result("position")
    }

    fn validate_corner(
        &self,
        field: &str,
        corner: Option<&dyn Position>,
        dimension: usize,
        envelope_crs: Option<&dyn Crs>,
        report: &mut ValidationReport,
    ) {
        let Some(corner) = corner else {
            report.record(field, "mandatory corner is missing");
            return;
        };
        self.validate_position(Some(corner), report);
        if corner.dimension() != dimension {
            report.record(
                format!("{field}.dimension"),
                format!(
                    "corner dimension must equal the envelope dimension: expected {dimension}, got {}",
                    corner.dimension()
                ),
            );
        }
        if let (Some(expected), Some(actual)) = (envelope_crs, corner.crs()) {
            if !same_crs(expected, actual) {
                report.record(
                    format!("{field}.crs"),
                    "corner must reference the same coordinate reference system as the envelope",
                );
            }
        }
    }

    fn validate_dimension(
        &self,
        object: &dyn Envelope,
        lower_corner: &dyn Position,
        upper_corner: &dyn Position,
        cs: Option<&dyn CoordinateSystem>,
        i: usize,
        report: &mut ValidationReport,
    ) {
        let lower = lower_corner.ordinate(i);
        let upper = upper_corner.ordinate(i);
        let minimum = object.minimum(i);
        let maximum = object.maximum(i);
        let range_meaning = cs
            .and_then(|cs| cs.axis(i))
            .and_then(|axis| axis.range_meaning());

        if !is_reversed_range(lower, upper) {
            let eps = ((upper - lower) * self.tolerance).abs();
            self.expect_near(
                report,
                format!("envelope.minimum[{i}]"),
                "minimum must equal the lower corner ordinate",
                lower,
                minimum,
                eps,
            );
            self.expect_near(
                report,
                format!("envelope.maximum[{i}]"),
                "maximum must equal the upper corner ordinate",
                upper,
                maximum,
                eps,
            );
            self.expect_near(
                report,
                format!("envelope.span[{i}]"),
                "span must equal maximum - minimum",
                maximum - minimum,
                object.span(i),
                eps,
            );
            self.expect_near(
                report,
                format!("envelope.median[{i}]"),
                "median must equal (maximum + minimum) / 2",
                (maximum + minimum) / 2.0,
                object.median(i),
                eps,
            );
            return;
        }

        // Reversed ranges (including the signed-zero marker for a full
        // wraparound band) are only legal on a wraparound axis.
        if range_meaning != Some(RangeMeaning::Wraparound) {
            report.record(
                format!("envelope.range[{i}]"),
                format!(
                    "lower {lower} exceeds upper {upper} but the axis range meaning is {}",
                    range_meaning.map_or_else(|| "undeclared".to_string(), |m| m.to_string())
                ),
            );
        }
        if range_meaning == Some(RangeMeaning::Exact) {
            if !(minimum <= maximum) {
                report.record(
                    format!("envelope.range[{i}]"),
                    format!("invalid minimum/maximum range [{minimum}, {maximum}]"),
                );
            }
            for (name, value) in [("lower", lower), ("upper", upper), ("median", object.median(i))]
            {
                if !within_bounds(minimum, maximum, value) {
                    report.record(
                        format!("envelope.{name}[{i}]"),
                        format!("must lie within [{minimum}, {maximum}]: got {value}"),
                    );
                }
            }
        }
    }

    fn expect_near(
        &self,
        report: &mut ValidationReport,
        field: String,
        rule: &str,
        expected: f64,
        actual: f64,
        eps: f64,
    ) {
        if !approximately_equal(expected, actual, eps) {
            report.record(
                field,
                format!("{rule}: expected {expected} (tolerance {eps}), got {actual}"),
            );
        }
    }
}

/// Reversed-range detection, including the signed-zero wraparound marker.
///
/// An envelope spanning the full 360° band is conventionally encoded with a
/// positive-zero lower bound and a negative-zero upper bound. The ordering
/// test alone cannot see that (`0.0 > -0.0` is false), so detection inspects
/// the raw bit patterns rather than comparing against zero.
pub fn is_reversed_range(lower: f64, upper: f64) -> bool {
    lower > upper || is_positive_to_negative_zero(lower, upper)
}

fn is_positive_to_negative_zero(lower: f64, upper: f64) -> bool {
    lower.to_bits() == 0 && upper.to_bits() == 0x8000_0000_0000_0000
}

/// Inclusive bounds check where NaN on either side is trivially within.
///
/// Unavailable values (NaN bounds or NaN coordinates) never fail a bounds
/// check; only a definite out-of-range value does.
fn within_bounds(minimum: f64, maximum: f64, value: f64) -> bool {
    !(value < minimum) && !(value > maximum)
}

/// Tolerance comparison matching the exact-match escape hatch.
///
/// Exact equality (including NaN against NaN and equal infinities) passes
/// regardless of `eps`; otherwise the absolute difference must stay within
/// `eps`.
fn approximately_equal(expected: f64, actual: f64, eps: f64) -> bool {
    exactly_equal(expected, actual) || (actual - expected).abs() <= eps
}
