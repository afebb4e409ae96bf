//! In-memory implementations of the geometry and referencing contracts.
//!
//! These value types back the test suite and give downstream callers a
//! correct reference implementation of the hash, equality, and defensive
//! copy contracts. A shared CRS is held behind `Arc` so envelope and corners
//! observe the same object, which is what the identity checks require.

use crate::geometry::{Envelope, Position};
use crate::referencing::{CoordinateSystem, CoordinateSystemAxis, Crs, RangeMeaning};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug)]
/// One axis with explicit bounds and an optional range meaning.
pub struct GridAxis {
    pub abbreviation: String,
    pub minimum: f64,
    pub maximum: f64,
    pub range_meaning: Option<RangeMeaning>,
}

impl GridAxis {
    /// Axis with hard bounds, like latitude.
    pub fn exact(abbreviation: &str, minimum: f64, maximum: f64) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            minimum,
            maximum,
            range_meaning: Some(RangeMeaning::Exact),
        }
    }

    /// Axis with a cyclic range, like longitude.
    pub fn wraparound(abbreviation: &str, minimum: f64, maximum: f64) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            minimum,
            maximum,
            range_meaning: Some(RangeMeaning::Wraparound),
        }
    }
}

impl CoordinateSystemAxis for GridAxis {
    fn minimum_value(&self) -> f64 {
        self.minimum
    }
    fn maximum_value(&self) -> f64 {
        self.maximum
    }
    fn range_meaning(&self) -> Option<RangeMeaning> {
        self.range_meaning
    }
}

#[derive(Clone, Debug)]
/// Coordinate system backed by an ordered axis list.
pub struct GridCs {
    pub axes: Vec<GridAxis>,
}

impl CoordinateSystem for GridCs {
    fn dimension(&self) -> usize {
        self.axes.len()
    }
    fn axis(&self, index: usize) -> Option<&dyn CoordinateSystemAxis> {
        self.axes.get(index).map(|a| a as &dyn CoordinateSystemAxis)
    }
}

#[derive(Clone, Debug)]
/// Reference system identified by an authority code.
pub struct GridCrs {
    pub code: String,
    pub cs: GridCs,
}

impl GridCrs {
    pub fn new(code: &str, axes: Vec<GridAxis>) -> Arc<Self> {
        Arc::new(Self {
            code: code.to_string(),
            cs: GridCs { axes },
        })
    }

    /// A two-dimensional geographic CRS with wraparound longitude.
    pub fn geographic(code: &str) -> Arc<Self> {
        Self::new(
            code,
            vec![
                GridAxis::wraparound("lon", -180.0, 180.0),
                GridAxis::exact("lat", -90.0, 90.0),
            ],
        )
    }
}

impl Crs for GridCrs {
    fn coordinate_system(&self) -> Option<&dyn CoordinateSystem> {
        Some(&self.cs)
    }
    fn hash_code(&self) -> u64 {
        // DefaultHasher::new() uses fixed keys, so the code hashes the same
        // way for every instance within a process.
        let mut hasher = DefaultHasher::new();
        self.code.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug)]
/// Position owning its coordinates, optionally tied to a shared CRS.
pub struct GridPosition {
    coordinates: Vec<f64>,
    crs: Option<Arc<GridCrs>>,
}

impl GridPosition {
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self {
            coordinates,
            crs: None,
        }
    }

    pub fn with_crs(coordinates: Vec<f64>, crs: Arc<GridCrs>) -> Self {
        Self {
            coordinates,
            crs: Some(crs),
        }
    }
}

impl Position for GridPosition {
    fn dimension(&self) -> usize {
        self.coordinates.len()
    }
    fn coordinates(&self) -> Vec<f64> {
        self.coordinates.clone()
    }
    fn ordinate(&self, index: usize) -> f64 {
        self.coordinates[index]
    }
    fn crs(&self) -> Option<&dyn Crs> {
        self.crs.as_deref().map(|c| c as &dyn Crs)
    }
}

#[derive(Clone, Debug)]
/// Envelope deriving its per-dimension statistics from the corners.
///
/// Derived values follow the normal ordering rules; callers that need a
/// wraparound band construct corners with `lower > upper` (or the signed
/// zero pair) and a CRS whose axis declares the cyclic range.
pub struct GridEnvelope {
    lower: GridPosition,
    upper: GridPosition,
    crs: Option<Arc<GridCrs>>,
}

impl GridEnvelope {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            lower: GridPosition::new(lower),
            upper: GridPosition::new(upper),
            crs: None,
        }
    }

    /// Envelope whose corners share the given CRS.
    pub fn with_crs(lower: Vec<f64>, upper: Vec<f64>, crs: Arc<GridCrs>) -> Self {
        Self {
            lower: GridPosition::with_crs(lower, Arc::clone(&crs)),
            upper: GridPosition::with_crs(upper, Arc::clone(&crs)),
            crs: Some(crs),
        }
    }
}

impl Envelope for GridEnvelope {
    fn dimension(&self) -> usize {
        self.lower.dimension()
    }
    fn crs(&self) -> Option<&dyn Crs> {
        self.crs.as_deref().map(|c| c as &dyn Crs)
    }
    fn lower_corner(&self) -> Option<&dyn Position> {
        Some(&self.lower)
    }
    fn upper_corner(&self) -> Option<&dyn Position> {
        Some(&self.upper)
    }
    fn minimum(&self, index: usize) -> f64 {
        self.lower.ordinate(index)
    }
    fn maximum(&self, index: usize) -> f64 {
        self.upper.ordinate(index)
    }
    fn median(&self, index: usize) -> f64 {
        (self.minimum(index) + self.maximum(index)) / 2.0
    }
    fn span(&self, index: usize) -> f64 {
        self.maximum(index) - self.minimum(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{coordinate_hash, exactly_equal};
    use crate::validator::GeometryValidator;

    #[test]
    fn grid_position_honors_the_hash_contract() {
        let crs = GridCrs::geographic("epsg:4326");
        let position = GridPosition::with_crs(vec![12.5, 47.1], Arc::clone(&crs));
        let expected = crs
            .hash_code()
            .wrapping_add(coordinate_hash(&[12.5, 47.1]));
        assert_eq!(position.hash_code(), expected);
        assert!(position.equals(&position));
    }

    #[test]
    fn grid_position_coordinates_are_a_copy() {
        let position = GridPosition::new(vec![1.0, 2.0]);
        let mut copy = position.coordinates();
        copy[0] = 99.0;
        assert!(exactly_equal(position.ordinate(0), 1.0));
    }

    #[test]
    fn grid_envelope_validates_cleanly() {
        let crs = GridCrs::geographic("epsg:4326");
        let envelope = GridEnvelope::with_crs(vec![-10.0, 40.0], vec![20.0, 50.0], crs);
        GeometryValidator::new()
            .check_envelope(&envelope)
            .expect("reference envelope must validate");
    }

    #[test]
    fn corners_share_the_envelope_crs_object() {
        let crs = GridCrs::geographic("epsg:4326");
        let envelope = GridEnvelope::with_crs(vec![0.0, 0.0], vec![1.0, 1.0], crs);
        let envelope_crs = envelope.crs().unwrap();
        let lower_crs = envelope.lower_corner().unwrap().crs().unwrap();
        assert!(crate::referencing::same_crs(envelope_crs, lower_crs));
    }
}
