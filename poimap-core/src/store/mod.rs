//! Read-only access to the active set of points of interest.
//!
//! The host application owns the data. The map layer only ever sees
//! [`PointSet`] snapshots: immutable, cheap to clone, and carrying an
//! identity that changes whenever the underlying data is replaced.

use std::sync::Arc;

use geo::{Intersects, Rect};

use crate::{BoundingRegion, Point};

/// An immutable snapshot of a named dataset.
///
/// Cloning shares the underlying slice. Two snapshots have the same
/// identity only when they share that slice, so replacing the data (even
/// with equal contents) yields a new identity.
///
/// # Examples
/// ```
/// use poimap_core::{Point, PointSet};
///
/// let set = PointSet::new("Monasteries", vec![Point::from_lat_lon(1, "Rumtek", 27.3, 88.6)]);
/// let copy = set.clone();
/// let rebuilt = PointSet::new("Monasteries", set.points().to_vec());
///
/// assert!(set.same_identity(&copy));
/// assert!(!set.same_identity(&rebuilt));
/// assert_eq!(set, rebuilt);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    name: Arc<str>,
    points: Arc<[Point]>,
}

impl PointSet {
    /// Snapshot the supplied points under a dataset name.
    pub fn new(name: impl Into<String>, points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            name: Arc::from(name.into()),
            points: points.into_iter().collect(),
        }
    }

    /// A snapshot with no points.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, std::iter::empty())
    }

    /// Dataset name, used for export file names and track titles.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All points in store order, including invalid ones.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points whose coordinates pass validation, in store order.
    pub fn valid_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter().filter(|point| point.has_valid_location())
    }

    /// Look up a point by identifier.
    pub fn get(&self, id: u64) -> Option<&Point> {
        self.points.iter().find(|point| point.id == id)
    }

    /// Valid points falling inside `region`; boundary points count as inside.
    pub fn points_in_region(&self, region: &BoundingRegion) -> Vec<&Point> {
        let rect: Rect<f64> = region.to_rect();
        self.valid_points()
            .filter(|point| rect.intersects(&point.location))
            .collect()
    }

    /// Whether both snapshots share the same backing data.
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

/// Read-only source of [`PointSet`] snapshots.
///
/// # Examples
///
/// ```rust
/// use poimap_core::{MemoryPointStore, Point, PointStore};
///
/// let mut store = MemoryPointStore::new("Monasteries", Vec::new());
/// let before = store.snapshot();
/// store.replace(vec![Point::from_lat_lon(1, "Rumtek", 27.3, 88.6)]);
///
/// assert!(!before.same_identity(&store.snapshot()));
/// assert_eq!(store.snapshot().len(), 1);
/// ```
pub trait PointStore {
    /// Return the current snapshot.
    fn snapshot(&self) -> PointSet;

    /// Name of the dataset backing this store.
    fn dataset_name(&self) -> String {
        self.snapshot().name().to_owned()
    }

    /// Valid points intersecting `bbox`, in store order.
    fn get_points_in_bbox(&self, bbox: &Rect<f64>) -> Vec<Point> {
        self.snapshot()
            .points_in_region(&BoundingRegion::from(*bbox))
            .into_iter()
            .cloned()
            .collect()
    }
}

/// In-memory [`PointStore`] whose data can be replaced wholesale.
#[derive(Debug, Clone)]
pub struct MemoryPointStore {
    current: PointSet,
}

impl MemoryPointStore {
    /// Create a store holding `points` under `name`.
    pub fn new(name: impl Into<String>, points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            current: PointSet::new(name, points),
        }
    }

    /// Replace the data; subsequent snapshots carry a new identity.
    pub fn replace(&mut self, points: impl IntoIterator<Item = Point>) {
        self.current = PointSet::new(self.current.name(), points);
    }
}

impl From<PointSet> for MemoryPointStore {
    fn from(current: PointSet) -> Self {
        Self { current }
    }
}

impl PointStore for MemoryPointStore {
    fn snapshot(&self) -> PointSet {
        self.current.clone()
    }
}
