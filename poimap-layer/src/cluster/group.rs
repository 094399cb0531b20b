//! Screen-space clustering of markers.
//!
//! Clusters are recomputed from scratch for every zoom level and carry no
//! identity between calls. Markers are visited in id order; each joins the
//! nearest existing anchor within the radius or founds a new cluster, so the
//! result is deterministic for a given marker set, zoom and radius.

use geo::Coord;
use poimap_core::{BoundingRegion, projection};
use rstar::{PointDistance, RTree};
use rstar::primitives::GeomWithData;

use super::Marker;

type Anchor = GeomWithData<[f64; 2], usize>;

/// A zoom-dependent aggregation of nearby markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Point ids of the members, ascending.
    pub members: Vec<u64>,
    /// Mean of the member coordinates.
    pub center: Coord<f64>,
    /// Minimal region enclosing the members.
    pub bounds: BoundingRegion,
}

impl Cluster {
    /// Glyph label: the member count.
    #[must_use]
    pub fn label(&self) -> String {
        self.members.len().to_string()
    }

    /// Whether the cluster is a lone marker.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

#[derive(Debug)]
struct Accumulator {
    members: Vec<u64>,
    sum: Coord<f64>,
    bounds: BoundingRegion,
}

/// Group `markers` into clusters at `zoom`.
///
/// `radius` is measured in screen pixels, so clusters split as zoom grows.
pub(crate) fn cluster_markers(
    markers: &[Marker],
    zoom: u8,
    radius: f64,
    tile_size: u32,
) -> Vec<Cluster> {
    let mut ordered: Vec<&Marker> = markers.iter().collect();
    ordered.sort_by_key(|marker| marker.point().id);

    let radius_2 = radius * radius;
    let mut anchors: RTree<Anchor> = RTree::new();
    let mut groups: Vec<Accumulator> = Vec::new();

    for marker in ordered {
        let location = marker.point().location;
        let pixel = projection::project(location, zoom, tile_size);
        let query = [pixel.x, pixel.y];
        let joined = anchors
            .nearest_neighbor(&query)
            .filter(|anchor| anchor.distance_2(&query) <= radius_2)
            .map(|anchor| anchor.data);

        match joined.and_then(|index| groups.get_mut(index)) {
            Some(group) => {
                group.members.push(marker.point().id);
                group.sum = group.sum + location;
                group.bounds = group.bounds.union(&BoundingRegion::new(location, location));
            }
            None => {
                anchors.insert(GeomWithData::new(query, groups.len()));
                groups.push(Accumulator {
                    members: vec![marker.point().id],
                    sum: location,
                    bounds: BoundingRegion::new(location, location),
                });
            }
        }
    }

    groups
        .into_iter()
        .map(|group| {
            #[expect(
                clippy::cast_precision_loss,
                reason = "member counts stay far below 2^52"
            )]
            let count = group.members.len() as f64;
            Cluster {
                center: group.sum / count,
                members: group.members,
                bounds: group.bounds,
            }
        })
        .collect()
}
