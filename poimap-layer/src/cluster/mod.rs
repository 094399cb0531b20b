//! Marker lifecycle and clustering.
//!
//! [`ClusterLayer`] turns a [`PointSet`] into one [`Marker`] per valid point
//! and registers them with a single clustering aggregator in the map's layer
//! stack. A new snapshot identity triggers a full rebuild: the previous
//! aggregator is detached and its markers dropped before the new one is
//! attached, so the stack never holds stale markers.

mod group;
mod marker;

pub use group::Cluster;
pub use marker::{Interaction, Marker, MarkerAction, TooltipContent};

use std::fmt;

use poimap_core::{Point, PointSet, Viewport};

use crate::map::{LayerId, LayerKind, MapError, MapInstance, OpenTooltip};

/// Summary of a [`ClusterLayer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Markers now attached.
    pub rendered: usize,
    /// Points dropped for invalid coordinates.
    pub skipped: usize,
    /// Whether the aggregator was rebuilt by this call.
    pub rebuilt: bool,
}

#[derive(Debug)]
struct AttachedGroup {
    layer: LayerId,
    source: PointSet,
    markers: Vec<Marker>,
    skipped: usize,
}

/// Owner of the markers and their clustering aggregator.
pub struct ClusterLayer {
    on_select: Box<dyn Fn(&Point)>,
    attached: Option<AttachedGroup>,
}

impl ClusterLayer {
    /// Create a detached layer whose markers report clicks to `on_select`.
    pub fn new(on_select: impl Fn(&Point) + 'static) -> Self {
        Self {
            on_select: Box::new(on_select),
            attached: None,
        }
    }

    /// Attach markers for `points`, rebuilding only when the snapshot
    /// identity differs from the one currently attached.
    pub fn render(
        &mut self,
        map: &mut MapInstance,
        points: &PointSet,
    ) -> Result<RenderReport, MapError> {
        if let Some(group) = &self.attached
            && group.source.same_identity(points)
        {
            return Ok(RenderReport {
                rendered: group.markers.len(),
                skipped: group.skipped,
                rebuilt: false,
            });
        }

        self.detach(map)?;

        let mut markers = Vec::with_capacity(points.len());
        let mut skipped = 0;
        for point in points.points() {
            if let Err(err) = point.validate() {
                log::warn!("skipping point: {err}");
                skipped += 1;
                continue;
            }
            markers.push(Marker::new(point.clone()));
        }

        let layer = map.add_layer(LayerKind::MarkerCluster {
            markers: markers.len(),
        });
        let report = RenderReport {
            rendered: markers.len(),
            skipped,
            rebuilt: true,
        };
        log::debug!(
            "rendered {} marker(s) for {} ({} skipped)",
            report.rendered,
            points.name(),
            report.skipped
        );
        self.attached = Some(AttachedGroup {
            layer,
            source: points.clone(),
            markers,
            skipped,
        });
        Ok(report)
    }

    /// Remove the aggregator from the map and drop its markers.
    ///
    /// Detaching an already detached layer is a no-op.
    pub fn detach(&mut self, map: &mut MapInstance) -> Result<(), MapError> {
        let Some(group) = self.attached.take() else {
            return Ok(());
        };
        if let Some(open) = map.tooltip()
            && group.markers.iter().any(|m| m.point().id == open.point_id)
        {
            map.clear_tooltip();
        }
        map.remove_layer(group.layer)?;
        Ok(())
    }

    /// Whether an aggregator is in the map's layer stack.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Number of markers currently attached.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers().len()
    }

    /// Attached markers in dataset order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        self.attached
            .as_ref()
            .map_or(&[], |group| group.markers.as_slice())
    }

    /// The marker for `point_id`, if it was rendered.
    #[must_use]
    pub fn marker(&self, point_id: u64) -> Option<&Marker> {
        self.markers().iter().find(|m| m.point().id == point_id)
    }

    /// Clusters for the attached markers at `zoom`.
    pub fn clusters(&self, map: &MapInstance, zoom: u8) -> Vec<Cluster> {
        let settings = map.settings();
        group::cluster_markers(
            self.markers(),
            zoom,
            settings.cluster_radius,
            settings.tile_size,
        )
    }

    /// Run the handler registered for `interaction` on the marker for
    /// `point_id`. Unknown markers are ignored.
    pub fn dispatch(
        &self,
        map: &mut MapInstance,
        point_id: u64,
        interaction: Interaction,
    ) -> Option<MarkerAction> {
        let marker = self.marker(point_id)?;
        let action = marker.handler(interaction)?;
        match action {
            MarkerAction::ShowTooltip => map.open_tooltip(OpenTooltip {
                point_id,
                anchor: marker.point().location,
                content: marker.tooltip().clone(),
            }),
            MarkerAction::HideTooltip => {
                map.close_tooltip(point_id);
            }
            MarkerAction::Select => (self.on_select)(marker.point()),
        }
        Some(action)
    }

    /// Zoom to a cluster's bounds, as clicking its glyph does.
    ///
    /// Singletons and clusters whose members share one location leave the
    /// view unchanged.
    pub fn zoom_to_cluster(&self, map: &mut MapInstance, cluster: &Cluster) -> Option<Viewport> {
        if cluster.is_singleton() || cluster.bounds.is_degenerate() {
            return None;
        }
        Some(map.fit_bounds(&cluster.bounds))
    }
}

impl fmt::Debug for ClusterLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterLayer")
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
