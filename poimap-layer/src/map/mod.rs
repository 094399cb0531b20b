//! Headless model of the map library's instance.
//!
//! [`MapInstance`] owns everything the rendering library would: the
//! viewport, the ordered layer stack, the controls in the chrome and the
//! single tooltip slot. Layers and controls are addressed by opaque ids
//! handed out on attachment; removing an id twice is an error rather than a
//! silent no-op so that teardown bugs surface.

mod control;

pub use control::{
    ControlContext, ControlDescriptor, ControlOutput, ControlPosition, ControlView,
};

use geo::Coord;
use poimap_core::{BoundingRegion, MapSettings, TileSource, Viewport, projection};
use thiserror::Error;

use crate::cluster::TooltipContent;

/// Handle to an attached layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

/// Handle to an attached control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

/// What an entry in the layer stack draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    /// Background raster tiles.
    Tiles(TileSource),
    /// A clustering aggregator holding `markers` markers.
    MarkerCluster {
        /// Number of markers registered with the aggregator.
        markers: usize,
    },
}

/// The tooltip currently shown next to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTooltip {
    /// Point whose marker opened the tooltip.
    pub point_id: u64,
    /// Marker location the tooltip is anchored to.
    pub anchor: Coord<f64>,
    /// What the tooltip shows.
    pub content: TooltipContent,
}

/// Errors raised by [`MapInstance`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The layer id was never attached or has already been removed.
    #[error("layer {0:?} is not attached to the map")]
    UnknownLayer(LayerId),
    /// The control id was never attached or has already been removed.
    #[error("control {0:?} is not attached to the map")]
    UnknownControl(ControlId),
    /// Release was attempted before teardown finished.
    #[error("cannot release map with {layers} layer(s) and {controls} control(s) still attached")]
    StillAttached {
        /// Layers still in the stack.
        layers: usize,
        /// Controls still in the chrome.
        controls: usize,
    },
}

#[derive(Debug)]
struct LayerEntry {
    id: LayerId,
    kind: LayerKind,
}

#[derive(Debug)]
struct ControlEntry {
    id: ControlId,
    descriptor: ControlDescriptor,
}

/// The single mutable map resource.
#[derive(Debug)]
pub struct MapInstance {
    settings: MapSettings,
    viewport: Viewport,
    view_revision: u64,
    layers: Vec<LayerEntry>,
    controls: Vec<ControlEntry>,
    tooltip: Option<OpenTooltip>,
    next_id: u64,
}

impl MapInstance {
    /// Create an instance showing the settings' default view.
    pub fn new(settings: MapSettings) -> Self {
        let viewport = settings.default_view;
        Self {
            settings,
            viewport,
            view_revision: 0,
            layers: Vec::new(),
            controls: Vec::new(),
            tooltip: None,
            next_id: 1,
        }
    }

    /// Settings the instance was created with.
    #[must_use]
    pub const fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Current centre and zoom.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of times the viewport has been set since creation.
    pub fn view_revision(&self) -> u64 {
        self.view_revision
    }

    /// Move to `center` at `zoom`, clamped to the configured zoom range.
    pub fn set_view(&mut self, center: Coord<f64>, zoom: u8) -> Viewport {
        self.viewport = Viewport::new(center, self.settings.clamp_zoom(zoom));
        self.view_revision += 1;
        self.viewport
    }

    /// Change zoom around the current centre.
    pub fn set_zoom(&mut self, zoom: u8) -> Viewport {
        self.set_view(self.viewport.center, zoom)
    }

    /// Show the whole of `region` at the deepest zoom that fits.
    pub fn fit_bounds(&mut self, region: &BoundingRegion) -> Viewport {
        let target = projection::fit_region(region, &self.settings);
        self.set_view(target.center, target.zoom)
    }

    /// Geographic region currently on screen.
    pub fn visible_region(&self) -> BoundingRegion {
        projection::visible_region(&self.viewport, &self.settings)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Push a layer on top of the stack.
    pub fn add_layer(&mut self, kind: LayerKind) -> LayerId {
        let id = LayerId(self.allocate_id());
        log::debug!("attaching layer {id:?}: {kind:?}");
        self.layers.push(LayerEntry { id, kind });
        id
    }

    /// Remove a layer, returning what it drew.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<LayerKind, MapError> {
        let position = self
            .layers
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(MapError::UnknownLayer(id))?;
        log::debug!("detaching layer {id:?}");
        Ok(self.layers.remove(position).kind)
    }

    /// Whether `id` is still in the stack.
    #[must_use]
    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layers.iter().any(|entry| entry.id == id)
    }

    /// What the layer `id` draws.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&LayerKind> {
        self.layers
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.kind)
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &LayerKind)> + '_ {
        self.layers.iter().map(|entry| (entry.id, &entry.kind))
    }

    /// Number of clustering aggregators in the stack.
    pub fn cluster_layer_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|entry| matches!(entry.kind, LayerKind::MarkerCluster { .. }))
            .count()
    }

    /// Inject a control into the chrome.
    pub fn add_control(&mut self, descriptor: ControlDescriptor) -> ControlId {
        let id = ControlId(self.allocate_id());
        log::debug!("adding control {} as {id:?}", descriptor.name());
        self.controls.push(ControlEntry { id, descriptor });
        id
    }

    /// Take a control out of the chrome.
    pub fn remove_control(&mut self, id: ControlId) -> Result<ControlDescriptor, MapError> {
        let position = self
            .controls
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(MapError::UnknownControl(id))?;
        let entry = self.controls.remove(position);
        log::debug!("removed control {} ({id:?})", entry.descriptor.name());
        Ok(entry.descriptor)
    }

    /// Whether `id` is still in the chrome.
    #[must_use]
    pub fn has_control(&self, id: ControlId) -> bool {
        self.controls.iter().any(|entry| entry.id == id)
    }

    /// Controls in insertion order as `(id, name, position)`.
    pub fn controls(&self) -> impl Iterator<Item = (ControlId, &'static str, ControlPosition)> + '_ {
        self.controls.iter().map(|entry| {
            (
                entry.id,
                entry.descriptor.name(),
                entry.descriptor.position(),
            )
        })
    }

    /// Render the control `id` as it appears in the chrome.
    pub fn render_control(&self, id: ControlId) -> Result<ControlView, MapError> {
        self.controls
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.descriptor.render())
            .ok_or(MapError::UnknownControl(id))
    }

    /// Activate a control; non-interactive controls yield
    /// [`ControlOutput::Nothing`].
    pub fn activate_control(
        &mut self,
        id: ControlId,
        context: &ControlContext<'_>,
    ) -> Result<ControlOutput, MapError> {
        let entry = self
            .controls
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(MapError::UnknownControl(id))?;
        Ok(entry
            .descriptor
            .activate(context)
            .unwrap_or(ControlOutput::Nothing))
    }

    /// Show a tooltip, replacing any other open tooltip.
    pub fn open_tooltip(&mut self, tooltip: OpenTooltip) {
        self.tooltip = Some(tooltip);
    }

    /// Close the tooltip if it belongs to `point_id`.
    pub fn close_tooltip(&mut self, point_id: u64) -> bool {
        if self
            .tooltip
            .as_ref()
            .is_some_and(|open| open.point_id == point_id)
        {
            self.tooltip = None;
            return true;
        }
        false
    }

    /// Close whatever tooltip is open.
    pub fn clear_tooltip(&mut self) {
        self.tooltip = None;
    }

    /// The open tooltip, if any.
    #[must_use]
    pub const fn tooltip(&self) -> Option<&OpenTooltip> {
        self.tooltip.as_ref()
    }

    /// Destroy the instance once everything has been detached.
    pub fn release(self) -> Result<(), MapError> {
        if self.layers.is_empty() && self.controls.is_empty() {
            return Ok(());
        }
        Err(MapError::StillAttached {
            layers: self.layers.len(),
            controls: self.controls.len(),
        })
    }
}
