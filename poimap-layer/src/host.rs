//! Top-level owner of the map instance and its components.
//!
//! [`MapHost`] creates the instance on mount, hands `&mut` access to each
//! component in turn, and tears everything down in a fixed order before
//! releasing the instance. The instance never outlives the mount.

use std::io;

use poimap_core::{
    BoundingRegion, GeocodeError, Geocoder, MapSettings, Point, PointSet, SettingsError,
    Viewport,
};
use thiserror::Error;

use crate::cluster::{Cluster, ClusterLayer, Interaction, MarkerAction, RenderReport};
use crate::export::{Download, DownloadSink, ExportControl};
use crate::map::{ControlContext, ControlOutput, LayerId, LayerKind, MapError, MapInstance};
use crate::search::{GeocodeEvent, PendingQuery, QueryToken, SearchControl, SearchOutcome};
use crate::selection::{PanelView, Selection, SelectionPanel};
use crate::viewport::{FitOutcome, ViewportController};

/// Where the host is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Non-interactive pre-render with no rendering surface.
    PreRender,
    /// A live client able to display the map.
    Interactive,
}

/// Errors raised by [`MapHost`].
#[derive(Debug, Error)]
pub enum HostError {
    /// Mount was attempted during pre-render.
    #[error("the map can only be mounted in an interactive environment")]
    NotInteractive,
    /// Mount was attempted while a map is live.
    #[error("the map is already mounted")]
    AlreadyMounted,
    /// The operation needs a mounted map.
    #[error("the map is not mounted")]
    NotMounted,
    /// The settings failed validation.
    #[error("invalid map settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    /// The instance rejected an attach or detach.
    #[error(transparent)]
    Map(#[from] MapError),
    /// A control reported [`ControlOutput::Failed`](crate::ControlOutput::Failed).
    #[error("{control} control failed: {message}")]
    Control {
        /// Name of the failing control.
        control: &'static str,
        /// What went wrong.
        message: String,
    },
    /// The download sink could not store the file.
    #[error("failed to deliver download: {0}")]
    Download(#[from] io::Error),
}

#[derive(Debug)]
struct Mounted {
    map: MapInstance,
    tiles: LayerId,
    export: ExportControl,
    cluster: ClusterLayer,
    search: SearchControl,
    points: PointSet,
}

/// The map component and its mount lifecycle.
///
/// # Examples
/// ```
/// use poimap_core::{MapSettings, Point, PointSet};
/// use poimap_layer::{HostEnvironment, Interaction, MapHost};
///
/// let points = PointSet::new(
///     "Monasteries",
///     vec![
///         Point::from_lat_lon(1, "Rumtek", 27.3258, 88.6012),
///         Point::from_lat_lon(2, "Phodong", 27.428, 88.613),
///     ],
/// );
/// let mut host = MapHost::new(MapSettings::default())?;
/// host.mount(HostEnvironment::Interactive, points)?;
///
/// host.interact(2, Interaction::Click)?;
/// assert_eq!(host.panel().map(|view| view.point_id), Some(2));
///
/// host.unmount()?;
/// # Ok::<(), poimap_layer::HostError>(())
/// ```
#[derive(Debug)]
pub struct MapHost {
    settings: MapSettings,
    viewport: ViewportController,
    selection: Selection,
    mounted: Option<Mounted>,
}

impl MapHost {
    /// Create an unmounted host after validating `settings`.
    pub fn new(settings: MapSettings) -> Result<Self, HostError> {
        settings.validate()?;
        Ok(Self {
            viewport: ViewportController::from_settings(&settings),
            settings,
            selection: Selection::new(),
            mounted: None,
        })
    }

    /// Settings every mount starts from.
    #[must_use]
    pub const fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// The selection slot shared with the markers.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether a map instance is live.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Read-only view of the live instance.
    pub fn map(&self) -> Option<&MapInstance> {
        self.mounted.as_ref().map(|m| &m.map)
    }

    /// The marker layer of the live instance.
    #[must_use]
    pub fn cluster_layer(&self) -> Option<&ClusterLayer> {
        self.mounted.as_ref().map(|m| &m.cluster)
    }

    /// Dataset currently handed to the map.
    pub fn points(&self) -> Option<&PointSet> {
        self.mounted.as_ref().map(|m| &m.points)
    }

    fn mounted(&self) -> Result<&Mounted, HostError> {
        self.mounted.as_ref().ok_or(HostError::NotMounted)
    }

    fn mounted_mut(&mut self) -> Result<&mut Mounted, HostError> {
        self.mounted.as_mut().ok_or(HostError::NotMounted)
    }

    /// Create the map, attach its layers and controls, and fit the initial
    /// viewport to the rendered markers.
    pub fn mount(
        &mut self,
        environment: HostEnvironment,
        points: PointSet,
    ) -> Result<FitOutcome, HostError> {
        if environment == HostEnvironment::PreRender {
            log::debug!("deferring map mount until the client is interactive");
            return Err(HostError::NotInteractive);
        }
        if self.mounted.is_some() {
            return Err(HostError::AlreadyMounted);
        }

        self.selection.clear();
        let mut map = MapInstance::new(self.settings.clone());
        let tiles = map.add_layer(LayerKind::Tiles(self.settings.tiles.clone()));
        let mut export = ExportControl::new();
        export.attach(&mut map);
        let mut cluster = ClusterLayer::new(self.selection.callback());
        cluster.render(&mut map, &points)?;
        let mut search = SearchControl::new();
        search.attach(&mut map);
        let fit = self
            .viewport
            .fit(&mut map, cluster.markers().iter().map(|m| m.point()));

        log::info!(
            "mounted map for {} with {} marker(s)",
            points.name(),
            cluster.marker_count()
        );
        self.mounted = Some(Mounted {
            map,
            tiles,
            export,
            cluster,
            search,
            points,
        });
        Ok(fit)
    }

    /// React to a new dataset snapshot.
    ///
    /// A snapshot with a new identity rebuilds the markers, refits the
    /// viewport and resets the search box. A selected point that is not part
    /// of the new snapshot is deselected. The same snapshot is a no-op.
    pub fn render(&mut self, points: PointSet) -> Result<RenderReport, HostError> {
        let viewport = self.viewport;
        let selection = self.selection.clone();
        let mounted = self.mounted_mut()?;
        let report = mounted.cluster.render(&mut mounted.map, &points)?;
        if report.rebuilt {
            let selected = selection.current().map(|point| point.id);
            if selected.is_some_and(|id| mounted.cluster.marker(id).is_none()) {
                selection.clear();
            }
            mounted.search.detach(&mut mounted.map)?;
            viewport.fit(
                &mut mounted.map,
                mounted.cluster.markers().iter().map(|m| m.point()),
            );
            mounted.search.attach(&mut mounted.map);
        }
        mounted.points = points;
        Ok(report)
    }

    /// Detach everything and release the instance.
    pub fn unmount(&mut self) -> Result<(), HostError> {
        let mut mounted = self.mounted.take().ok_or(HostError::NotMounted)?;
        self.selection.clear();
        mounted.cluster.detach(&mut mounted.map)?;
        mounted.search.detach(&mut mounted.map)?;
        mounted.export.detach(&mut mounted.map)?;
        mounted.map.remove_layer(mounted.tiles)?;
        mounted.map.release()?;
        log::info!("unmounted map for {}", mounted.points.name());
        Ok(())
    }

    /// Forward a pointer interaction to the marker for `point_id`.
    pub fn interact(
        &mut self,
        point_id: u64,
        interaction: Interaction,
    ) -> Result<Option<MarkerAction>, HostError> {
        let mounted = self.mounted_mut()?;
        Ok(mounted
            .cluster
            .dispatch(&mut mounted.map, point_id, interaction))
    }

    /// The selection panel, or `None` while it is hidden or unmounted.
    pub fn panel(&self) -> Option<PanelView> {
        self.mounted.as_ref()?;
        SelectionPanel::render(&self.selection)
    }

    /// The panel's dismiss control.
    pub fn dismiss_selection(&self) {
        SelectionPanel::dismiss(&self.selection);
    }

    /// Change zoom around the current centre.
    pub fn set_zoom(&mut self, zoom: u8) -> Result<Viewport, HostError> {
        Ok(self.mounted_mut()?.map.set_zoom(zoom))
    }

    /// Clusters at the current zoom.
    pub fn clusters(&self) -> Result<Vec<Cluster>, HostError> {
        let mounted = self.mounted()?;
        Ok(mounted
            .cluster
            .clusters(&mounted.map, mounted.map.viewport().zoom))
    }

    /// Click a cluster glyph.
    pub fn click_cluster(&mut self, cluster: &Cluster) -> Result<Option<Viewport>, HostError> {
        let mounted = self.mounted_mut()?;
        Ok(mounted.cluster.zoom_to_cluster(&mut mounted.map, cluster))
    }

    /// Valid points inside the current viewport.
    pub fn visible_points(&self) -> Result<Vec<&Point>, HostError> {
        let mounted = self.mounted()?;
        let region: BoundingRegion = mounted.map.visible_region();
        Ok(mounted.points.points_in_region(&region))
    }

    /// Press the export button and hand the file to `sink`.
    pub fn export(&mut self, sink: &mut dyn DownloadSink) -> Result<Option<Download>, HostError> {
        let mounted = self.mounted_mut()?;
        let id = mounted.export.id().ok_or(HostError::NotMounted)?;
        let context = ControlContext {
            points: &mounted.points,
        };
        match mounted.map.activate_control(id, &context)? {
            ControlOutput::Nothing => Ok(None),
            ControlOutput::Download(download) => {
                sink.deliver(download.clone())?;
                Ok(Some(download))
            }
            ControlOutput::Failed { control, message } => {
                Err(HostError::Control { control, message })
            }
        }
    }

    /// Type a query into the search box and confirm it.
    pub fn submit_search(&mut self, query: &str) -> Result<Option<PendingQuery>, HostError> {
        Ok(self.mounted_mut()?.search.submit(query))
    }

    /// Deliver a provider event for an earlier query.
    pub fn deliver_geocode(
        &mut self,
        token: QueryToken,
        event: GeocodeEvent,
    ) -> Result<SearchOutcome, HostError> {
        let viewport = self.viewport;
        let mounted = self.mounted_mut()?;
        Ok(mounted
            .search
            .deliver(&mut mounted.map, &viewport, token, event))
    }

    /// Submit `query`, resolve it with `geocoder` and deliver the answer.
    ///
    /// Blank queries return `Ok(None)` without contacting the geocoder.
    pub fn search(
        &mut self,
        query: &str,
        geocoder: &dyn Geocoder,
    ) -> Result<Option<SearchOutcome>, HostError> {
        let Some(pending) = self.submit_search(query)? else {
            return Ok(None);
        };
        let answer: Result<_, GeocodeError> = geocoder.geocode(&pending.query);
        self.deliver_geocode(pending.token, GeocodeEvent::Confirmed(answer))
            .map(Some)
    }
}
