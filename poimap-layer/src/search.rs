//! Geocoding search box embedded in the map chrome.
//!
//! Queries are asynchronous from the map's point of view: [`SearchControl::submit`]
//! hands out a [`PendingQuery`] and the provider later reports back through
//! [`SearchControl::deliver`]. Only the confirmed event for the most recent
//! token moves the viewport; intermediate suggestions and superseded answers
//! are dropped. A geocode result never becomes a marker.

use poimap_core::{GeocodeError, GeocodeResult};

use crate::map::{
    ControlDescriptor, ControlId, ControlPosition, ControlView, MapError, MapInstance,
};
use crate::viewport::{FitOutcome, ViewportController};

const CONTROL_NAME: &str = "search";
const PLACEHOLDER: &str = "Search...";

/// Monotonic sequence number identifying a submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryToken(u64);

/// A query awaiting its provider's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Token to hand back with the provider's answer.
    pub token: QueryToken,
    /// Trimmed query text.
    pub query: String,
}

/// Events a geocoding provider reports for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeEvent {
    /// Type-ahead candidates; never applied to the map.
    Suggestions(Vec<GeocodeResult>),
    /// The user confirmed the query and the provider answered.
    Confirmed(Result<Vec<GeocodeResult>, GeocodeError>),
}

/// What [`SearchControl::deliver`] did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The first result was fitted.
    Applied {
        /// The result that was fitted.
        result: GeocodeResult,
        /// How the viewport moved.
        fit: FitOutcome,
    },
    /// Intermediate suggestions were received and ignored.
    Intermediate,
    /// A newer query has been issued since this one.
    Stale,
    /// The provider found nothing.
    NoResults,
    /// The provider failed; the viewport is unchanged.
    Failed(GeocodeError),
    /// The control is not attached to a map.
    Detached,
}

/// The search control and its query sequencing.
#[derive(Debug, Default)]
pub struct SearchControl {
    control: Option<ControlId>,
    next_token: u64,
    latest: Option<QueryToken>,
}

impl SearchControl {
    /// A control not yet in any chrome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the search box to the map chrome. Attaching twice keeps the
    /// existing box.
    pub fn attach(&mut self, map: &mut MapInstance) -> ControlId {
        if let Some(id) = self.control {
            return id;
        }
        let descriptor = ControlDescriptor::new(CONTROL_NAME, ControlPosition::TopRight, || {
            ControlView {
                class: "leaflet-control-geocoder leaflet-bar".to_owned(),
                content: PLACEHOLDER.to_owned(),
            }
        });
        let id = map.add_control(descriptor);
        self.control = Some(id);
        id
    }

    /// Remove the search box; answers to earlier queries are discarded.
    pub fn detach(&mut self, map: &mut MapInstance) -> Result<(), MapError> {
        self.latest = None;
        match self.control.take() {
            Some(id) => map.remove_control(id).map(drop),
            None => Ok(()),
        }
    }

    /// Whether the search box is in the chrome.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.control.is_some()
    }

    /// Token of the most recently submitted query.
    #[must_use]
    pub const fn latest(&self) -> Option<QueryToken> {
        self.latest
    }

    /// Issue a new query, superseding any outstanding one.
    ///
    /// Blank queries and queries on a detached control are ignored.
    pub fn submit(&mut self, query: &str) -> Option<PendingQuery> {
        let query = query.trim();
        if query.is_empty() || self.control.is_none() {
            return None;
        }
        self.next_token += 1;
        let token = QueryToken(self.next_token);
        self.latest = Some(token);
        Some(PendingQuery {
            token,
            query: query.to_owned(),
        })
    }

    /// Handle a provider event for `token`.
    pub fn deliver(
        &mut self,
        map: &mut MapInstance,
        viewport: &ViewportController,
        token: QueryToken,
        event: GeocodeEvent,
    ) -> SearchOutcome {
        if self.control.is_none() {
            return SearchOutcome::Detached;
        }
        let results = match event {
            GeocodeEvent::Suggestions(_) => return SearchOutcome::Intermediate,
            GeocodeEvent::Confirmed(results) => results,
        };
        if self.latest != Some(token) {
            log::debug!("discarding stale geocode answer for {token:?}");
            return SearchOutcome::Stale;
        }
        match results {
            Err(err) => {
                log::warn!("geocoding failed: {err}");
                SearchOutcome::Failed(err)
            }
            Ok(results) => match results.into_iter().next() {
                None => {
                    log::debug!("geocoder returned no results");
                    SearchOutcome::NoResults
                }
                Some(result) => {
                    let fit = viewport.fit_region(map, &result.bbox);
                    SearchOutcome::Applied { result, fit }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use poimap_core::{BoundingRegion, MapSettings};
    use rstest::{fixture, rstest};

    struct World {
        map: MapInstance,
        viewport: ViewportController,
        search: SearchControl,
    }

    #[fixture]
    fn world() -> World {
        let settings = MapSettings::default();
        let mut map = MapInstance::new(settings.clone());
        let mut search = SearchControl::new();
        search.attach(&mut map);
        World {
            viewport: ViewportController::from_settings(&settings),
            map,
            search,
        }
    }

    fn gangtok() -> GeocodeResult {
        let bbox = BoundingRegion::new(Coord { x: 88.58, y: 27.30 }, Coord { x: 88.64, y: 27.36 });
        GeocodeResult {
            name: "Gangtok".into(),
            center: bbox.center(),
            bbox,
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_queries_are_ignored(mut world: World, #[case] query: &str) {
        assert!(world.search.submit(query).is_none());
        assert!(world.search.latest().is_none());
    }

    #[rstest]
    fn tokens_increase(mut world: World) {
        let first = world.search.submit("Gangtok").expect("query");
        let second = world.search.submit("Pelling").expect("query");
        assert!(second.token > first.token);
        assert_eq!(world.search.latest(), Some(second.token));
    }

    #[rstest]
    fn confirmed_latest_result_fits_exact_bbox(mut world: World) {
        let pending = world.search.submit(" Gangtok ").expect("query");
        assert_eq!(pending.query, "Gangtok");
        let outcome = world.search.deliver(
            &mut world.map,
            &world.viewport,
            pending.token,
            GeocodeEvent::Confirmed(Ok(vec![gangtok()])),
        );
        let SearchOutcome::Applied { fit, .. } = outcome else {
            panic!("expected applied outcome, got {outcome:?}");
        };
        assert_eq!(fit.region(), Some(&gangtok().bbox));
        assert_eq!(world.map.layers().count(), 0);
    }

    #[rstest]
    fn suggestions_never_move_the_map(mut world: World) {
        let pending = world.search.submit("Gang").expect("query");
        let outcome = world.search.deliver(
            &mut world.map,
            &world.viewport,
            pending.token,
            GeocodeEvent::Suggestions(vec![gangtok()]),
        );
        assert_eq!(outcome, SearchOutcome::Intermediate);
        assert_eq!(world.map.view_revision(), 0);
    }

    #[rstest]
    fn superseded_answer_is_stale(mut world: World) {
        let old = world.search.submit("Gangtok").expect("query");
        world.search.submit("Pelling").expect("query");
        let outcome = world.search.deliver(
            &mut world.map,
            &world.viewport,
            old.token,
            GeocodeEvent::Confirmed(Ok(vec![gangtok()])),
        );
        assert_eq!(outcome, SearchOutcome::Stale);
        assert_eq!(world.map.view_revision(), 0);
    }

    #[rstest]
    #[case(GeocodeEvent::Confirmed(Ok(Vec::new())), SearchOutcome::NoResults)]
    #[case(
        GeocodeEvent::Confirmed(Err(GeocodeError::ParseError { message: "bad".into() })),
        SearchOutcome::Failed(GeocodeError::ParseError { message: "bad".into() })
    )]
    fn misses_leave_viewport_alone(
        mut world: World,
        #[case] event: GeocodeEvent,
        #[case] expected: SearchOutcome,
    ) {
        let pending = world.search.submit("Nowhere").expect("query");
        let outcome = world
            .search
            .deliver(&mut world.map, &world.viewport, pending.token, event);
        assert_eq!(outcome, expected);
        assert_eq!(world.map.view_revision(), 0);
    }

    #[rstest]
    fn detach_discards_outstanding_query(mut world: World) {
        let pending = world.search.submit("Gangtok").expect("query");
        world.search.detach(&mut world.map).expect("detach");
        let outcome = world.search.deliver(
            &mut world.map,
            &world.viewport,
            pending.token,
            GeocodeEvent::Confirmed(Ok(vec![gangtok()])),
        );
        assert_eq!(outcome, SearchOutcome::Detached);
        assert_eq!(world.map.controls().count(), 0);
    }
}
