//! Behaviour-driven step definitions driving the search CLI scenarios.

use super::*;
use crate::search::{GeocoderBuilder, SearchOutput, SearchStatus, run_search_with};
use geo::Coord;
use poimap_core::{BoundingRegion, GeocodeError, GeocodeResult, Geocoder};
use poimap_data::NominatimConfig;
use poimap_data::geocoding::test_support::StubGeocoder;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct StubGeocoderBuilder {
    geocoder: StubGeocoder,
}

impl GeocoderBuilder for StubGeocoderBuilder {
    fn build(&self, _config: &NominatimConfig) -> Result<Box<dyn Geocoder>, CliError> {
        Ok(Box::new(self.geocoder.clone()))
    }
}

#[derive(Debug)]
struct SearchWorld {
    builder: RefCell<Option<StubGeocoderBuilder>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl SearchWorld {
    fn output(&self) -> SearchOutput {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be JSON")
    }

    fn run(&self, argv: &[&str]) {
        let guard = self.builder.borrow();
        let builder = guard.as_ref().expect("geocoder configured");
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Search(args) => {
                let config = args.into_config()?;
                let mut buffer = self.stdout.borrow_mut();
                run_search_with(&config, builder, &mut *buffer)
            }
            other => panic!("expected search command, found {other:?}"),
        });
        self.result.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> SearchWorld {
    SearchWorld {
        builder: RefCell::new(None),
        stdout: RefCell::new(Vec::new()),
        result: RefCell::new(None),
    }
}

fn gangtok_bbox() -> BoundingRegion {
    BoundingRegion::new(Coord { x: 88.58, y: 27.30 }, Coord { x: 88.64, y: 27.36 })
}

fn use_geocoder(world: &SearchWorld, geocoder: StubGeocoder) {
    world
        .builder
        .replace(Some(StubGeocoderBuilder { geocoder }));
}

#[given("a geocoder that knows Gangtok")]
fn geocoder_knows_gangtok(#[from(world)] world: &SearchWorld) {
    let bbox = gangtok_bbox();
    use_geocoder(
        world,
        StubGeocoder::with_results(vec![GeocodeResult {
            name: "Gangtok, Sikkim".to_owned(),
            center: bbox.center(),
            bbox,
        }]),
    );
}

#[given("a geocoder that is unreachable")]
fn geocoder_unreachable(#[from(world)] world: &SearchWorld) {
    use_geocoder(
        world,
        StubGeocoder::with_error(GeocodeError::NetworkError {
            url: "https://nominatim.example.com/search".to_owned(),
            message: "connection refused".to_owned(),
        }),
    );
}

#[given("a geocoder that finds nothing")]
fn geocoder_finds_nothing(#[from(world)] world: &SearchWorld) {
    use_geocoder(world, StubGeocoder::empty());
}

#[when("I run the search command for \"Gangtok\"")]
fn run_search_for_gangtok(#[from(world)] world: &SearchWorld) {
    world.run(&["poimap", "search", "Gangtok"]);
}

#[when("I run the search command without a query")]
fn run_search_without_query(#[from(world)] world: &SearchWorld) {
    world.run(&["poimap", "search"]);
}

#[then("the command prints an applied result for \"Gangtok, Sikkim\"")]
fn prints_applied_result(#[from(world)] world: &SearchWorld) {
    let output = world.output();
    assert_eq!(output.status, SearchStatus::Applied);
    assert_eq!(output.place.as_deref(), Some("Gangtok, Sikkim"));
    assert_eq!(output.query, "Gangtok");
    assert!(output.region.is_some());
}

#[then("the printed viewport is centred inside Gangtok")]
fn viewport_inside_gangtok(#[from(world)] world: &SearchWorld) {
    let center = world.output().viewport.center;
    assert!(
        gangtok_bbox().contains(Coord {
            x: center.lon,
            y: center.lat,
        }),
        "viewport centre {center:?} should lie inside the Gangtok box"
    );
}

#[then("the command prints a failed search")]
fn prints_failed_search(#[from(world)] world: &SearchWorld) {
    let output = world.output();
    assert_eq!(output.status, SearchStatus::Failed);
    assert!(output.place.is_none());
    let message = output.error.expect("error message");
    assert!(message.contains("connection refused"), "found {message:?}");
}

#[then("the command prints a search without results")]
fn prints_no_results(#[from(world)] world: &SearchWorld) {
    let output = world.output();
    assert_eq!(output.status, SearchStatus::NoResults);
    assert!(output.region.is_none());
}

#[then("the command fails because the query is missing")]
fn fails_missing_query(#[from(world)] world: &SearchWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SEARCH_QUERY),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_search_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/search_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SearchWorld) {
            let _ = world;
        }
    };
}

register_search_scenario!(search_applies_result, "applying the first geocoder result");
register_search_scenario!(search_reports_failure, "reporting a geocoder failure");
register_search_scenario!(search_reports_unknown_place, "reporting an unknown place");
register_search_scenario!(search_requires_query, "rejecting a missing query");
