//! Behaviour-driven step definitions driving the view CLI scenarios.

use super::*;
use crate::view::{ViewOutput, run_view};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{scenario, then, when};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct ViewWorld {
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ViewWorld {
    fn run(&self, extra: &[&str]) {
        let mut argv = vec!["poimap", "view"];
        argv.extend_from_slice(extra);
        let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::View(args) => {
                let mut buffer = self.stdout.borrow_mut();
                run_view(args, &mut *buffer)
            }
            other => panic!("expected view command, found {other:?}"),
        });
        self.result.replace(Some(outcome));
    }

    fn output(&self) -> ViewOutput {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        result.as_ref().expect("expected success");
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be JSON")
    }
}

#[fixture]
fn world() -> ViewWorld {
    ViewWorld::default()
}

#[when("I run the view command")]
fn run_view_command(#[from(world)] world: &ViewWorld) {
    world.run(&[]);
}

#[when("I run the view command at zoom 3")]
fn run_view_at_zoom_three(#[from(world)] world: &ViewWorld) {
    world.run(&["--zoom", "3"]);
}

#[when("I run the view command with padding -1")]
fn run_view_with_bad_padding(#[from(world)] world: &ViewWorld) {
    world.run(&["--padding=-1"]);
}

#[then("the printed viewport frames every monastery")]
fn viewport_frames_monasteries(#[from(world)] world: &ViewWorld) {
    let output = world.output();
    assert!(!output.fallback);
    let region = output.region.expect("fitted region");
    for point in poimap_data::monasteries().points() {
        assert!(point.lat() >= region.south_west.lat && point.lat() <= region.north_east.lat);
        assert!(point.lon() >= region.south_west.lon && point.lon() <= region.north_east.lon);
    }
    let center = Coord {
        x: output.viewport.center.lon,
        y: output.viewport.center.lat,
    };
    assert!(center.x > region.south_west.lon && center.x < region.north_east.lon);
    assert!(center.y > region.south_west.lat && center.y < region.north_east.lat);
}

#[then("the printed clusters cover 6 markers")]
fn clusters_cover_markers(#[from(world)] world: &ViewWorld) {
    let output = world.output();
    assert_eq!(output.markers, 6);
    let total: usize = output.clusters.iter().map(|c| c.members.len()).sum();
    assert_eq!(total, 6);
}

#[then("the printed viewport has zoom 3")]
fn viewport_has_zoom_three(#[from(world)] world: &ViewWorld) {
    assert_eq!(world.output().viewport.zoom, 3);
}

#[then("the printed clusters form a single group of 6")]
fn single_cluster(#[from(world)] world: &ViewWorld) {
    let output = world.output();
    assert_eq!(output.clusters.len(), 1);
    assert_eq!(output.clusters[0].label, "6");
    assert_eq!(output.clusters[0].members, vec![1, 2, 3, 4, 5, 6]);
}

#[then("the command fails because the map settings are invalid")]
fn fails_invalid_settings(#[from(world)] world: &ViewWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    assert!(matches!(error, CliError::InvalidSettings(_)), "found {error:?}");
}

macro_rules! register_view_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/view_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ViewWorld) {
            let _ = world;
        }
    };
}

register_view_scenario!(view_builtin, "fitting the built-in sample");
register_view_scenario!(view_zoomed_out, "zooming out merges clusters");
register_view_scenario!(view_invalid_padding, "rejecting invalid padding");
