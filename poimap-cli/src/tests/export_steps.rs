//! Behaviour-driven step definitions driving the export CLI scenarios.

use super::helpers::{Workspace, write_gangtok_dataset};
use super::*;
use crate::export::run_export;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct ExportWorld {
    workspace: Workspace,
    output_dir: Utf8PathBuf,
    dataset: RefCell<Option<Utf8PathBuf>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ExportWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let output_dir = workspace.join("exports");
        Self {
            workspace,
            output_dir,
            dataset: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec![
            "poimap".to_owned(),
            "export".to_owned(),
            format!("--{ARG_OUTPUT_DIR}"),
            self.output_dir.as_str().to_owned(),
        ];
        if let Some(dataset) = self.dataset.borrow().as_ref() {
            argv.extend([format!("--{ARG_DATASET}"), dataset.as_str().to_owned()]);
        }
        argv
    }

    fn track_point_count(&self, file_name: &str) -> usize {
        let bytes = std::fs::read(self.output_dir.join(file_name)).expect("exported file");
        let document = gpx::read(bytes.as_slice()).expect("valid GPX");
        document
            .tracks
            .iter()
            .flat_map(|track| &track.segments)
            .map(|segment| segment.points.len())
            .sum()
    }
}

#[fixture]
fn world() -> ExportWorld {
    ExportWorld::new()
}

#[given("an empty output directory")]
fn empty_output_directory(#[from(world)] world: &ExportWorld) {
    assert!(!world.output_dir.exists(), "output directory should not exist yet");
}

#[given("the Gangtok dataset exists on disk")]
fn gangtok_dataset(#[from(world)] world: &ExportWorld) {
    let path = write_gangtok_dataset(&world.workspace);
    world.dataset.replace(Some(path));
}

#[given("the dataset path points at a missing file")]
fn missing_dataset(#[from(world)] world: &ExportWorld) {
    world
        .dataset
        .replace(Some(world.workspace.join("missing.json")));
}

#[when("I run the export command")]
fn run_export_command(#[from(world)] world: &ExportWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Export(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_export(args, &mut *buffer)
        }
        other => panic!("expected export command, found {other:?}"),
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints the written path")]
fn command_succeeds(#[from(world)] world: &ExportWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let printed = stdout.trim();
    assert!(
        printed.starts_with(world.output_dir.as_str()) && printed.ends_with(".gpx"),
        "unexpected output {printed:?}"
    );
}

#[then("\"monasteries.gpx\" holds 6 track points")]
fn monasteries_exported(#[from(world)] world: &ExportWorld) {
    assert_eq!(world.track_point_count("monasteries.gpx"), 6);
}

#[then("\"gangtok-gompas.gpx\" holds 3 track points")]
fn gangtok_exported(#[from(world)] world: &ExportWorld) {
    assert_eq!(world.track_point_count("gangtok-gompas.gpx"), 3);
}

#[then("the command fails because the dataset is missing")]
fn command_fails_missing_dataset(#[from(world)] world: &ExportWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(!world.output_dir.exists(), "nothing should be written");
}

macro_rules! register_export_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/export_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ExportWorld) {
            let _ = world;
        }
    };
}

register_export_scenario!(export_builtin, "exporting the built-in sample");
register_export_scenario!(export_dataset_file, "exporting a dataset file");
register_export_scenario!(export_missing_dataset, "rejecting a missing dataset");
