//! Shared test harness modules for the CLI.

use super::*;

mod export_steps;
mod helpers;
mod search_steps;
mod view_steps;
