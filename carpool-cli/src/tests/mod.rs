//! Shared test harness modules for the carpool CLI.

use super::*;

mod helpers;
mod sequence_steps;
mod sequence_unit;
