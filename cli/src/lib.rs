// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end of the Almanac scheduling engine.

mod arg;
mod cli;
mod cmd_conflicts;
mod cmd_day;
mod cmd_expand;
mod cmd_generate_completion;
mod cmd_matrix;
mod cmd_split;
mod config;
mod data;
mod occurrence_formatter;
mod table;

pub use crate::cli::{Cli, Commands, run};
pub use crate::config::{Config, parse_config};
pub use crate::data::DataFile;
