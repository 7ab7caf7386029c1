// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use almanac_core::{CategoryFilter, EntryId};
use clap::{Arg, ArgAction, ArgMatches, arg, value_parser};
use jiff::{
    Zoned,
    civil::{Date, Time},
};

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }

    pub fn user() -> Arg {
        arg!(-u --user <LOGIN> "Login acting on the calendar")
    }

    pub fn get_user(matches: &ArgMatches) -> Option<String> {
        matches.get_one("user").cloned()
    }

    pub fn id() -> Arg {
        arg!(id: <ID> "Id of the entry").value_parser(value_parser!(i64))
    }

    pub fn get_id(matches: &ArgMatches) -> EntryId {
        EntryId(*matches.get_one::<i64>("id").expect("id is required"))
    }

    pub fn date() -> Arg {
        arg!(date: [DATE] "Date as YYYY-MM-DD, today when omitted").value_parser(parse_date)
    }

    pub fn get_date(matches: &ArgMatches) -> Option<Date> {
        matches.get_one("date").copied()
    }

    pub fn participants() -> Arg {
        arg!(-p --participant <LOGIN> "Participant login, repeatable")
            .action(ArgAction::Append)
    }

    pub fn get_participants(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("participant")
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ViewArgs;

impl ViewArgs {
    pub fn today() -> Arg {
        arg!(--today <DATE> "Date overdue tasks float to, the current date by default")
            .value_parser(parse_date)
    }

    pub fn get_today(matches: &ArgMatches) -> Option<Date> {
        matches.get_one("today").copied()
    }

    pub fn include_unapproved() -> Arg {
        arg!(-w --"include-unapproved" "Include entries still waiting for approval")
    }

    pub fn get_include_unapproved(matches: &ArgMatches) -> bool {
        matches.get_flag("include-unapproved")
    }

    pub fn category() -> Arg {
        arg!(--category <CATEGORY> "Category id, or 'none' for uncategorized entries")
            .value_parser(parse_category)
    }

    pub fn get_category(matches: &ArgMatches) -> CategoryFilter {
        matches
            .get_one("category")
            .copied()
            .unwrap_or(CategoryFilter::Any)
    }
}

/// Parse a `YYYY-MM-DD` date, or `today`.
pub fn parse_date(s: &str) -> Result<Date, String> {
    if s == "today" {
        return Ok(Zoned::now().date());
    }
    s.parse()
        .map_err(|_| format!("Invalid date '{s}'. Expected format: YYYY-MM-DD"))
}

/// Parse a `HH:MM` wall-clock time.
pub fn parse_time(s: &str) -> Result<Time, String> {
    Time::strptime("%H:%M", s).map_err(|_| format!("Invalid time '{s}'. Expected format: HH:MM"))
}

fn parse_category(s: &str) -> Result<CategoryFilter, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(CategoryFilter::Uncategorized);
    }
    s.parse()
        .map(CategoryFilter::Only)
        .map_err(|_| format!("Invalid category '{s}'. Expected an id or 'none'"))
}
