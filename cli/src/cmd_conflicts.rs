// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, error::Error, fmt};

use almanac_core::{Conflict, ConflictLabel, ConflictRequest, EntryId, TimeOfDay};
use clap::{ArgAction, ArgMatches, Command, arg, value_parser};
use colored::Color;
use jiff::civil::{Date, Time};

use crate::arg::{CommonArgs, OutputFormat, parse_date, parse_time};
use crate::cli::Engine;
use crate::config::Config;
use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic};

#[derive(Debug, Clone)]
pub struct CmdConflicts {
    pub dates: Vec<Date>,
    pub time: Option<Time>,
    pub all_day: bool,
    pub duration: i64,
    pub participants: Vec<String>,
    pub user: Option<String>,
    pub exclude: Option<EntryId>,
    pub output_format: OutputFormat,
}

impl CmdConflicts {
    pub const NAME: &str = "conflicts";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Check a proposed entry against the participants' calendars")
            .arg(
                arg!(dates: <DATE> "Dates the proposed entry occurs on")
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .value_parser(parse_date),
            )
            .arg(arg!(-t --time <TIME> "Start time as HH:MM").value_parser(parse_time))
            .arg(
                arg!(--"all-day" "The proposed entry takes the whole day")
                    .conflicts_with_all(["time", "duration"]),
            )
            .arg(
                arg!(-d --duration <MINUTES> "Duration in minutes")
                    .value_parser(value_parser!(i64).range(0..))
                    .default_value("60"),
            )
            .arg(CommonArgs::participants())
            .arg(CommonArgs::user())
            .arg(
                arg!(--exclude <ID> "Entry being edited, never reported against itself")
                    .value_parser(value_parser!(i64)),
            )
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            dates: matches
                .get_many::<Date>("dates")
                .map(|v| v.copied().collect())
                .unwrap_or_default(),
            time: matches.get_one("time").copied(),
            all_day: matches.get_flag("all-day"),
            duration: matches.get_one("duration").copied().unwrap_or(60),
            participants: CommonArgs::get_participants(matches),
            user: CommonArgs::get_user(matches),
            exclude: matches.get_one::<i64>("exclude").copied().map(EntryId),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    /// The engine request, the proposed entry being untimed without a time.
    pub fn request(&self, requester: String) -> ConflictRequest {
        let (time, duration) = match (self.all_day, self.time) {
            (true, _) => (TimeOfDay::AllDay, 24 * 60),
            (false, Some(t)) => (TimeOfDay::Timed(t), self.duration),
            (false, None) => (TimeOfDay::Untimed, 0),
        };
        ConflictRequest {
            dates: self.dates.clone(),
            time,
            duration,
            participants: self.participants.clone(),
            requester,
            exclude: self.exclude,
        }
    }

    pub fn run(self, almanac: &Engine, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "checking conflicts...");
        let request = self.request(config.user(self.user.as_ref())?);
        let conflicts = almanac.check_conflicts(&request)?;

        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&conflicts)?),
            OutputFormat::Table if conflicts.is_empty() => println!("No conflicts"),
            OutputFormat::Table => print!("{}", ConflictTable(&conflicts)),
        }
        Ok(())
    }
}

struct ConflictTable<'a>(&'a [Conflict]);

impl fmt::Display for ConflictTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const COLUMNS: [ConflictColumn; 4] = [
            ConflictColumn::Date,
            ConflictColumn::TimeRange,
            ConflictColumn::Login,
            ConflictColumn::Label,
        ];
        write!(f, "{}", Table::new(TableStyleBasic::new().with_header(), &COLUMNS, self.0))
    }
}

#[derive(Debug, Clone, Copy)]
enum ConflictColumn {
    Date,
    TimeRange,
    Login,
    Label,
}

impl TableColumn<Conflict> for ConflictColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            ConflictColumn::Date => "Date",
            ConflictColumn::TimeRange => "Time Range",
            ConflictColumn::Login => "Login",
            ConflictColumn::Label => "Entry",
        }
        .into()
    }

    fn format<'a>(&self, c: &'a Conflict) -> Cow<'a, str> {
        match self {
            ConflictColumn::Date => c.date.to_string().into(),
            ConflictColumn::TimeRange => match (c.all_day, c.time, c.end) {
                (true, _, _) => "all day".into(),
                (false, TimeOfDay::Timed(start), Some(end)) => {
                    format!("{}~{}", start.strftime("%H:%M"), end.strftime("%H:%M")).into()
                }
                _ => "".into(),
            },
            ConflictColumn::Login => c.login.as_str().into(),
            ConflictColumn::Label => {
                let label: Cow<'a, str> = match &c.label {
                    ConflictLabel::Named { id, name } => format!("#{id} {name}").into(),
                    ConflictLabel::Private => "(private)".into(),
                    ConflictLabel::Confidential => "(confidential)".into(),
                };
                if c.limit_exceeded {
                    format!("{label} [limit reached]").into()
                } else {
                    label
                }
            }
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, c: &Conflict) -> Option<Color> {
        match self {
            ConflictColumn::Label if c.limit_exceeded => Some(Color::Red),
            _ => None,
        }
    }
}
