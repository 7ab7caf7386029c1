// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use almanac_core::CategoryFilter;
use clap::{ArgMatches, Command, arg, value_parser};
use jiff::{ToSpan, Zoned, civil::Date};

use crate::arg::{CommonArgs, OutputFormat, ViewArgs};
use crate::cli::Engine;
use crate::config::Config;
use crate::occurrence_formatter::OccurrenceFormatter;

#[derive(Debug, Clone)]
pub struct CmdDay {
    pub date: Option<Date>,
    pub days: u16,
    pub user: Option<String>,
    pub today: Option<Date>,
    pub include_unapproved: bool,
    pub category: CategoryFilter,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdDay {
    pub const NAME: &str = "day";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the merged entries of a day as a user sees them")
            .arg(CommonArgs::date())
            .arg(
                arg!(-n --days <N> "Number of consecutive days to show")
                    .value_parser(value_parser!(u16).range(1..=366))
                    .default_value("1"),
            )
            .arg(CommonArgs::user())
            .arg(ViewArgs::today())
            .arg(ViewArgs::include_unapproved())
            .arg(ViewArgs::category())
            .arg(CommonArgs::output_format())
            .arg(arg!(-l --long "Show status and access"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            date: CommonArgs::get_date(matches),
            days: matches.get_one("days").copied().unwrap_or(1),
            user: CommonArgs::get_user(matches),
            today: ViewArgs::get_today(matches),
            include_unapproved: ViewArgs::get_include_unapproved(matches),
            category: ViewArgs::get_category(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: matches.get_flag("long"),
        }
    }

    pub fn run(self, almanac: &Engine, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "showing day...");
        let user = config.user(self.user.as_ref())?;
        let today = self
            .today
            .unwrap_or_else(|| Zoned::now().with_time_zone(almanac.time_zone().clone()).date());
        let from = self.date.unwrap_or(today);
        let to = from.checked_add((i64::from(self.days) - 1).days())?;

        let ctx = almanac.context(&user)?;
        let view = almanac.load_view(&ctx, from, to, self.category)?;

        let mut formatter = OccurrenceFormatter::new().with_output_format(self.output_format);
        if self.verbose {
            formatter = formatter.verbose();
        }
        let mut occurrences = Vec::new();
        let mut day = from;
        while day <= to {
            occurrences.extend(almanac.merge_for_day(&view, day, today, self.include_unapproved));
            day = day.tomorrow()?;
        }
        println!("{}", formatter.format(&occurrences));
        Ok(())
    }
}
