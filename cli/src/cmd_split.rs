// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, sync::Arc};

use almanac_core::{EntryId, Occurrence};
use clap::{ArgMatches, Command, arg};
use jiff::civil::Date;

use crate::arg::{CommonArgs, OutputFormat, parse_date};
use crate::cli::Engine;
use crate::occurrence_formatter::OccurrenceFormatter;

#[derive(Debug, Clone)]
pub struct CmdSplit {
    pub id: EntryId,
    pub date: Option<Date>,
    pub output_format: OutputFormat,
}

impl CmdSplit {
    pub const NAME: &str = "split";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the per-day fragments of an entry crossing midnight")
            .arg(CommonArgs::id())
            .arg(
                arg!(--on <DATE> "Occurrence date, the entry's own date by default")
                    .value_parser(parse_date),
            )
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: CommonArgs::get_id(matches),
            date: matches.get_one("on").copied(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, almanac: &Engine) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "splitting entry...");
        let entry = almanac
            .store()
            .entry(self.id)
            .ok_or_else(|| format!("Entry #{} not found", self.id))?;
        let date = self.date.unwrap_or(entry.date);

        let fragments = almanac.split_midnight_crossing(Occurrence::on(Arc::new(entry), date));
        let formatter = OccurrenceFormatter::new().with_output_format(self.output_format);
        println!("{}", formatter.format(&fragments));
        Ok(())
    }
}
