// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use almanac_core::EntryId;
use clap::{ArgMatches, Command, arg};
use jiff::civil::Date;

use crate::arg::{CommonArgs, OutputFormat, parse_date};
use crate::cli::Engine;

#[derive(Debug, Clone)]
pub struct CmdExpand {
    pub id: EntryId,
    pub through: Option<Date>,
    pub output_format: OutputFormat,
}

impl CmdExpand {
    pub const NAME: &str = "expand";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List the dates a repeating entry occurs on")
            .arg(CommonArgs::id())
            .arg(
                arg!(--through <DATE> "Cover at least this date for rules without an end")
                    .value_parser(parse_date),
            )
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: CommonArgs::get_id(matches),
            through: matches.get_one("through").copied(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, almanac: &Engine) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "expanding entry...");
        let entry = almanac
            .store()
            .entry(self.id)
            .ok_or_else(|| format!("Entry #{} not found", self.id))?;
        if !entry.is_repeating() {
            return Err(format!("Entry #{} does not repeat", self.id).into());
        }

        let dates = match self.through {
            Some(through) => almanac.expand_through(&entry, through),
            None => almanac.expand(&entry),
        };
        println!("{}", format_dates(&dates, self.output_format)?);
        Ok(())
    }
}

fn format_dates(dates: &[Date], format: OutputFormat) -> Result<String, Box<dyn Error>> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(dates)?,
        OutputFormat::Table => dates
            .iter()
            .map(|d| d.strftime("%Y-%m-%d %a").to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    })
}
