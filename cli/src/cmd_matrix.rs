// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fmt};

use almanac_core::{BusyMatrix, Cell};
use clap::{ArgMatches, Command};
use colored::Colorize;
use jiff::{Zoned, civil::Date};
use unicode_width::UnicodeWidthStr;

use crate::arg::{CommonArgs, OutputFormat};
use crate::cli::Engine;

#[derive(Debug, Clone)]
pub struct CmdMatrix {
    pub date: Option<Date>,
    pub participants: Vec<String>,
    pub output_format: OutputFormat,
}

impl CmdMatrix {
    pub const NAME: &str = "matrix";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the free/busy matrix of participants over the work day")
            .arg(CommonArgs::date())
            .arg(CommonArgs::participants().required(true))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            date: CommonArgs::get_date(matches),
            participants: CommonArgs::get_participants(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, almanac: &Engine) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "building busy matrix...");
        let date = self
            .date
            .unwrap_or_else(|| Zoned::now().with_time_zone(almanac.time_zone().clone()).date());
        let matrix = almanac.busy_matrix(date, &self.participants)?;
        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matrix)?),
            OutputFormat::Table => print!("{}", MatrixGrid(&matrix)),
        }
        Ok(())
    }
}

/// One character per cell, with hour marks above.
struct MatrixGrid<'a>(&'a BusyMatrix);

impl fmt::Display for MatrixGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matrix = self.0;
        let width = matrix.rows.iter().map(|r| r.login.width()).max().unwrap_or(0);
        let cells = matrix.rows.first().map_or(0, |r| r.cells.len());

        let mut marks = vec![' '; cells + 2];
        let mut next_free = 0;
        for i in 0..cells {
            let start = matrix.cell_start(i);
            if start.minute() == 0 && i >= next_free {
                let hour = format!("{:02}", start.hour());
                for (j, ch) in hour.chars().enumerate() {
                    marks[i + j] = ch;
                }
                next_free = i + 3;
            }
        }
        let marks: String = marks.into_iter().collect();
        writeln!(f, "{}", matrix.date.to_string().bold())?;
        writeln!(f, "{:width$} {}", "", marks.trim_end())?;

        for row in &matrix.rows {
            let pad = width.saturating_sub(row.login.width());
            write!(f, "{}{:pad$} ", row.login, "")?;
            for cell in &row.cells {
                match cell {
                    Cell::Free => write!(f, ".")?,
                    Cell::Waiting(_) => write!(f, "{}", "w".yellow())?,
                    Cell::Approved(_) => write!(f, "{}", "#".red())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
