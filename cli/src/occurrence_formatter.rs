// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use almanac_core::{Access, Occurrence, Status, TimeOfDay};
use colored::Color;

use crate::arg::OutputFormat;
use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};

#[derive(Debug)]
pub struct OccurrenceFormatter {
    columns: Vec<OccurrenceColumn>,
    format: OutputFormat,
}

impl OccurrenceFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![
                OccurrenceColumn::Id,
                OccurrenceColumn::Date,
                OccurrenceColumn::TimeRange,
                OccurrenceColumn::Login,
                OccurrenceColumn::Name,
            ],
            format: OutputFormat::Table,
        }
    }

    /// Show the status and access columns as well.
    pub fn verbose(mut self) -> Self {
        self.columns
            .extend([OccurrenceColumn::Status, OccurrenceColumn::Access]);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, occurrences: &'a [Occurrence]) -> Display<'a> {
        Display {
            occurrences,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    occurrences: &'a [Occurrence],
    formatter: &'a OccurrenceFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.formatter.columns;
        match self.formatter.format {
            OutputFormat::Json => write!(
                f,
                "{}",
                Table::new(TableStyleJson::new(), columns, self.occurrences)
            ),
            OutputFormat::Table => write!(
                f,
                "{}",
                Table::new(TableStyleBasic::new(), columns, self.occurrences)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceColumn {
    Id,
    Date,
    TimeRange,
    Login,
    Name,
    Status,
    Access,
}

impl TableColumn<Occurrence> for OccurrenceColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            OccurrenceColumn::Id => "Id",
            OccurrenceColumn::Date => "Date",
            OccurrenceColumn::TimeRange => "Time Range",
            OccurrenceColumn::Login => "Login",
            OccurrenceColumn::Name => "Name",
            OccurrenceColumn::Status => "Status",
            OccurrenceColumn::Access => "Access",
        }
        .into()
    }

    fn format<'a>(&self, occ: &'a Occurrence) -> Cow<'a, str> {
        match self {
            OccurrenceColumn::Id => format!("#{}", occ.id()).into(),
            OccurrenceColumn::Date => occ.date.to_string().into(),
            OccurrenceColumn::TimeRange => format_time_range(occ).into(),
            OccurrenceColumn::Login => occ.entry.login.as_str().into(),
            OccurrenceColumn::Name => occ.name(),
            OccurrenceColumn::Status => match occ.entry.status {
                Status::Approved => "approved",
                Status::Waiting => "waiting",
                Status::Rejected => "rejected",
                Status::Deleted => "deleted",
            }
            .into(),
            OccurrenceColumn::Access => match occ.entry.access {
                Access::Public => "public",
                Access::Confidential => "confidential",
                Access::Private => "private",
            }
            .into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            OccurrenceColumn::Id => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, occ: &Occurrence) -> Option<Color> {
        match self {
            OccurrenceColumn::Name if occ.entry.status == Status::Waiting => Some(Color::Yellow),
            OccurrenceColumn::Name if occ.is_continuation() => Some(Color::BrightBlack),
            _ => None,
        }
    }
}

/// `HH:MM~HH:MM` for timed occurrences.
pub fn format_time_range(occ: &Occurrence) -> String {
    match (occ.time, occ.end_time()) {
        (TimeOfDay::AllDay, _) => "all day".to_string(),
        (TimeOfDay::Timed(start), Some(end)) if occ.duration > 0 => {
            format!("{}~{}", start.strftime("%H:%M"), end.strftime("%H:%M"))
        }
        (TimeOfDay::Timed(start), _) => start.strftime("%H:%M").to_string(),
        (TimeOfDay::Untimed, _) => String::new(),
    }
}
