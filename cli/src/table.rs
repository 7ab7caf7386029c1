// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// A column of a rendered table.
pub trait TableColumn<T> {
    fn name(&self) -> Cow<'_, str>;

    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// How a table is written out.
pub trait TableStyle {
    fn write<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result;
}

pub struct Table<'a, S: TableStyle, T, C: TableColumn<T>> {
    style: S,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, S: TableStyle, T, C: TableColumn<T>> Table<'a, S, T, C> {
    pub fn new(style: S, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            style,
            columns,
            data,
        }
    }
}

impl<S: TableStyle, T, C: TableColumn<T>> fmt::Display for Table<'_, S, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.style.write(f, self.columns, self.data)
    }
}

/// Padded, colored columns separated by spaces.
#[derive(Debug, Clone)]
pub struct TableStyleBasic {
    separator: &'static str,
    header: bool,
}

impl TableStyleBasic {
    pub fn new() -> Self {
        Self {
            separator: " ",
            header: false,
        }
    }

    pub fn with_header(mut self) -> Self {
        self.header = true;
        self
    }
}

impl TableStyle for TableStyleBasic {
    fn write<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result {
        let header: Vec<Cow<'_, str>> = columns.iter().map(|c| c.name()).collect();
        let rows: Vec<Vec<Cow<'_, str>>> = data
            .iter()
            .map(|d| columns.iter().map(|c| c.format(d)).collect())
            .collect();

        let mut widths = vec![0; columns.len()];
        for row in rows.iter().chain(self.header.then_some(&header)) {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }

        if self.header {
            let cells = header.iter().map(|h| h.bold().to_string());
            write_row(f, columns, &widths, self.separator, cells, &header)?;
        }
        for (row, item) in rows.iter().zip(data) {
            let cells = columns.iter().zip(row).map(|(col, cell)| match col.color(item) {
                Some(color) => cell.color(color).to_string(),
                None => cell.to_string(),
            });
            write_row(f, columns, &widths, self.separator, cells, row)?;
        }
        Ok(())
    }
}

/// Pad using the plain text width, since colored cells carry escape codes.
fn write_row<T, C: TableColumn<T>>(
    f: &mut fmt::Formatter<'_>,
    columns: &[C],
    widths: &[usize],
    separator: &str,
    cells: impl Iterator<Item = String>,
    plain: &[Cow<'_, str>],
) -> fmt::Result {
    let last = columns.len().saturating_sub(1);
    for (i, cell) in cells.enumerate() {
        let pad = widths[i].saturating_sub(plain[i].width());
        match columns[i].padding_direction() {
            PaddingDirection::Left if i == last => write!(f, "{cell}")?,
            PaddingDirection::Left => write!(f, "{cell}{:pad$}", "")?,
            PaddingDirection::Right => write!(f, "{:pad$}{cell}", "")?,
        }
        if i < last {
            f.write_str(separator)?;
        }
    }
    writeln!(f)
}

/// An array of objects keyed by column name.
#[derive(Debug, Clone)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub fn new() -> Self {
        Self
    }
}

impl TableStyle for TableStyleJson {
    fn write<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        data: &[T],
    ) -> fmt::Result {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = data
            .iter()
            .map(|d| {
                columns
                    .iter()
                    .map(|c| (c.name().into_owned(), c.format(d).into_owned().into()))
                    .collect()
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
