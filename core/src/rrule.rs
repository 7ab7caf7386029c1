// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use jiff::civil::{Date, Weekday};
use regex::Regex;

use crate::error::Error;
use crate::store::RepeatRow;
use crate::types::WeekStart;

/// Count stored for rules that are not bounded by a number of occurrences.
pub const COUNT_UNSET: u32 = 999;

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every N days.
    Daily,

    /// Every N weeks.
    Weekly,

    /// Every N months.
    Monthly,

    /// Every N years.
    Yearly,
}

impl Frequency {
    /// Decode a stored repeat type. Every monthly variant maps to `Monthly`,
    /// the BY* lists carry the distinction.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        match code.as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "yearly" => Some(Frequency::Yearly),
            c if c.starts_with("monthly") => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// A BYDAY entry: a weekday with an optional signed ordinal, e.g. `2MO` or `-1FR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByDay {
    /// Which occurrence within the period, negative counts from its end.
    pub nth: Option<i8>,

    /// The weekday.
    pub weekday: Weekday,
}

impl ByDay {
    /// Every `weekday` of the period.
    pub fn every(weekday: Weekday) -> Self {
        ByDay { nth: None, weekday }
    }

    /// The `nth` `weekday` of the period.
    pub fn nth(nth: i8, weekday: Weekday) -> Self {
        ByDay {
            nth: Some(nth),
            weekday,
        }
    }
}

impl FromStr for ByDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const RE: &str = r"(?i)^\s*([+-]?\d{1,2})?\s*(SU|MO|TU|WE|TH|FR|SA)\s*$";
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());
        let captures = re.captures(s).ok_or_else(|| Error::invalid("byday", s))?;

        let nth = match captures.get(1) {
            Some(m) => {
                let n: i8 = m.as_str().parse().map_err(|_| Error::invalid("byday", s))?;
                if n == 0 {
                    return Err(Error::invalid("byday", s));
                }
                Some(n)
            }
            None => None,
        };
        let weekday = match captures[2].to_ascii_uppercase().as_str() {
            "SU" => Weekday::Sunday,
            "MO" => Weekday::Monday,
            "TU" => Weekday::Tuesday,
            "WE" => Weekday::Wednesday,
            "TH" => Weekday::Thursday,
            "FR" => Weekday::Friday,
            _ => Weekday::Saturday,
        };
        Ok(ByDay { nth, weekday })
    }
}

impl fmt::Display for ByDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.nth {
            write!(f, "{n}")?;
        }
        let code = match self.weekday {
            Weekday::Sunday => "SU",
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
        };
        f.write_str(code)
    }
}

/// A recurrence rule attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Repeat frequency, `None` when the stored type was not recognized.
    pub frequency: Option<Frequency>,

    /// Repeat every `interval` units, at least 1.
    pub interval: u32,

    /// Bound on the number of occurrences.
    pub count: Option<u32>,

    /// Last date an occurrence may fall on.
    pub until: Option<Date>,

    /// Week start used for weekly stepping and week numbers.
    pub week_start: WeekStart,

    /// Months of the year, 1 to 12.
    pub by_month: Vec<i8>,

    /// Weeks of the year, ±1 to 53.
    pub by_week_no: Vec<i8>,

    /// Days of the year, ±1 to 366.
    pub by_year_day: Vec<i16>,

    /// Days of the month, ±1 to 31.
    pub by_month_day: Vec<i8>,

    /// Weekdays with optional ordinals.
    pub by_day: Vec<ByDay>,

    /// Positions within the set of a period's candidates.
    pub by_set_pos: Vec<i32>,
}

impl RecurrenceRule {
    /// A rule repeating every single unit of `frequency`, without bounds or modifiers.
    pub fn new(frequency: Frequency) -> Self {
        RecurrenceRule {
            frequency: Some(frequency),
            interval: 1,
            count: None,
            until: None,
            week_start: WeekStart::default(),
            by_month: Vec::new(),
            by_week_no: Vec::new(),
            by_year_day: Vec::new(),
            by_month_day: Vec::new(),
            by_day: Vec::new(),
            by_set_pos: Vec::new(),
        }
    }

    /// Decode a stored repeat row.
    ///
    /// Unknown repeat types and unparsable list items are logged and
    /// dropped; the rule then simply matches fewer dates.
    pub fn from_row(row: &RepeatRow) -> Self {
        let frequency = Frequency::from_code(&row.rpt_type);
        if frequency.is_none() {
            tracing::warn!(rpt_type = %row.rpt_type, "unrecognized repeat type");
        }

        let week_start = row.wkst.parse().unwrap_or_else(|e| {
            tracing::warn!(err = %e, "invalid week start, using Monday");
            WeekStart::Monday
        });

        RecurrenceRule {
            frequency,
            interval: row.frequency.max(1),
            count: row.count.filter(|&c| c != 0 && c != COUNT_UNSET),
            until: row.end,
            week_start,
            by_month: parse_list("bymonth", &row.bymonth),
            by_week_no: parse_list("byweekno", &row.byweekno),
            by_year_day: parse_list("byyearday", &row.byyearday),
            by_month_day: parse_list("bymonthday", &row.bymonthday),
            by_day: parse_list("byday", &row.byday),
            by_set_pos: parse_list("bysetpos", &row.bysetpos),
        }
    }

    /// The interval, never below 1.
    pub fn interval(&self) -> u32 {
        self.interval.max(1)
    }
}

fn parse_list<T: FromStr>(field: &'static str, raw: &str) -> Vec<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| match item.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(field, item, "ignoring malformed rule item");
                None
            }
        })
        .collect()
}

/// Dates removed from, and added to, the dates a rule generates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    /// Dates on which no occurrence is produced.
    pub exceptions: BTreeSet<Date>,

    /// Dates on which an occurrence is forced.
    pub inclusions: BTreeSet<Date>,
}

impl ExceptionSet {
    /// Build from stored `(date, is_exception)` rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (Date, bool)>) -> Self {
        let mut set = ExceptionSet::default();
        for (date, is_exception) in rows {
            if is_exception {
                set.exceptions.insert(date);
            } else {
                set.inclusions.insert(date);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty() && self.inclusions.is_empty()
    }
}
