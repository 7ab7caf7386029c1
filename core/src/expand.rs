// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Expansion of a recurrence rule into the dates it occurs on.
//!
//! An expansion runs through fixed stages: `Init` validates the rule and
//! fixes the horizon, `Stepping` walks the periods of the rule, after which
//! exceptions are removed, inclusions merged and the count bound applied.

use jiff::ToSpan;
use jiff::Zoned;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::byrule::{Period, by_day, by_month_day, by_set_pos, by_week_no, by_year_day, compose};
use crate::cache::ExpansionCache;
use crate::config::Config;
use crate::datetime::{StepUnit, add_days, add_interval, iso_year_week_day, weeks_in_year};
use crate::entry::Entry;
use crate::rrule::{ExceptionSet, Frequency, RecurrenceRule};

/// Bounds applied to rules that do not bound themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Months after the start an unbounded rule is expanded for.
    pub months: u32,

    /// Year whose January 1st caps rules bounded only by a count.
    pub count_sentinel_year: i16,

    /// Extend unbounded rules at least up to this date.
    pub through: Option<Date>,
}

impl Horizon {
    pub fn from_config(config: &Config) -> Self {
        Horizon {
            months: config.conflict_repeat_months,
            count_sentinel_year: config.count_horizon_year,
            through: None,
        }
    }

    /// The same horizon, extended up to `date` for unbounded rules.
    pub fn through(self, date: Date) -> Self {
        Horizon {
            through: Some(date),
            ..self
        }
    }

    fn default_end(&self, rule: &RecurrenceRule, start: Date) -> Date {
        if rule.count.is_some() {
            Date::new(self.count_sentinel_year, 1, 1).unwrap_or(Date::MAX)
        } else if let Some(until) = rule.until {
            until
        } else {
            start
                .checked_add(i64::from(self.months).months())
                .unwrap_or(Date::MAX)
        }
    }

    /// Last date an occurrence of `rule` starting on `start` may fall on.
    pub fn end(&self, rule: &RecurrenceRule, start: Date) -> Date {
        let end = self.default_end(rule, start);
        match self.through {
            Some(through) if self.extends(rule, start) => through.max(end),
            _ => end,
        }
    }

    /// Whether `through` pushes an unbounded rule past its default horizon.
    /// Such expansions depend on the caller's range and are not cached.
    pub fn extends(&self, rule: &RecurrenceRule, start: Date) -> bool {
        rule.count.is_none()
            && rule.until.is_none()
            && self
                .through
                .is_some_and(|through| through > self.default_end(rule, start))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Init,
    Stepping(Frequency),
    ExceptionFilter,
    InclusionMerge,
    Bounded,
    Done,
}

struct Expansion<'a> {
    rule: &'a RecurrenceRule,
    exceptions: &'a ExceptionSet,
    start: Zoned,
    horizon: Horizon,
    end: Date,
    dates: Vec<Date>,
}

/// Expand the recurrence of `entry`, anchored in `tz`.
///
/// Entries without a rule, and rules of an unknown type, have no dates.
pub fn expand(entry: &Entry, tz: &TimeZone, horizon: Horizon) -> Vec<Date> {
    let Some(rule) = &entry.rule else {
        return Vec::new();
    };
    let Some(start) = entry.anchor(tz) else {
        tracing::warn!(
            id = %entry.id,
            date = %entry.date,
            "entry start cannot be placed in time zone"
        );
        return Vec::new();
    };

    let mut run = Expansion {
        rule,
        exceptions: &entry.exceptions,
        start,
        horizon,
        end: entry.date,
        dates: Vec::new(),
    };

    let mut stage = Stage::Init;
    while stage != Stage::Done {
        tracing::trace!(id = %entry.id, ?stage, count = run.dates.len(), "expansion stage");
        stage = run.advance(stage);
    }

    if rule.frequency.is_none() {
        tracing::warn!(id = %entry.id, "repeat type not recognized, no occurrences");
    }
    run.dates
}

impl Expansion<'_> {
    fn advance(&mut self, stage: Stage) -> Stage {
        match stage {
            Stage::Init => match self.rule.frequency {
                Some(frequency) => {
                    self.end = self.horizon.end(self.rule, self.start.date());
                    Stage::Stepping(frequency)
                }
                None => Stage::Done,
            },
            Stage::Stepping(frequency) => {
                if self.start.date() <= self.end {
                    match frequency {
                        Frequency::Daily => self.step_daily(),
                        Frequency::Weekly => self.step_weekly(),
                        Frequency::Monthly => self.step_monthly(),
                        Frequency::Yearly => self.step_yearly(),
                    }
                }
                Stage::ExceptionFilter
            }
            Stage::ExceptionFilter => {
                let exceptions = &self.exceptions.exceptions;
                self.dates.retain(|d| !exceptions.contains(d));
                Stage::InclusionMerge
            }
            Stage::InclusionMerge => {
                self.dates.extend(self.exceptions.inclusions.iter().copied());
                self.dates.sort_unstable();
                self.dates.dedup();
                Stage::Bounded
            }
            Stage::Bounded => {
                if let Some(count) = self.rule.count {
                    self.dates.truncate(count as usize);
                }
                Stage::Done
            }
            Stage::Done => Stage::Done,
        }
    }

    fn interval(&self) -> i64 {
        i64::from(self.rule.interval())
    }

    fn limit_reached(&self) -> bool {
        self.rule
            .count
            .is_some_and(|count| self.dates.len() >= count as usize)
    }

    fn push(&mut self, date: Date) {
        if date >= self.start.date() && date <= self.end && self.dates.last() < Some(&date) {
            self.dates.push(date);
        }
    }

    fn step_daily(&mut self) {
        let mut current = self.start.clone();
        while current.date() <= self.end && !self.limit_reached() {
            if self.matches_day(current.date()) {
                self.push(current.date());
            }
            match add_interval(&current, StepUnit::Day, self.interval()) {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    /// Same-day filters of daily rules, a day must pass every modifier present.
    fn matches_day(&self, date: Date) -> bool {
        let rule = self.rule;
        if !rule.by_month.is_empty() && !rule.by_month.contains(&date.month()) {
            return false;
        }
        if !rule.by_week_no.is_empty() {
            let Some(iso) = iso_year_week_day(date, rule.week_start) else {
                return false;
            };
            let weeks = weeks_in_year(iso.year, rule.week_start).unwrap_or(52);
            let from_end = iso.week - weeks - 1;
            if !rule.by_week_no.iter().any(|&w| w == iso.week || w == from_end) {
                return false;
            }
        }
        if !rule.by_year_day.is_empty() {
            let doy = date.day_of_year();
            let from_end = doy - date.days_in_year() - 1;
            if !rule.by_year_day.iter().any(|&d| d == doy || d == from_end) {
                return false;
            }
        }
        if !rule.by_month_day.is_empty() {
            let dom = date.day();
            let from_end = dom - date.days_in_month() - 1;
            if !rule.by_month_day.iter().any(|&d| d == dom || d == from_end) {
                return false;
            }
        }
        if !rule.by_day.is_empty() && by_day(&rule.by_day, date, Period::Day).is_empty() {
            return false;
        }
        true
    }

    fn step_weekly(&mut self) {
        let week_start = self.rule.week_start;
        let start_offset = i64::from(week_start.day_number(self.start.weekday()) - 1);

        let mut offsets: Vec<i64> = if self.rule.by_day.is_empty() {
            vec![start_offset]
        } else {
            self.rule
                .by_day
                .iter()
                .map(|b| i64::from(week_start.day_number(b.weekday) - 1))
                .collect()
        };
        offsets.sort_unstable();
        offsets.dedup();

        let Some(mut week) = add_interval(&self.start, StepUnit::Day, -start_offset) else {
            return;
        };
        while week.date() <= self.end && !self.limit_reached() {
            for &offset in &offsets {
                if self.limit_reached() {
                    break;
                }
                if let Some(date) = add_days(week.date(), offset) {
                    self.push(date);
                }
            }
            match add_interval(&week, StepUnit::Week, self.interval()) {
                Some(next) => week = next,
                None => break,
            }
        }
    }

    fn step_monthly(&mut self) {
        let first = self.start.date().first_of_month();
        for k in 0.. {
            let Ok(month) = first.checked_add((k * self.interval()).months()) else {
                break;
            };
            if month > self.end || self.limit_reached() {
                break;
            }
            if self.rule.by_month.is_empty() || self.rule.by_month.contains(&month.month()) {
                let candidates = self.month_candidates(month);
                self.extend_period(candidates);
            }
        }
    }

    fn month_candidates(&self, month: Date) -> Vec<Date> {
        let rule = self.rule;
        let start = self.start.date();
        let days = (!rule.by_day.is_empty()).then(|| by_day(&rule.by_day, month, Period::Month));
        let month_days = (!rule.by_month_day.is_empty())
            .then(|| by_month_day(&rule.by_month_day, month, start));
        // Months lacking the start's day of month have no anchor.
        let anchor = Date::new(month.year(), month.month(), start.day()).ok();
        compose(days, month_days, anchor)
    }

    fn step_yearly(&mut self) {
        let start_year = i64::from(self.start.year());
        for k in 0.. {
            let Ok(year) = i16::try_from(start_year + k * self.interval()) else {
                break;
            };
            let Ok(jan1) = Date::new(year, 1, 1) else {
                break;
            };
            if jan1 > self.end || self.limit_reached() {
                break;
            }
            let candidates = self.year_candidates(year);
            self.extend_period(candidates);
        }
    }

    fn year_candidates(&self, year: i16) -> Vec<Date> {
        let rule = self.rule;
        let start = self.start.date();

        // BYMONTHDAY alone repeats in every month.
        let mut months: Vec<i8> = if !rule.by_month.is_empty() {
            rule.by_month.clone()
        } else if !rule.by_month_day.is_empty()
            && rule.by_year_day.is_empty()
            && rule.by_week_no.is_empty()
        {
            (1..=12).collect()
        } else {
            Vec::new()
        };
        months.sort_unstable();
        months.dedup();

        if !months.is_empty() {
            let mut dates = Vec::new();
            for month in months {
                let Ok(first) = Date::new(year, month, 1) else {
                    continue;
                };
                let days =
                    (!rule.by_day.is_empty()).then(|| by_day(&rule.by_day, first, Period::Month));
                let month_days = (!rule.by_month_day.is_empty())
                    .then(|| by_month_day(&rule.by_month_day, first, start));
                let anchor = Date::new(year, month, start.day()).ok();
                dates.extend(compose(days, month_days, anchor));
            }
            return dates;
        }

        if !rule.by_year_day.is_empty() {
            return by_year_day(&rule.by_year_day, year, start);
        }

        if !rule.by_week_no.is_empty() {
            let mut dates = by_week_no(&rule.by_week_no, year, rule.week_start);
            if rule.by_day.is_empty() {
                dates.retain(|d| d.weekday() == start.weekday());
            } else {
                dates.retain(|d| rule.by_day.iter().any(|b| b.weekday == d.weekday()));
            }
            return dates;
        }

        if !rule.by_day.is_empty() {
            if let Ok(jan1) = Date::new(year, 1, 1) {
                return by_day(&rule.by_day, jan1, Period::Year);
            }
            return Vec::new();
        }

        Date::new(year, start.month(), start.day())
            .ok()
            .into_iter()
            .collect()
    }

    /// Add the dates selected in one period, BYSETPOS picking last.
    fn extend_period(&mut self, mut candidates: Vec<Date>) {
        candidates.sort_unstable();
        candidates.dedup();
        if !self.rule.by_set_pos.is_empty() {
            candidates = by_set_pos(&candidates, &self.rule.by_set_pos);
        }
        for date in candidates {
            if self.limit_reached() {
                break;
            }
            self.push(date);
        }
    }
}

/// Expands entries in one time zone, memoizing results in a cache.
#[derive(Debug, Clone)]
pub struct RecurrenceExpander {
    tz: TimeZone,
    horizon: Horizon,
}

impl RecurrenceExpander {
    pub fn new(tz: TimeZone, horizon: Horizon) -> Self {
        RecurrenceExpander { tz, horizon }
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Expand without consulting any cache.
    pub fn expand(&self, entry: &Entry) -> Vec<Date> {
        expand(entry, &self.tz, self.horizon)
    }

    /// Expand, extending unbounded rules up to `through`.
    pub fn expand_through(&self, entry: &Entry, through: Date) -> Vec<Date> {
        expand(entry, &self.tz, self.horizon.through(through))
    }

    /// Expand through the cache. Cache failures are logged and never prevent
    /// the dates from being returned.
    #[tracing::instrument(skip_all, fields(id = %entry.id))]
    pub fn expand_cached<C: ExpansionCache + ?Sized>(
        &self,
        entry: &Entry,
        cache: &C,
        through: Option<Date>,
    ) -> Vec<Date> {
        let horizon = match through {
            Some(date) => self.horizon.through(date),
            None => self.horizon,
        };
        let cacheable = entry
            .rule
            .as_ref()
            .is_some_and(|rule| !horizon.extends(rule, entry.date));
        if !cacheable {
            return expand(entry, &self.tz, horizon);
        }

        match cache.read(entry.id) {
            Ok(Some(dates)) => {
                tracing::trace!(count = dates.len(), "expansion cache hit");
                return dates;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(err = %e, "failed to read expansion cache, recomputing"),
        }

        let dates = expand(entry, &self.tz, horizon);
        if let Err(e) = cache.write(entry.id, &dates) {
            tracing::warn!(err = %e, "failed to write expansion cache");
        }
        tracing::debug!(count = dates.len(), "expanded entry");
        dates
    }
}

/// Dates of a continuation fragment lying `offset_days` after each parent date.
pub fn shift_dates(parent: &[Date], offset_days: i64) -> Vec<Date> {
    parent
        .iter()
        .filter_map(|&d| add_days(d, offset_days))
        .collect()
}
