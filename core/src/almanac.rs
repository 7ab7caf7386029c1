// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::cache::ExpansionCache;
use crate::config::Config;
use crate::conflict::{self, Conflict, ConflictRequest};
use crate::context::RequestContext;
use crate::entry::{Entry, Occurrence};
use crate::error::Result;
use crate::expand::{Horizon, RecurrenceExpander};
use crate::matrix::{self, BusyMatrix};
use crate::merge::{self, ExpandedEntry, MergeOptions, apply_layer_policy};
use crate::rrule::ExceptionSet;
use crate::split;
use crate::store::{Action, CategoryFilter, Directory, EntryClass, EntryQuery, EntryStore, Layer};
use crate::types::EntryId;

/// Almanac scheduling engine.
#[derive(Debug, Clone)]
pub struct Almanac<S, C> {
    config: Config,
    expander: RecurrenceExpander,
    store: S,
    cache: C,
}

/// Entries of a date range as seen by one viewer.
#[derive(Debug, Clone)]
pub struct View {
    pub from: Date,
    pub to: Date,

    /// Single occurrences, already split at midnight.
    pub non_repeating: Vec<Occurrence>,

    pub repeating: Vec<ExpandedEntry>,

    /// Open tasks due by the end of the range.
    pub tasks: Vec<Arc<Entry>>,
}

impl View {
    /// Everything shown on `date`.
    pub fn day(&self, date: Date, today: Date, options: MergeOptions) -> Vec<Occurrence> {
        merge::merge_for_day(
            date,
            today,
            &self.non_repeating,
            &self.repeating,
            &self.tasks,
            options,
        )
    }
}

impl<S: EntryStore + Directory, C: ExpansionCache> Almanac<S, C> {
    /// Creates a new engine with the given configuration, store and cache.
    pub fn new(mut config: Config, store: S, cache: C) -> Result<Self> {
        config.normalize()?;
        let tz = config.time_zone()?;
        tracing::debug!(tz = tz.iana_name().unwrap_or("custom"), "time zone resolved");

        let expander = RecurrenceExpander::new(tz, Horizon::from_config(&config));
        Ok(Almanac {
            config,
            expander,
            store,
            cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn time_zone(&self) -> &TimeZone {
        self.expander.time_zone()
    }

    /// Build the request context of `viewer`.
    pub fn context(&self, viewer: &str) -> Result<RequestContext> {
        RequestContext::load(&self.store, viewer, &self.config)
    }

    /// Dates a repeating entry occurs on, through the expansion cache.
    pub fn expand(&self, entry: &Entry) -> Vec<Date> {
        self.expander.expand_cached(entry, &self.cache, None)
    }

    /// Dates a repeating entry occurs on, unbounded rules covering at least `through`.
    pub fn expand_through(&self, entry: &Entry, through: Date) -> Vec<Date> {
        self.expander.expand_cached(entry, &self.cache, Some(through))
    }

    /// Drop the cached expansion of an entry whose rule or exceptions changed.
    pub fn invalidate(&self, id: EntryId) -> Result<()> {
        self.cache.evict(id)
    }

    /// Split an occurrence at midnight, unless cross-day splitting is disabled.
    pub fn split_midnight_crossing(&self, occurrence: Occurrence) -> Vec<Occurrence> {
        split::split_midnight_crossing(
            occurrence,
            self.time_zone(),
            !self.config.disable_crossday_events,
        )
    }

    /// Merge options following the configuration.
    pub fn merge_options(&self, include_unapproved: bool) -> MergeOptions {
        MergeOptions {
            include_unapproved,
            order: self.config.name_order(),
        }
    }

    /// Load everything `ctx.viewer` sees between `from` and `to`, inclusive.
    #[tracing::instrument(skip(self, ctx), fields(viewer = %ctx.viewer))]
    pub fn load_view(
        &self,
        ctx: &RequestContext,
        from: Date,
        to: Date,
        category: CategoryFilter,
    ) -> Result<View> {
        let logins = ctx.visible_logins();
        let viewer = Some(ctx.viewer.as_str());
        let (non_repeating, repeating) =
            self.collect(&logins, from, to, category, viewer, &ctx.layers)?;

        let query = EntryQuery {
            logins,
            range: Some((from, to)),
            category,
            repeating: false,
            class: EntryClass::Tasks,
        };
        let tasks = self.fetch_visible(&query, viewer, &ctx.layers)?;

        tracing::debug!(
            non_repeating = non_repeating.len(),
            repeating = repeating.len(),
            tasks = tasks.len(),
            "loaded view"
        );
        Ok(View {
            from,
            to,
            non_repeating,
            repeating,
            tasks: tasks.into_iter().map(Arc::new).collect(),
        })
    }

    /// Everything shown on `date` of a loaded view.
    pub fn merge_for_day(
        &self,
        view: &View,
        date: Date,
        today: Date,
        include_unapproved: bool,
    ) -> Vec<Occurrence> {
        view.day(date, today, self.merge_options(include_unapproved))
    }

    /// Existing entries in the way of a proposed one.
    #[tracing::instrument(skip(self, request), fields(requester = %request.requester))]
    pub fn check_conflicts(&self, request: &ConflictRequest) -> Result<Vec<Conflict>> {
        conflict::check_conflicts(
            &self.store,
            &self.expander,
            &self.cache,
            &self.config,
            request,
        )
    }

    /// Free/busy matrix of `participants` on `date`.
    #[tracing::instrument(skip(self, participants))]
    pub fn busy_matrix(&self, date: Date, participants: &[String]) -> Result<BusyMatrix> {
        let (mut occurrences, repeating) =
            self.collect(participants, date, date, CategoryFilter::Any, None, &[])?;
        occurrences.extend(merge::repeating_for_day(date, &repeating));
        Ok(matrix::busy_matrix(
            date,
            participants,
            &occurrences,
            &self.config,
        ))
    }

    /// Split single occurrences and expanded repeating entries of `logins`.
    fn collect(
        &self,
        logins: &[String],
        from: Date,
        to: Date,
        category: CategoryFilter,
        viewer: Option<&str>,
        layers: &[Layer],
    ) -> Result<(Vec<Occurrence>, Vec<ExpandedEntry>)> {
        let split = !self.config.disable_crossday_events;
        let tz = self.time_zone();

        // Entries starting earlier are returned when they run into the range.
        let query = EntryQuery {
            logins: logins.to_vec(),
            range: Some((from, to)),
            category,
            repeating: false,
            class: EntryClass::Events,
        };
        let non_repeating = self
            .fetch_visible(&query, viewer, layers)?
            .into_iter()
            .flat_map(|e| split::split_midnight_crossing(Occurrence::of(Arc::new(e)), tz, split))
            .filter(|o| (from..=to).contains(&o.date))
            .collect();

        let query = EntryQuery {
            repeating: true,
            ..query
        };
        let mut repeating = Vec::new();
        for mut entry in self.fetch_visible(&query, viewer, layers)? {
            entry.exceptions = ExceptionSet::from_rows(self.store.fetch_exceptions(entry.id)?);
            let dates = self.expand_through(&entry, to);
            repeating.push(ExpandedEntry::new(Arc::new(entry), dates, tz, split));
        }
        Ok((non_repeating, repeating))
    }

    /// Fetch entries, dropping those `viewer` may not see and resolving
    /// duplicates across layers.
    fn fetch_visible(
        &self,
        query: &EntryQuery,
        viewer: Option<&str>,
        layers: &[Layer],
    ) -> Result<Vec<Entry>> {
        let rows = self.store.fetch_entries(query)?;
        let Some(viewer) = viewer else {
            return Ok(rows);
        };
        let permitted: Vec<Entry> = rows
            .into_iter()
            .filter(|e| {
                !self
                    .store
                    .access_check(Action::View, &e.login, viewer, e.kind, e.access)
                    .is_none()
            })
            .collect();
        Ok(apply_layer_policy(permitted, viewer, layers))
    }
}
