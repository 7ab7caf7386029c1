// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;

use crate::error::{Error, Result};
use crate::types::{NameOrder, WeekStart};

/// The name of the Almanac application.
pub const APP_NAME: &str = "almanac";

/// Resolution bounds of the busy matrix, in cells per day.
pub const ENTRY_SLOTS_RANGE: (u32, u32) = (72, 288);

/// Calendar login whose entries are visible to every user.
pub const PUBLIC_LOGIN: &str = "__public__";

/// Configuration for the scheduling engine.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA name or POSIX string of the calendar time zone; the system zone when unset.
    pub timezone: Option<String>,

    /// Lookahead, in months, applied to rules with neither count nor until.
    pub conflict_repeat_months: u32,

    /// Year of the sentinel horizon used for counted rules.
    pub count_horizon_year: i16,

    /// Whether the per-day appointment limit is enforced.
    pub limit_appts: bool,

    /// Maximum number of appointments per participant and day.
    pub limit_appts_number: u32,

    /// Disables splitting of events that cross midnight.
    pub disable_crossday_events: bool,

    /// Default week start for week numbering.
    pub week_start: WeekStart,

    /// Number of slots a day is divided into for grid display.
    pub time_slots: u32,

    /// Resolution of the busy matrix, in cells per day.
    pub entry_slots: u32,

    /// First hour shown by the busy matrix.
    pub work_day_start_hour: i8,

    /// Hour the busy matrix stops at.
    pub work_day_end_hour: i8,

    /// If true, names are compared case-insensitively when times tie.
    pub sort_case_insensitive: bool,

    /// Whether users may overlay other calendars as layers.
    pub allow_view_other: bool,

    /// Include the public calendar in every view.
    pub public_access_default_visible: bool,

    /// Single-user installation, every participant collapses to one login.
    pub single_user: bool,

    /// Login used in single-user installations.
    pub single_user_login: Option<String>,

    /// Directory for the expansion cache, caching is disabled when unset.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: None,
            conflict_repeat_months: 6,
            count_horizon_year: 2038,
            limit_appts: false,
            limit_appts_number: 6,
            disable_crossday_events: false,
            week_start: WeekStart::Monday,
            time_slots: 24,
            entry_slots: 144,
            work_day_start_hour: 8,
            work_day_end_hour: 17,
            sort_case_insensitive: false,
            allow_view_other: true,
            public_access_default_visible: false,
            single_user: false,
            single_user_login: None,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Normalize the configuration.
    pub fn normalize(&mut self) -> Result<()> {
        if let Some(dir) = &self.cache_dir {
            self.cache_dir = Some(expand_path(dir)?);
        }

        let (min, max) = ENTRY_SLOTS_RANGE;
        self.entry_slots = self.entry_slots.clamp(min, max);
        self.time_slots = self.time_slots.max(1);
        self.conflict_repeat_months = self.conflict_repeat_months.max(1);

        if !(0..=24).contains(&self.work_day_start_hour)
            || !(0..=24).contains(&self.work_day_end_hour)
            || self.work_day_start_hour >= self.work_day_end_hour
        {
            return Err(Error::Config(format!(
                "work day must satisfy 0 <= start < end <= 24, got {}..{}",
                self.work_day_start_hour, self.work_day_end_hour
            )));
        }

        if self.single_user && self.single_user_login.is_none() {
            return Err(Error::Config(
                "single_user requires single_user_login".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the configured time zone.
    pub fn time_zone(&self) -> Result<TimeZone> {
        match &self.timezone {
            Some(name) => TimeZone::get(name)
                .or_else(|_| TimeZone::posix(name))
                .map_err(|e| Error::Config(format!("unknown time zone '{name}': {e}"))),

            None => match iana_time_zone::get_timezone() {
                Ok(name) => TimeZone::get(&name).or_else(|e| {
                    tracing::warn!(
                        %name,
                        err = %e,
                        "system time zone not found, falling back to UTC"
                    );
                    Ok(TimeZone::UTC)
                }),
                Err(e) => {
                    tracing::warn!(
                        err = %e,
                        "failed to detect system time zone, falling back to UTC"
                    );
                    Ok(TimeZone::UTC)
                }
            },
        }
    }

    /// Name ordering used when merging entries.
    pub fn name_order(&self) -> NameOrder {
        if self.sort_case_insensitive {
            NameOrder::CaseInsensitive
        } else {
            NameOrder::CaseSensitive
        }
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path
        .to_str()
        .ok_or_else(|| Error::Config(format!("invalid path: {}", path.display())))?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::Config("user-specific home directory not found".into()))
}

fn get_state_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_local_dir();
    state_dir.ok_or_else(|| Error::Config("user-specific state directory not found".into()))
}
