// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fs, path::Path, str::FromStr};

use almanac_core::{Category, CategoryId, EntryId, EntryRow, Layer, MemoryStore, Permission};
use jiff::civil::Date;

/// Calendar data read from a TOML file: entry rows and the user directory.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DataFile {
    /// Permission on calendars without an explicit grant.
    pub default_permission: Vec<GrantAction>,

    /// Entry rows, one per participant.
    pub entries: Vec<EntryRow>,

    pub exceptions: Vec<ExceptionRow>,
    pub layers: Vec<LayerRow>,
    pub categories: Vec<CategoryRow>,
    pub assistants: Vec<AssistantRow>,
    pub nonuser_admins: Vec<NonuserAdminRow>,
    pub grants: Vec<GrantRow>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ExceptionRow {
    pub id: i64,
    pub date: Date,

    /// `false` adds an extra date instead of removing one.
    #[serde(default = "default_true")]
    pub exclude: bool,
}

#[derive(Debug, serde::Deserialize)]
pub struct LayerRow {
    /// Login seeing the layer.
    pub owner: String,
    /// Login of the overlaid calendar.
    pub login: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub allow_duplicates: bool,
}

#[derive(Debug, serde::Deserialize)]
pub struct CategoryRow {
    pub owner: String,
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AssistantRow {
    pub assistant: String,
    pub boss: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct NonuserAdminRow {
    pub admin: String,
    pub nonuser: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct GrantRow {
    pub owner: String,
    pub viewer: String,
    pub actions: Vec<GrantAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantAction {
    View,
    Edit,
    Approve,
    All,
}

fn default_true() -> bool {
    true
}

fn permission(actions: &[GrantAction]) -> Permission {
    let bits = actions.iter().fold(0, |acc, action| {
        acc | match action {
            GrantAction::View => Permission::VIEW.0,
            GrantAction::Edit => Permission::EDIT.0,
            GrantAction::Approve => Permission::APPROVE.0,
            GrantAction::All => Permission::ALL.0,
        }
    });
    Permission(bits)
}

impl DataFile {
    /// Read a data file.
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        fs::read_to_string(path)
            .map_err(|e| format!("Failed to read data file at {}: {}", path.display(), e))?
            .parse()
    }

    /// Build the in-memory store, decoding every row.
    pub fn into_store(self) -> almanac_core::Result<MemoryStore> {
        let mut store = MemoryStore::new();
        if !self.default_permission.is_empty() {
            store.set_default_permission(permission(&self.default_permission));
        }

        let count = self.entries.len();
        for row in self.entries {
            store.insert_row(row)?;
        }
        for ex in self.exceptions {
            store.add_exception(EntryId(ex.id), ex.date, ex.exclude);
        }
        for layer in self.layers {
            store.add_layer(
                &layer.owner,
                Layer {
                    login: layer.login,
                    color: layer.color,
                    allow_duplicates: layer.allow_duplicates,
                },
            );
        }
        for cat in self.categories {
            store.add_category(
                &cat.owner,
                Category {
                    id: cat.id,
                    name: cat.name,
                    color: cat.color,
                },
            );
        }
        for row in self.assistants {
            store.add_assistant(&row.assistant, &row.boss);
        }
        for row in self.nonuser_admins {
            store.add_nonuser_admin(&row.admin, &row.nonuser);
        }
        for grant in self.grants {
            store.grant(&grant.owner, &grant.viewer, permission(&grant.actions));
        }

        tracing::debug!(rows = count, "loaded calendar data");
        Ok(store)
    }
}

impl FromStr for DataFile {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
