// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use crate::config::{Config, PUBLIC_LOGIN};
use crate::error::Result;
use crate::store::{Category, Directory, Layer};
use crate::types::CategoryId;

/// Everything one request knows about the user viewing the calendar.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Login of the viewing user.
    pub viewer: String,

    /// Calendars overlaid on the viewer's own.
    pub layers: Vec<Layer>,

    pub categories: Vec<Category>,

    pub config: Config,
}

impl RequestContext {
    /// Load the layers and categories of `viewer`.
    ///
    /// Single-user installations always view the configured login, and no
    /// layers are loaded when viewing other calendars is disallowed.
    pub fn load<D: Directory + ?Sized>(
        directory: &D,
        viewer: &str,
        config: &Config,
    ) -> Result<Self> {
        let viewer = match &config.single_user_login {
            Some(login) if config.single_user => login.clone(),
            _ => viewer.to_string(),
        };
        let layers = if config.allow_view_other && !config.single_user {
            directory.layers(&viewer)?
        } else {
            Vec::new()
        };
        let categories = directory.categories(&viewer)?;
        tracing::debug!(
            %viewer,
            layers = layers.len(),
            categories = categories.len(),
            "loaded request context"
        );

        Ok(RequestContext {
            viewer,
            layers,
            categories,
            config: config.clone(),
        })
    }

    /// Logins whose entries appear in the viewer's calendar.
    pub fn visible_logins(&self) -> Vec<String> {
        let mut logins = vec![self.viewer.clone()];
        for layer in &self.layers {
            if !logins.contains(&layer.login) {
                logins.push(layer.login.clone());
            }
        }
        if self.config.public_access_default_visible && !logins.iter().any(|l| l == PUBLIC_LOGIN) {
            logins.push(PUBLIC_LOGIN.to_string());
        }
        logins
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn layer(&self, login: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.login == login)
    }
}
