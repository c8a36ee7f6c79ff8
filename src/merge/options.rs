//! Merge configuration.

use super::session::Choice;
use crate::conflict::ConflictRule;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strategy resolves every conflict the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    PreferLeft,
    PreferRight,
    Skip,
}

impl Strategy {
    /// Returns the choice this strategy makes for each conflict.
    pub fn choice(self) -> Choice {
        match self {
            Strategy::PreferLeft => Choice::TakeA,
            Strategy::PreferRight => Choice::TakeB,
            Strategy::Skip => Choice::Skip,
        }
    }
}

/// MergeOptions configures a merge session.
///
/// ```yaml
/// rule: overlap        # or exact-path
/// strategy: prefer-left
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    /// How colliding edits are recognized.
    pub rule: ConflictRule,
    /// Applied to every conflict by [`MergeSession::auto_resolve`](super::MergeSession::auto_resolve).
    pub strategy: Option<Strategy>,
}

impl MergeOptions {
    /// Parses options from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(e.to_string()))
    }

    /// Parses options from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))
    }

    /// Reads options from a file, as JSON when it has a `.json` extension and as YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => MergeOptions::from_json(&text),
            _ => MergeOptions::from_yaml(&text),
        }
    }

    pub fn with_rule(mut self, rule: ConflictRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}
