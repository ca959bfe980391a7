//! Engine configuration loaded from YAML.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::hostname::HostnameConverter;
use crate::snapshot::TextCodec;
use crate::{CellState, Matrix};

/// What the caller does when the matrix has no verdict.
///
/// The matrix itself never applies this; it is here for callers (and the
/// CLI) that need one place to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPolicy {
    /// Let unresolved requests through
    #[default]
    Allow,
    /// Block unresolved requests
    Block,
}

impl DefaultPolicy {
    /// Final decision for a resolved state: explicit block/allow stand,
    /// unset and noop fall back to this policy.
    pub fn decide(self, state: CellState) -> CellState {
        match state {
            CellState::Block | CellState::Allow => state,
            CellState::Unset | CellState::Noop => self.into(),
        }
    }
}

impl From<DefaultPolicy> for CellState {
    fn from(policy: DefaultPolicy) -> Self {
        match policy {
            DefaultPolicy::Allow => CellState::Allow,
            DefaultPolicy::Block => CellState::Block,
        }
    }
}

/// Engine configuration.
///
/// ```yaml
/// name: workstation
/// default_policy: block
/// rules_files:
///   - rules.txt
/// rules:
///   - "* * 3p-frame block"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Name shown in logs
    #[serde(default = "default_name")]
    pub name: String,
    /// Caller-side fallback for unresolved requests
    #[serde(default)]
    pub default_policy: DefaultPolicy,
    /// Rule text files, loaded in order
    #[serde(default)]
    pub rules_files: Vec<PathBuf>,
    /// Inline rule lines, loaded after the files
    #[serde(default)]
    pub rules: Vec<String>,
}

fn default_name() -> String {
    "default".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_policy: DefaultPolicy::default(),
            rules_files: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config file. Relative rule file paths are resolved against the
    /// config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent() {
            for file in &mut config.rules_files {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(config)
    }

    /// Build a matrix from every rule file followed by the inline rules.
    pub fn build_matrix<C: HostnameConverter>(&self, codec: &TextCodec<C>) -> Result<Matrix> {
        let mut matrix = Matrix::new();

        for file in &self.rules_files {
            let text = fs::read_to_string(file).map_err(|e| {
                Error::Config(format!("cannot read rules file {}: {}", file.display(), e))
            })?;
            let stats = codec.parse_into(&mut matrix, &text);
            log::debug!(
                "[{}] loaded {}: {} rules, {} skipped",
                self.name,
                file.display(),
                stats.applied,
                stats.skipped
            );
        }

        if !self.rules.is_empty() {
            codec.parse_into(&mut matrix, &self.rules.join("\n"));
        }

        log::info!("[{}] matrix ready with {} keys", self.name, matrix.len());
        Ok(matrix)
    }
}
