//! Structured snapshot: a tagged copy of the raw rule mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::matrix::{is_storable_hostname, split_rule_key, Matrix, RuleCells};

/// Format tag carried by every snapshot this crate produces.
pub const MAGIC_ID: &str = "chmdgxwtetgu";

/// Versioned snapshot of a [`Matrix`].
///
/// `rules` maps each `"<src> <des>"` key to its cells packed two bits per
/// request type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSnapshot {
    /// Format tag, [`MAGIC_ID`] for the current format
    pub magic_id: String,
    /// Packed rules by key
    pub rules: BTreeMap<String, u32>,
}

impl MatrixSnapshot {
    /// Capture every rule in `matrix`.
    pub fn capture(matrix: &Matrix) -> Self {
        let rules = matrix
            .entries()
            .map(|(key, cells)| (key.clone(), cells.to_bits()))
            .collect();
        Self {
            magic_id: MAGIC_ID.to_string(),
            rules,
        }
    }

    /// Build a matrix from this snapshot.
    ///
    /// Fails on a foreign format tag. Entries that unpack to no cells, and
    /// keys that do not split into two hostnames, are skipped.
    pub fn to_matrix(&self) -> Result<Matrix> {
        if self.magic_id != MAGIC_ID {
            return Err(Error::InvalidMagic {
                expected: MAGIC_ID.to_string(),
                found: self.magic_id.clone(),
            });
        }

        let mut matrix = Matrix::new();
        for (key, &bits) in &self.rules {
            let valid = split_rule_key(key).is_some_and(|(src, des)| {
                is_storable_hostname(src) && is_storable_hostname(des)
            });
            if !valid {
                log::trace!("Skipping malformed snapshot key {:?}", key);
                continue;
            }
            matrix.insert_cells(key.clone(), RuleCells::from_bits(bits));
        }
        Ok(matrix)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Matrix {
    /// Snapshot the current rules.
    pub fn to_snapshot(&self) -> MatrixSnapshot {
        MatrixSnapshot::capture(self)
    }

    /// Replace every rule with the snapshot's.
    ///
    /// On error the matrix is left untouched.
    pub fn restore(&mut self, snapshot: &MatrixSnapshot) -> Result<()> {
        *self = snapshot.to_matrix()?;
        log::debug!("Restored {} rules from snapshot", self.len());
        Ok(())
    }
}
