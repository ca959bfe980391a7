//! Migration from the obsolete per-hostname filter encoding.
//!
//! The old format stored one packed value per source hostname:
//!
//! ```json
//! {"filters": {"example.com": 1, "news.org": 258}}
//! ```
//!
//! Four fields were used, each 2 bits wide: inline-script at bit 0,
//! 1p-script at bit 2, 3p-script at bit 4 and 3p-frame at bit 8. A field value
//! of 1 meant block and 2 meant "don't filter", which maps to `noop`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::hostname::WILDCARD;
use crate::matrix::is_storable_hostname;
use crate::{CellState, Matrix, RequestType};

/// Field layout of the obsolete encoding.
const LEGACY_FIELDS: [(RequestType, u32); 4] = [
    (RequestType::InlineScript, 0),
    (RequestType::FirstPartyScript, 2),
    (RequestType::ThirdPartyScript, 4),
    (RequestType::ThirdPartyFrame, 8),
];

#[derive(Debug, Deserialize)]
struct LegacySelfie {
    #[serde(default)]
    filters: BTreeMap<String, Value>,
}

/// Packed field value of one entry. Whole non-negative numbers are accepted,
/// floats are truncated; anything else has no usable bits.
fn legacy_bits(value: &Value) -> Option<u64> {
    if let Some(bits) = value.as_u64() {
        return Some(bits);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 => Some(f as u64),
        _ => None,
    }
}

impl Matrix {
    /// Merge rules from an obsolete JSON selfie.
    ///
    /// Each set field becomes a rule against the wildcard destination. Empty
    /// input migrates nothing. Entries with an unusable hostname or value are
    /// skipped one by one. Returns the number of cells written.
    pub fn migrate_legacy(&mut self, json: &str) -> Result<usize> {
        if json.trim().is_empty() {
            return Ok(0);
        }

        let selfie: LegacySelfie = serde_json::from_str(json)?;
        let mut written = 0;

        for (hostname, value) in &selfie.filters {
            if !is_storable_hostname(hostname) {
                log::trace!("Skipping legacy hostname {:?}", hostname);
                continue;
            }
            let Some(bits) = legacy_bits(value) else {
                log::trace!("Skipping legacy value {} for {}", value, hostname);
                continue;
            };
            for (ty, offset) in LEGACY_FIELDS {
                let state = match (bits >> offset) & 3 {
                    1 => CellState::Block,
                    2 => CellState::Noop,
                    _ => continue,
                };
                self.set_cell(hostname, WILDCARD, ty, state);
                written += 1;
            }
        }

        log::debug!(
            "Migrated {} legacy cells from {} hostnames",
            written,
            selfie.filters.len()
        );
        Ok(written)
    }
}
