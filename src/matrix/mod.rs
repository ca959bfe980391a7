//! The rule matrix: exact-key storage of (source, destination) rules.

mod cells;
mod evaluator;

pub use cells::RuleCells;
pub use evaluator::Resolution;

use ahash::AHashMap;

use crate::{CellState, RequestType};

/// Separator between the two hostnames of a rule key.
pub const KEY_SEPARATOR: char = ' ';

/// Build the storage key for a (source, destination) pair.
pub fn rule_key(src: &str, des: &str) -> String {
    let mut key = String::with_capacity(src.len() + des.len() + 1);
    write_key(&mut key, src, des);
    key
}

/// Split a storage key back into (source, destination).
///
/// Splits on the first separator; hostnames never contain it.
pub fn split_rule_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_SEPARATOR)
}

/// Check that `hostname` can be stored as one half of a rule key.
///
/// Empty names and names containing [`KEY_SEPARATOR`] would not split back
/// into the same pair.
pub fn is_storable_hostname(hostname: &str) -> bool {
    !hostname.is_empty() && !hostname.contains(KEY_SEPARATOR)
}

fn write_key(buf: &mut String, src: &str, des: &str) {
    buf.clear();
    buf.push_str(src);
    buf.push(KEY_SEPARATOR);
    buf.push_str(des);
}

/// Matrix holds every rule, keyed by (source, destination) hostname pair.
///
/// Reads here are exact: no generalization happens in this module. See
/// [`Matrix::resolve`] for the cascading lookup.
///
/// # Examples
/// ```
/// use hostmatrix::{CellState, Matrix, RequestType};
///
/// let mut matrix = Matrix::new();
/// assert!(matrix.set_cell("example.com", "*", RequestType::Image, CellState::Block));
/// assert_eq!(matrix.get_cell("example.com", "*", RequestType::Image), CellState::Block);
/// assert_eq!(matrix.get_cell("www.example.com", "*", RequestType::Image), CellState::Unset);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    /// Rules by key; a stored value is never all-unset
    rules: AHashMap<String, RuleCells>,
}

impl Matrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every rule.
    pub fn reset(&mut self) {
        self.rules.clear();
    }

    /// Number of stored (source, destination) keys.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the matrix holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Install `state` for `ty` at the exact (src, des) key.
    ///
    /// Returns `true` if the stored value changed. A key whose cells all
    /// become unset is removed. Hostnames rejected by
    /// [`is_storable_hostname`] are ignored.
    pub fn set_cell(&mut self, src: &str, des: &str, ty: RequestType, state: CellState) -> bool {
        if !is_storable_hostname(src) || !is_storable_hostname(des) {
            log::trace!("Ignoring unstorable rule key {:?} {:?}", src, des);
            return false;
        }

        let key = rule_key(src, des);
        let old = self.rules.get(&key).copied().unwrap_or_default();
        let mut new = old;
        new.set(ty, state);

        if new == old {
            return false;
        }
        if new.is_empty() {
            self.rules.remove(&key);
        } else {
            self.rules.insert(key, new);
        }
        true
    }

    /// Exact read of one cell; unset when the key is absent.
    pub fn get_cell(&self, src: &str, des: &str, ty: RequestType) -> CellState {
        self.cells(src, des)
            .map(|cells| cells.get(ty))
            .unwrap_or_default()
    }

    /// All cells stored at the exact (src, des) key.
    pub fn cells(&self, src: &str, des: &str) -> Option<&RuleCells> {
        self.rules.get(rule_key(src, des).as_str())
    }

    /// Iterate over (source, destination, cells) in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &RuleCells)> + '_ {
        self.rules.iter().filter_map(|(key, cells)| {
            let (src, des) = split_rule_key(key)?;
            Some((src, des, cells))
        })
    }

    /// Exact read reusing a caller-owned key buffer.
    fn probe(&self, buf: &mut String, src: &str, des: &str, ty: RequestType) -> CellState {
        write_key(buf, src, des);
        self.rules
            .get(buf.as_str())
            .map(|cells| cells.get(ty))
            .unwrap_or_default()
    }

    /// Install a whole rule, skipping empty ones.
    pub(crate) fn insert_cells(&mut self, key: String, cells: RuleCells) {
        if !cells.is_empty() {
            self.rules.insert(key, cells);
        }
    }

    /// Raw (key, cells) pairs.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &RuleCells)> + '_ {
        self.rules.iter()
    }
}
