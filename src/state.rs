//! Cell state: the value a rule holds for one request type.

use std::fmt;

/// CellState is what a single (source, destination, type) cell says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CellState {
    /// No rule here; keep generalizing
    #[default]
    Unset = 0,
    /// Block the request
    Block = 1,
    /// Allow the request
    Allow = 2,
    /// Stop generalizing without a verdict
    Noop = 3,
}

impl CellState {
    /// Convert from a 2-bit value.
    ///
    /// Returns `None` for values above 3.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CellState::Unset),
            1 => Some(CellState::Block),
            2 => Some(CellState::Allow),
            3 => Some(CellState::Noop),
            _ => None,
        }
    }

    /// Convert to a u8 value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a state from its rule-file name.
    ///
    /// `unset` is not a name: a rule line always asserts something.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "block" => Some(CellState::Block),
            "allow" => Some(CellState::Allow),
            "noop" => Some(CellState::Noop),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellState::Unset => "unset",
            CellState::Block => "block",
            CellState::Allow => "allow",
            CellState::Noop => "noop",
        }
    }

    /// Whether this state stops the generalization walk.
    pub fn is_set(self) -> bool {
        self != CellState::Unset
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CellState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidState(s.to_string()))
    }
}
