//! hostmatrix - A per-request hostname rule matrix.
//!
//! Given where a request comes from, where it goes and what kind of request
//! it is, the matrix answers *block*, *allow*, *noop* (stop looking, no
//! verdict) or nothing at all, in which case the caller applies its own
//! default policy.
//!
//! # Features
//!
//! - **Hierarchical hostnames**: a rule on `example.com` covers
//!   `www.example.com` unless something more specific says otherwise
//! - **Source × destination × type**: independent cells per request type for
//!   every (source, destination) pair
//! - **Explainable**: every lookup reports the exact rule it came from
//! - **Toggles**: block/allow that account for inherited rules and never
//!   leave redundant overrides behind
//! - **Snapshots**: editable rule text, a tagged structured snapshot, and
//!   migration from the obsolete per-hostname format
//! - **Thread-safe sharing** via [`SharedMatrix`]
//!
//! # Quick Start
//!
//! ```
//! use hostmatrix::{CellState, Matrix, RequestType};
//!
//! let mut matrix = Matrix::new();
//! matrix.set_cell("example.com", "*", RequestType::Image, CellState::Allow);
//!
//! let r = matrix.resolve("sub.example.com", "ad.example.com", RequestType::Image);
//! assert_eq!(r.state, CellState::Allow);
//! assert_eq!(r.explain(), "da:example.com * image allow");
//! ```
//!
//! # Matching Priority
//!
//! 1. Most specific destination first (`ad.example.com`, `example.com`,
//!    `com`), never the wildcard in this pass
//! 2. Within one destination, most specific source first, down to `*`
//! 3. The wildcard destination, again walking every source
//!
//! The first cell that is not unset wins, `noop` included.

mod error;
mod request_type;
mod shared;
mod state;

pub mod config;
pub mod hostname;
pub mod matrix;
pub mod snapshot;

// Re-export core types
pub use error::{Error, Result};
pub use request_type::RequestType;
pub use state::CellState;

pub use matrix::{Matrix, Resolution, RuleCells};
pub use shared::SharedMatrix;

pub use config::{DefaultPolicy, EngineConfig};
pub use hostname::{HostnameConverter, Passthrough};
pub use snapshot::{MatrixSnapshot, ParseStats, TextCodec};
