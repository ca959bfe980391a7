//! Snapshot codecs: rule text, structured snapshot and legacy migration.

mod legacy;
mod selfie;
mod text;

pub use selfie::{MatrixSnapshot, MAGIC_ID};
pub use text::{ParseStats, TextCodec};
