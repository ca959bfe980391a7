//! Lock-protected matrix for use across request-handling workers.

use parking_lot::RwLock;

use crate::error::Result;
use crate::hostname::HostnameConverter;
use crate::matrix::{Matrix, Resolution};
use crate::snapshot::{MatrixSnapshot, ParseStats, TextCodec};
use crate::{CellState, RequestType};

/// A [`Matrix`] behind a single reader/writer lock.
///
/// Lookups share the read lock; every mutation, restore and reload takes the
/// write lock, so a reader never sees a half-applied change.
///
/// # Examples
/// ```
/// use hostmatrix::{CellState, RequestType, SharedMatrix};
///
/// let shared = SharedMatrix::new();
/// shared.block("a.com", "*", RequestType::InlineScript);
/// assert_eq!(
///     shared.resolve("www.a.com", "b.com", RequestType::InlineScript).state,
///     CellState::Block
/// );
/// ```
#[derive(Debug, Default)]
pub struct SharedMatrix {
    inner: RwLock<Matrix>,
}

impl SharedMatrix {
    /// Create an empty shared matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: Matrix) -> Self {
        Self {
            inner: RwLock::new(matrix),
        }
    }

    /// Resolve a request under the read lock.
    pub fn resolve<'a>(&self, src: &'a str, des: &'a str, ty: RequestType) -> Resolution<'a> {
        self.inner.read().resolve(src, des, ty)
    }

    /// Resolve with a type name under the read lock.
    pub fn resolve_named<'a>(&self, src: &'a str, des: &'a str, type_name: &str) -> Resolution<'a> {
        self.inner.read().resolve_named(src, des, type_name)
    }

    /// Run `f` against the matrix under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&Matrix) -> R) -> R {
        f(&self.inner.read())
    }

    /// See [`Matrix::set_cell`].
    pub fn set_cell(&self, src: &str, des: &str, ty: RequestType, state: CellState) -> bool {
        self.inner.write().set_cell(src, des, ty, state)
    }

    /// See [`Matrix::clear_cell`].
    pub fn clear_cell(&self, src: &str, des: &str, ty: RequestType) -> bool {
        self.inner.write().clear_cell(src, des, ty)
    }

    /// See [`Matrix::block_cell`].
    pub fn block(&self, src: &str, des: &str, ty: RequestType) -> bool {
        self.inner.write().block_cell(src, des, ty)
    }

    /// See [`Matrix::allow_cell`].
    pub fn allow(&self, src: &str, des: &str, ty: RequestType) -> bool {
        self.inner.write().allow_cell(src, des, ty)
    }

    /// Drop every rule.
    pub fn reset(&self) {
        self.inner.write().reset();
    }

    /// Swap in a new matrix, returning the old one.
    pub fn replace(&self, matrix: Matrix) -> Matrix {
        let old = std::mem::replace(&mut *self.inner.write(), matrix);
        log::debug!("Replaced matrix: {} rules -> {} rules", old.len(), self.len());
        old
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if no rules are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Clone of the current matrix.
    pub fn to_matrix(&self) -> Matrix {
        self.inner.read().clone()
    }

    /// Consistent snapshot of the current rules.
    pub fn snapshot(&self) -> MatrixSnapshot {
        self.inner.read().to_snapshot()
    }

    /// Replace the rules with the snapshot's. Untouched on error.
    pub fn restore(&self, snapshot: &MatrixSnapshot) -> Result<()> {
        let matrix = snapshot.to_matrix()?;
        self.replace(matrix);
        Ok(())
    }

    /// Render the rules as text.
    pub fn to_text<C: HostnameConverter>(&self, codec: &TextCodec<C>) -> String {
        codec.render(&self.inner.read())
    }

    /// Load rule text.
    ///
    /// With `replace`, the text is parsed into a fresh matrix outside the
    /// lock and swapped in; otherwise rules are merged under the write lock.
    pub fn load_text<C: HostnameConverter>(
        &self,
        codec: &TextCodec<C>,
        text: &str,
        replace: bool,
    ) -> ParseStats {
        if replace {
            let mut matrix = Matrix::new();
            let stats = codec.parse_into(&mut matrix, text);
            self.replace(matrix);
            stats
        } else {
            codec.parse_into(&mut self.inner.write(), text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_toggles() {
        let shared = SharedMatrix::new();
        assert!(shared.block("a.com", "b.com", RequestType::Image));
        assert!(shared.resolve("a.com", "b.com", RequestType::Image).must_block());
        assert!(shared.allow("a.com", "b.com", RequestType::Image));
        assert_eq!(
            shared.resolve_named("a.com", "b.com", "image").state,
            CellState::Allow
        );
        assert!(shared.clear_cell("a.com", "b.com", RequestType::Image));
        assert!(shared.is_empty());
    }

    #[test]
    fn test_load_text_replace_and_merge() {
        let shared = SharedMatrix::new();
        let codec = TextCodec::new();

        shared.load_text(&codec, "a.com * image block", false);
        shared.load_text(&codec, "b.com * image block", false);
        assert_eq!(shared.len(), 2);

        let stats = shared.load_text(&codec, "c.com * image block", true);
        assert_eq!(stats.applied, 1);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.to_text(&codec), "c.com * image block");
    }

    #[test]
    fn test_snapshot_restore() {
        let shared = SharedMatrix::new();
        shared.set_cell("a.com", "*", RequestType::Any, CellState::Noop);
        let snapshot = shared.snapshot();

        shared.reset();
        assert!(shared.is_empty());

        shared.restore(&snapshot).unwrap();
        assert!(shared.resolve("a.com", "x.org", RequestType::Any).must_abort());
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let shared = Arc::new(SharedMatrix::new());
        shared.set_cell("*", "*", RequestType::Image, CellState::Allow);

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..200 {
                    let host = format!("h{}.example.com", i);
                    shared.block(&host, "*", RequestType::Image);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let r = shared.resolve("other.net", "cdn.net", RequestType::Image);
                        assert_eq!(r.state, CellState::Allow);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.len(), 201);
    }
}
