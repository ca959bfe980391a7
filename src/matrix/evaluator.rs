//! Cascading lookup and toggle operations.

use std::fmt;

use super::Matrix;
use crate::hostname::{broaden, chain, WILDCARD};
use crate::{CellState, RequestType};

/// Outcome of [`Matrix::resolve`]: the verdict plus the exact cell it came
/// from.
///
/// `src` and `des` borrow from the hostnames passed to `resolve` (or are
/// the wildcard token), so building a resolution never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Resolved state; `Unset` means defer to the default policy
    pub state: CellState,
    /// Category evaluated, `None` when the type name was not recognized
    pub request_type: Option<RequestType>,
    /// Source hostname of the matching rule
    pub src: &'a str,
    /// Destination hostname of the matching rule
    pub des: &'a str,
}

impl<'a> Resolution<'a> {
    fn unresolved(request_type: Option<RequestType>, src: &'a str, des: &'a str) -> Self {
        Self {
            state: CellState::Unset,
            request_type,
            src,
            des,
        }
    }

    /// True for an explicit block or allow.
    pub fn must_block_or_allow(&self) -> bool {
        matches!(self.state, CellState::Block | CellState::Allow)
    }

    /// True for `noop`: the caller should stop looking here without a verdict.
    pub fn must_abort(&self) -> bool {
        self.state == CellState::Noop
    }

    /// True for an explicit block.
    pub fn must_block(&self) -> bool {
        self.state == CellState::Block
    }

    /// One-line description of the matching rule, e.g.
    /// `db:example.com * image block`. Empty when nothing matched.
    pub fn explain(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Resolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ty) = self.request_type else {
            return Ok(());
        };
        let prefix = match self.state {
            CellState::Unset => return Ok(()),
            CellState::Block => "db",
            CellState::Allow => "da",
            CellState::Noop => "dn",
        };
        write!(f, "{}:{} {} {} {}", prefix, self.src, self.des, ty, self.state)
    }
}

impl Matrix {
    /// Resolve the most specific rule for a request.
    ///
    /// Destinations are tried from `des` outwards, stopping short of the
    /// wildcard; for each destination every source generalization (ending in
    /// `*`) is tried before moving on. The wildcard destination is probed
    /// last. The first non-unset cell wins, `noop` included.
    ///
    /// # Examples
    /// ```
    /// use hostmatrix::{CellState, Matrix, RequestType};
    ///
    /// let mut matrix = Matrix::new();
    /// matrix.set_cell("example.com", "*", RequestType::Image, CellState::Allow);
    ///
    /// let r = matrix.resolve("sub.example.com", "ad.example.com", RequestType::Image);
    /// assert_eq!(r.state, CellState::Allow);
    /// assert_eq!((r.src, r.des), ("example.com", "*"));
    /// ```
    pub fn resolve<'a>(&self, src: &'a str, des: &'a str, ty: RequestType) -> Resolution<'a> {
        let mut buf = String::with_capacity(src.len() + des.len() + 2);

        let mut d = des;
        while d != WILDCARD {
            if let Some((state, s)) = self.probe_row(&mut buf, src, d, ty) {
                return Resolution {
                    state,
                    request_type: Some(ty),
                    src: s,
                    des: d,
                };
            }
            d = broaden(d);
        }

        match self.probe_row(&mut buf, src, WILDCARD, ty) {
            Some((state, s)) => Resolution {
                state,
                request_type: Some(ty),
                src: s,
                des: WILDCARD,
            },
            None => Resolution::unresolved(Some(ty), WILDCARD, WILDCARD),
        }
    }

    /// Like [`Matrix::resolve`], taking the type by name. Unknown names never
    /// match anything.
    pub fn resolve_named<'a>(&self, src: &'a str, des: &'a str, type_name: &str) -> Resolution<'a> {
        match RequestType::parse(type_name) {
            Some(ty) => self.resolve(src, des, ty),
            None => Resolution::unresolved(None, src, des),
        }
    }

    /// Shorthand for `resolve(..).must_block()`.
    pub fn must_block(&self, src: &str, des: &str, ty: RequestType) -> bool {
        self.resolve(src, des, ty).must_block()
    }

    /// Walk the source chain against a fixed destination.
    fn probe_row<'a>(
        &self,
        buf: &mut String,
        src: &'a str,
        des: &str,
        ty: RequestType,
    ) -> Option<(CellState, &'a str)> {
        chain(src).find_map(|s| {
            let state = self.probe(buf, s, des, ty);
            state.is_set().then_some((state, s))
        })
    }

    /// Remove the exact cell at (src, des, ty).
    ///
    /// Returns `true` if a rule was removed.
    pub fn clear_cell(&mut self, src: &str, des: &str, ty: RequestType) -> bool {
        self.set_cell(src, des, ty, CellState::Unset)
    }

    /// Make (src, des, ty) resolve to `desired` with the fewest exact rules.
    ///
    /// The exact cell is cleared first; it is only reinstalled when what is
    /// inherited from broader rules differs from `desired`. Returns `true`
    /// if the exact cell changed.
    pub fn toggle_cell(&mut self, src: &str, des: &str, ty: RequestType, desired: CellState) -> bool {
        let before = self.get_cell(src, des, ty);

        self.set_cell(src, des, ty, CellState::Unset);
        if self.resolve(src, des, ty).state != desired {
            self.set_cell(src, des, ty, desired);
        }

        self.get_cell(src, des, ty) != before
    }

    /// Toggle towards `block`.
    pub fn block_cell(&mut self, src: &str, des: &str, ty: RequestType) -> bool {
        self.toggle_cell(src, des, ty, CellState::Block)
    }

    /// Toggle towards `allow`.
    pub fn allow_cell(&mut self, src: &str, des: &str, ty: RequestType) -> bool {
        self.toggle_cell(src, des, ty, CellState::Allow)
    }
}
