//! Hostname generalization and the hostname conversion boundary.

use std::borrow::Cow;

/// Token matching any hostname.
pub const WILDCARD: &str = "*";

/// Returned by [`broaden`] once the wildcard itself has been generalized.
pub const EXHAUSTED: &str = "";

/// Best-effort check for an address literal (IPv4-looking or bracketed IPv6).
///
/// This is deliberately coarse: anything containing a letter past `f`, an
/// underscore or a hyphen is a domain; anything ending in `.<digits>` or
/// starting with `[` is an address. A wrong answer only changes whether the
/// hostname is generalized label by label or straight to [`WILDCARD`].
///
/// # Examples
/// ```
/// use hostmatrix::hostname::is_address_literal;
///
/// assert!(is_address_literal("192.168.1.1"));
/// assert!(is_address_literal("[fe80::1]"));
/// assert!(!is_address_literal("www.example.com"));
/// ```
pub fn is_address_literal(hostname: &str) -> bool {
    let bytes = hostname.as_bytes();
    if bytes
        .iter()
        .any(|&b| matches!(b, b'g'..=b'z' | b'_' | b'-'))
    {
        return false;
    }
    if ends_with_numeric_label(bytes) {
        return true;
    }
    bytes.first() == Some(&b'[')
}

/// `.` followed by at least one trailing ASCII digit.
fn ends_with_numeric_label(bytes: &[u8]) -> bool {
    let digits = bytes.iter().rev().take_while(|b| b.is_ascii_digit()).count();
    digits > 0 && digits < bytes.len() && bytes[bytes.len() - digits - 1] == b'.'
}

/// Next less specific form of `hostname`.
///
/// `a.b.c` → `b.c` → `c` → `*` → `""`. Address literals go straight to `*`.
pub fn broaden(hostname: &str) -> &str {
    if hostname == WILDCARD {
        return EXHAUSTED;
    }
    if is_address_literal(hostname) {
        return WILDCARD;
    }
    match hostname.find('.') {
        Some(pos) if pos + 1 < hostname.len() => &hostname[pos + 1..],
        _ => WILDCARD,
    }
}

/// Iterate over the generalization chain of `hostname`, itself first and
/// [`WILDCARD`] last.
pub fn chain(hostname: &str) -> Chain<'_> {
    Chain {
        next: Some(hostname),
    }
}

/// Iterator returned by [`chain`].
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.next?;
        let broader = broaden(current);
        self.next = if broader.is_empty() { None } else { Some(broader) };
        Some(current)
    }
}

/// Converts between the display (Unicode) and canonical (ASCII) forms of a
/// hostname.
///
/// Supplied by the host environment. Both directions must be total and pure.
/// The matrix only ever stores canonical names.
pub trait HostnameConverter {
    /// Display form to canonical storage form.
    fn to_canonical<'a>(&self, hostname: &'a str) -> Cow<'a, str>;

    /// Canonical storage form to display form.
    fn to_display<'a>(&self, hostname: &'a str) -> Cow<'a, str>;
}

/// Identity conversion, for hosts that already deal in ASCII names only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl HostnameConverter for Passthrough {
    fn to_canonical<'a>(&self, hostname: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(hostname)
    }

    fn to_display<'a>(&self, hostname: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(hostname)
    }
}

impl<T: HostnameConverter + ?Sized> HostnameConverter for &T {
    fn to_canonical<'a>(&self, hostname: &'a str) -> Cow<'a, str> {
        (**self).to_canonical(hostname)
    }

    fn to_display<'a>(&self, hostname: &'a str) -> Cow<'a, str> {
        (**self).to_display(hostname)
    }
}
