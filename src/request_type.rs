//! Request type categories.

use std::fmt;

/// RequestType is the coarse category a request was classified into.
///
/// The set is closed. Each category owns one cell in a rule and one 2-bit
/// field in the packed snapshot encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// Any request type (`*`)
    Any,
    /// Inline `<script>` content
    InlineScript,
    /// Script served by the page's own site
    FirstPartyScript,
    /// Script served by another site
    ThirdPartyScript,
    /// Frame served by another site
    ThirdPartyFrame,
    /// Image
    Image,
}

impl RequestType {
    /// Number of categories.
    pub const COUNT: usize = 6;

    /// All categories in their fixed serialization order.
    pub const ALL: [RequestType; Self::COUNT] = [
        RequestType::Any,
        RequestType::InlineScript,
        RequestType::FirstPartyScript,
        RequestType::ThirdPartyScript,
        RequestType::ThirdPartyFrame,
        RequestType::Image,
    ];

    /// Parse a request type from its canonical name.
    ///
    /// Names are matched exactly; rule files are written in lowercase.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "*" => Some(RequestType::Any),
            "inline-script" => Some(RequestType::InlineScript),
            "1p-script" => Some(RequestType::FirstPartyScript),
            "3p-script" => Some(RequestType::ThirdPartyScript),
            "3p-frame" => Some(RequestType::ThirdPartyFrame),
            "image" => Some(RequestType::Image),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Any => "*",
            RequestType::InlineScript => "inline-script",
            RequestType::FirstPartyScript => "1p-script",
            RequestType::ThirdPartyScript => "3p-script",
            RequestType::ThirdPartyFrame => "3p-frame",
            RequestType::Image => "image",
        }
    }

    /// Slot index inside a rule's cell array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit offset of this category's 2-bit field in the packed encoding.
    pub fn bit_offset(self) -> u32 {
        (self as u32) * 2
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::InvalidRequestType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_parse() {
        assert_eq!(RequestType::parse("*"), Some(RequestType::Any));
        assert_eq!(RequestType::parse("inline-script"), Some(RequestType::InlineScript));
        assert_eq!(RequestType::parse("1p-script"), Some(RequestType::FirstPartyScript));
        assert_eq!(RequestType::parse("3p-script"), Some(RequestType::ThirdPartyScript));
        assert_eq!(RequestType::parse("3p-frame"), Some(RequestType::ThirdPartyFrame));
        assert_eq!(RequestType::parse("image"), Some(RequestType::Image));
        assert_eq!(RequestType::parse("IMAGE"), None);
        assert_eq!(RequestType::parse("xhr"), None);
    }

    #[test]
    fn test_bit_offsets_are_disjoint() {
        let offsets: Vec<u32> = RequestType::ALL.iter().map(|t| t.bit_offset()).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_index_matches_order() {
        for (i, ty) in RequestType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
            assert_eq!(RequestType::parse(ty.as_str()), Some(*ty));
        }
    }

    #[test]
    fn test_from_str_error() {
        let err = "video".parse::<RequestType>().unwrap_err();
        assert!(err.to_string().contains("video"));
    }
}
