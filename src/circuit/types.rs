//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

/// Index of a gate in the circuit's gate arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub usize);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// Index of a net in the circuit's net arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Logic primitive implemented by a gate.
///
/// The kind is fixed when the gate is created and never re-derived from the
/// gate's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateKind {
    Not,
    Nand,
    Nor,
    And,
    Or,
    Xor,
    Xnor,
}

impl GateKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [GateKind; 7] = [
        GateKind::Not,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Xnor,
    ];

    /// Lowercase Verilog primitive keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Nand => "nand",
            Self::Nor => "nor",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Xnor => "xnor",
        }
    }

    /// Parse a kind from a primitive keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Whether the output is the complement of the underlying function.
    pub fn is_inverting(&self) -> bool {
        matches!(self, Self::Not | Self::Nand | Self::Nor | Self::Xnor)
    }

    /// Minimum number of input pins for this primitive.
    pub fn min_inputs(&self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }

    /// Maximum number of input pins, if bounded.
    pub fn max_inputs(&self) -> Option<usize> {
        match self {
            Self::Not => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword().to_ascii_uppercase())
    }
}

impl FromStr for GateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| format!("unknown gate kind '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for kind in GateKind::ALL {
            assert_eq!(GateKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(GateKind::from_keyword("NAND"), Some(GateKind::Nand));
        assert_eq!(GateKind::from_keyword("buf"), None);
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(GateKind::Xnor.to_string(), "XNOR");
        assert_eq!("nor".parse::<GateKind>().unwrap(), GateKind::Nor);
    }

    #[test]
    fn test_pin_bounds() {
        assert_eq!(GateKind::Not.min_inputs(), 1);
        assert_eq!(GateKind::Not.max_inputs(), Some(1));
        assert_eq!(GateKind::And.max_inputs(), None);
        assert!(GateKind::Nand.is_inverting());
        assert!(!GateKind::Or.is_inverting());
    }
}
