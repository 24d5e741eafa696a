//! Binary operators.

use std::fmt;

/// The binary operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `<`, the only comparison.
    Lt,
    And,
    Or,
}

impl BinaryOp {
    /// Parse the operator's source symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "<" => BinaryOp::Lt,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            _ => return None,
        })
    }

    /// The operator's source symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// `*`, `/`, `-`, `+`: integer operands, integer result.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    /// `<`: integer operands, boolean result.
    pub fn is_comparison(self) -> bool {
        self == BinaryOp::Lt
    }

    /// `&&`, `||`: boolean operands, boolean result.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        for op in [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Lt,
            BinaryOp::And,
            BinaryOp::Or,
        ] {
            assert_eq!(BinaryOp::from_symbol(op.as_str()), Some(op));
        }
        assert_eq!(BinaryOp::from_symbol("%"), None);
    }

    #[test]
    fn families_are_disjoint() {
        assert!(BinaryOp::Mul.is_arithmetic());
        assert!(!BinaryOp::Lt.is_arithmetic());
        assert!(BinaryOp::Lt.is_comparison());
        assert!(BinaryOp::Or.is_logical());
        assert!(!BinaryOp::Add.is_logical());
    }
}
