//! Filter expression tree.
//!
//! Queries are composed as a structured tree and serialized to the store's
//! wire grammar only at the boundary. Building strings through the tree
//! keeps field names, operators, and literal quoting in one place instead of
//! scattered through format! calls.
//!
//! The grammar deliberately has no `!=`: the store cannot index inequality,
//! so the operator set stops at `=`, `>`, `>=`, `<`, `<=` plus the boolean
//! combinators `&&`, `||`, `!`.

use std::fmt;

/// Comparison operator supported by the store grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// A literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Pre-encoded integer (cents, basis points, counts, flags).
    Int(i64),
    /// String literal, double-quoted on the wire.
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
        }
    }
}

/// A boolean filter expression over entity annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Cmp {
        field: String,
        op: CmpOp,
        value: Value,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Builds a comparison clause against an integer annotation.
    #[must_use]
    pub fn num(field: &str, op: CmpOp, value: i64) -> Self {
        Self::Cmp {
            field: field.to_string(),
            op,
            value: Value::Int(value),
        }
    }

    /// Builds an equality clause against a string annotation.
    #[must_use]
    pub fn str_eq(field: &str, value: &str) -> Self {
        Self::Cmp {
            field: field.to_string(),
            op: CmpOp::Eq,
            value: Value::Str(value.to_string()),
        }
    }

    /// ANDs this expression with another, flattening nested ANDs.
    #[must_use]
    pub fn and(self, other: Expr) -> Self {
        match self {
            Self::And(mut clauses) => {
                clauses.push(other);
                Self::And(clauses)
            }
            first => Self::And(vec![first, other]),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // OR groups are parenthesized when nested under AND so the wire
        // string reads the same way the tree does.
        match self {
            Self::Or(_) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cmp { field, op, value } => write!(f, "{field} {} {value}", op.as_str()),
            Self::And(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " && ")?;
                    }
                    clause.fmt_operand(f)?;
                }
                Ok(())
            }
            Self::Or(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " || ")?;
                    }
                    clause.fmt_operand(f)?;
                }
                Ok(())
            }
            Self::Not(inner) => write!(f, "!({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_rendering() {
        assert_eq!(Expr::num("tvlUsd", CmpOp::Ge, 100_000_000).to_string(), "tvlUsd >= 100000000");
        assert_eq!(Expr::str_eq("chain", "Ethereum").to_string(), "chain = \"Ethereum\"");
    }

    #[test]
    fn test_or_group_parenthesized_under_and() {
        let expr = Expr::And(vec![
            Expr::num("stablecoin", CmpOp::Eq, 1),
            Expr::Or(vec![
                Expr::str_eq("chain", "Ethereum"),
                Expr::str_eq("chain", "Solana"),
            ]),
        ]);
        assert_eq!(
            expr.to_string(),
            "stablecoin = 1 && (chain = \"Ethereum\" || chain = \"Solana\")"
        );
    }

    #[test]
    fn test_and_flattens() {
        let expr = Expr::num("apy", CmpOp::Gt, 0)
            .and(Expr::num("count", CmpOp::Ge, 30))
            .and(Expr::str_eq("project", "curve-dex"));
        assert_eq!(
            expr.to_string(),
            "apy > 0 && count >= 30 && project = \"curve-dex\""
        );
    }

    #[test]
    fn test_string_literal_quote_escaped() {
        let expr = Expr::str_eq("symbol", "WEIRD\"PAIR");
        assert_eq!(expr.to_string(), "symbol = \"WEIRD\\\"PAIR\"");
    }

    #[test]
    fn test_not_rendering() {
        let expr = Expr::Not(Box::new(Expr::num("outlier", CmpOp::Eq, 1)));
        assert_eq!(expr.to_string(), "!(outlier = 1)");
    }
}
