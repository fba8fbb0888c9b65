//! Boolean expression tree and its text form.

use std::fmt;

use crate::ir::GateType;

/// Binary-or-wider operator of a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    And,
    Or,
    Xor,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::And => " & ",
            Op::Or => " | ",
            Op::Xor => " ^ ",
        }
    }
}

/// A recovered Boolean expression.
///
/// Every variant renders self-delimited (an identifier, a `~` prefix, a
/// bracketed group or a placeholder), so operands never need parentheses of
/// their own.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// An external input label such as `A`.
    Var(String),
    Not(Box<Expr>),
    /// `(a op b op ...)`, negated as a whole when `negated` is set.
    Apply {
        op: Op,
        negated: bool,
        operands: Vec<Expr>,
    },
    /// The gate was re-entered while being expanded: `<?>`.
    Cycle,
    /// A NOT gate with no operand: `?`.
    Missing,
}

impl Expr {
    /// Combines operands under a gate's operator.
    pub fn combine(gate_type: GateType, mut operands: Vec<Expr>) -> Expr {
        let (op, negated) = match gate_type {
            GateType::Not => {
                let inner = if operands.is_empty() {
                    Expr::Missing
                } else {
                    operands.swap_remove(0)
                };
                return Expr::Not(Box::new(inner));
            }
            GateType::And => (Op::And, false),
            GateType::Or => (Op::Or, false),
            GateType::Xor => (Op::Xor, false),
            GateType::Nand => (Op::And, true),
            GateType::Nor => (Op::Or, true),
            GateType::Xnor => (Op::Xor, true),
        };
        Expr::Apply {
            op,
            negated,
            operands,
        }
    }

    /// True if a cycle placeholder appears anywhere in the expression.
    pub fn has_cycle(&self) -> bool {
        match self {
            Expr::Cycle => true,
            Expr::Not(inner) => inner.has_cycle(),
            Expr::Apply { operands, .. } => operands.iter().any(Expr::has_cycle),
            Expr::Var(_) | Expr::Missing => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => f.write_str(name),
            // A plain group is already bracketed; anything else but a name
            // gets its own parentheses.
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Var(_) | Expr::Apply { negated: false, .. } => write!(f, "~{inner}"),
                _ => write!(f, "~({inner})"),
            },
            Expr::Apply {
                op,
                negated,
                operands,
            } => {
                if *negated {
                    f.write_str("~")?;
                }
                f.write_str("(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(op.symbol())?;
                    }
                    write!(f, "{operand}")?;
                }
                f.write_str(")")
            }
            Expr::Cycle => f.write_str("<?>"),
            Expr::Missing => f.write_str("?"),
        }
    }
}
