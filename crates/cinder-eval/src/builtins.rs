//! Built-in math functions, the only callable targets at evaluation time.

/// A built-in unary math function.
///
/// Domain errors follow IEEE conventions: `sqrt(-1)` is NaN, `log(0)` is -inf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sqrt,
    /// Natural logarithm.
    Log,
    Sin,
    Cos,
}

impl Builtin {
    /// Look up a built-in by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Builtin::Sqrt),
            "log" => Some(Builtin::Log),
            "sin" => Some(Builtin::Sin),
            "cos" => Some(Builtin::Cos),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Sqrt => "sqrt",
            Builtin::Log => "log",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
        }
    }

    pub fn arity(&self) -> usize {
        1
    }

    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Builtin::Sqrt => x.sqrt(),
            Builtin::Log => x.ln(),
            Builtin::Sin => x.sin(),
            Builtin::Cos => x.cos(),
        }
    }
}
