use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    common::{
        error::Error,
        token::Token,
    },
    function::closure::Closure,
};

/// Which branch of a sum a value was injected through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Inl,
    Inr,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Side::Inl => write!(f, "inl"),
            Side::Inr => write!(f, "inr"),
        }
    }
}

/// The runtime shape of a `Token`.
/// This is a closed set; code that inspects tokens matches on it exhaustively.
#[derive(Clone, PartialEq)]
pub enum Data {
    // Primitive
    Int(i64),
    Str(String),

    // Compound
    /// Fields in the order the product type declares them.
    Record(Vec<(String, Token)>),
    /// The inner token is typed as the variant, never as the sum itself.
    Injection(Side, Box<Token>),
    Closure(Closure),

    /// A reported error handed back as a value, see `Policy::Pass`.
    Failure(Error),
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Data::Int(n)          => write!(f, "Int({:?})", n),
            Data::Str(s)          => write!(f, "Str({:?})", s),
            Data::Record(fields)  => f.debug_map().entries(fields.iter().map(|(k, v)| (k, v))).finish(),
            Data::Injection(s, t) => write!(f, "{}({:?})", s, t),
            Data::Closure(c)      => write!(f, "Closure({}, {} applied)", c.lambda.name, c.args.len()),
            Data::Failure(e)      => write!(f, "Failure({:?})", e),
        }
    }
}
