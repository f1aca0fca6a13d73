use std::fmt::{self, Debug, Formatter};

use crate::{
    common::{
        error::Error,
        token::Token,
    },
    types::universe::{
        TypeId,
        Universe,
    },
};

/// The native code run once a function has all of its arguments.
/// Arguments arrive already checked and narrowed to the signature.
pub type Body = dyn Fn(&mut Universe, Vec<Token>) -> Result<Token, Error>;

/// A named function body and the signature it was declared with.
/// The last entry of the signature is the return type.
pub struct Lambda {
    pub name: String,
    pub signature: Vec<TypeId>,
    body: Box<Body>,
}

impl Lambda {
    pub fn new(
        name: &str,
        signature: Vec<TypeId>,
        body: impl Fn(&mut Universe, Vec<Token>) -> Result<Token, Error> + 'static,
    ) -> Lambda {
        Lambda {
            name: name.to_string(),
            signature,
            body: Box::new(body),
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        self.signature.len() - 1
    }

    pub fn ret(&self) -> TypeId {
        self.signature[self.signature.len() - 1]
    }

    pub(crate) fn run(&self, universe: &mut Universe, args: Vec<Token>) -> Result<Token, Error> {
        (self.body)(universe, args)
    }
}

impl Debug for Lambda {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Bodies can't be compared, so a lambda is only equal to itself.
impl PartialEq for Lambda {
    fn eq(&self, other: &Lambda) -> bool {
        std::ptr::eq(self, other)
    }
}
