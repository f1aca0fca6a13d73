use std::fmt::{self, Display, Formatter};

use crate::{
    common::{
        data::Data,
        error::Error,
        token::Token,
    },
    types::{
        descriptor::Primitive,
        universe::{
            TypeId,
            Universe,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        };
        write!(f, "{}", symbol)
    }
}

impl Universe {
    pub fn add(&self, a: &Token, b: &Token) -> Result<Token, Error> {
        self.binary(BinOp::Add, a, b)
    }

    pub fn subtract(&self, a: &Token, b: &Token) -> Result<Token, Error> {
        self.binary(BinOp::Sub, a, b)
    }

    pub fn multiply(&self, a: &Token, b: &Token) -> Result<Token, Error> {
        self.binary(BinOp::Mul, a, b)
    }

    pub fn divide(&self, a: &Token, b: &Token) -> Result<Token, Error> {
        self.binary(BinOp::Div, a, b)
    }

    /// The unrefined primitive a token's type is built on.
    fn base(&self, ty: TypeId) -> Option<Primitive> {
        self.get(ty).primitive()
    }

    /// Applies an operator to two tokens of the same primitive base.
    /// Refinements are dropped: `int* + int` is an `int`,
    /// as the sum of two refined values need not satisfy the refinement.
    /// Injected tokens are operated on through their leaf.
    pub fn binary(&self, op: BinOp, a: &Token, b: &Token) -> Result<Token, Error> {
        if let Some(error) = a.failure().or_else(|| b.failure()) {
            return self.take(error.clone());
        }

        let (a, b) = (a.leaf(), b.leaf());
        let unsupported = || Error::BinaryOperationUnsupported {
            op: op.to_string(),
            left: self.name(a.ty()),
            right: self.name(b.ty()),
        };

        match (self.base(a.ty()), self.base(b.ty()), a.data(), b.data()) {
            (Some(Primitive::Int), Some(Primitive::Int), Data::Int(x), Data::Int(y)) => {
                let result = match op {
                    BinOp::Add => x.checked_add(*y),
                    BinOp::Sub => x.checked_sub(*y),
                    BinOp::Mul => x.checked_mul(*y),
                    BinOp::Div if *y == 0 => {
                        return self.take(Error::InvalidArgument {
                            expected: "a non-zero divisor".to_string(),
                            got: "0".to_string(),
                        })
                    },
                    BinOp::Div => x.checked_div(*y),
                };
                match result {
                    Some(n) => Ok(Token::new(Data::Int(n), self.int())),
                    None => self.take(Error::InvalidArgument {
                        expected: "a result that fits in an int".to_string(),
                        got: format!("{} {} {}", x, op, y),
                    }),
                }
            },
            (Some(Primitive::Str), Some(Primitive::Str), Data::Str(x), Data::Str(y))
                if op == BinOp::Add =>
            {
                Ok(Token::new(Data::Str(format!("{}{}", x, y)), self.str()))
            },
            _ => self.take(unsupported()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Policy, Refinement};

    #[test]
    fn int_arithmetic() {
        let universe = Universe::new();
        let a = universe.construct(universe.int(), "10").unwrap();
        let b = universe.construct(universe.int(), "4").unwrap();

        assert_eq!(universe.add(&a, &b).unwrap().as_int(), Some(14));
        assert_eq!(universe.subtract(&a, &b).unwrap().as_int(), Some(6));
        assert_eq!(universe.multiply(&a, &b).unwrap().as_int(), Some(40));
        assert_eq!(universe.divide(&a, &b).unwrap().as_int(), Some(2));
    }

    #[test]
    fn concatenation() {
        let universe = Universe::new();
        let a = universe.construct(universe.str(), "hello").unwrap();
        let b = universe.construct(universe.str(), " world").unwrap();
        let joined = universe.add(&a, &b).unwrap();
        assert_eq!(joined.as_str(), Some("hello world"));
        assert_eq!(joined.ty(), universe.str());

        assert!(matches!(
            universe.subtract(&a, &b),
            Err(Error::BinaryOperationUnsupported { .. })
        ));
    }

    #[test]
    fn refinements_are_dropped() {
        let mut universe = Universe::new();
        let int = universe.int();
        let five = universe.refine(int, Refinement::new().size_eq(5)).unwrap();
        let a = universe.construct(five, "00015").unwrap();
        let b = universe.construct(int, "10").unwrap();
        let sum = universe.add(&a, &b).unwrap();
        assert_eq!(sum.ty(), int);
        assert_eq!(sum.as_int(), Some(25));
    }

    #[test]
    fn mixed_operands() {
        let universe = Universe::new();
        let a = universe.construct(universe.int(), "10").unwrap();
        let b = universe.construct(universe.str(), "ten").unwrap();
        assert_eq!(
            universe.add(&a, &b),
            Err(Error::BinaryOperationUnsupported {
                op: "+".to_string(),
                left: "int".to_string(),
                right: "str".to_string(),
            })
        );
    }

    #[test]
    fn checked() {
        let mut universe = Universe::new();
        let zero = universe.construct(universe.int(), "0").unwrap();
        let max = universe.construct(universe.int(), i64::MAX.to_string()).unwrap();
        assert!(matches!(universe.divide(&max, &zero), Err(Error::InvalidArgument { .. })));
        assert!(matches!(universe.add(&max, &max), Err(Error::InvalidArgument { .. })));

        universe.set_policy(Policy::Pass);
        assert!(universe.divide(&max, &zero).unwrap().is_failure());
    }

    #[test]
    fn injected_operands() {
        let mut universe = Universe::new();
        let either = universe.union(universe.int(), universe.str());
        let a = universe.construct(either, "2").unwrap();
        let b = universe.construct(either, "3").unwrap();
        assert_eq!(universe.multiply(&a, &b).unwrap().as_int(), Some(6));
    }
}
