use std::rc::Rc;

use crate::{
    common::{
        data::Data,
        error::Error,
        token::Token,
    },
    function::lambda::Lambda,
    types::universe::{
        TypeId,
        Universe,
    },
};

/// A function token's value: a lambda and the arguments applied so far.
/// The token's type is the residual signature,
/// so a closure over `int -> int -> str` with one argument applied
/// is typed `int -> str`.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub lambda: Rc<Lambda>,
    pub args: Vec<Token>,
}

impl Closure {
    /// Wraps a `Lambda` with no arguments applied.
    pub fn wrap(lambda: Lambda) -> Closure {
        Closure {
            lambda: Rc::new(lambda),
            args: vec![],
        }
    }
}

impl Universe {
    /// Declares a function taking `args` and returning `ret`.
    /// The function type `args.. -> ret` is interned like any other,
    /// and the returned token is a callable value of that type.
    pub fn function(
        &mut self,
        name: &str,
        args: Vec<TypeId>,
        ret: TypeId,
        body: impl Fn(&mut Universe, Vec<Token>) -> Result<Token, Error> + 'static,
    ) -> Result<Token, Error> {
        if args.is_empty() {
            return Err(Error::InvalidArgument {
                expected: format!("at least one argument type for `{}`", name),
                got: "none".to_string(),
            });
        }

        let mut signature = args;
        signature.push(ret);
        Ok(self.lambda(Lambda::new(name, signature, body)))
    }

    pub(crate) fn lambda(&mut self, lambda: Lambda) -> Token {
        let ty = self.lookup_or_create_function(lambda.signature.clone());
        Token::new(Data::Closure(Closure::wrap(lambda)), ty)
    }

    /// Applies arguments one at a time; see `curry`.
    /// Failure tokens, as either the function or an argument,
    /// are passed through untouched.
    pub fn call(&mut self, function: &Token, args: Vec<Token>) -> Result<Token, Error> {
        let mut result = function.clone();
        for arg in args {
            if result.is_failure() {
                break;
            }
            result = self.curry(&result, arg)?;
        }
        Ok(result)
    }

    /// Applies one argument to a function token.
    /// The argument is checked against the next slot of the signature.
    /// Applying the last argument runs the body, and its result is
    /// checked against the return type;
    /// otherwise a new closure of the residual type is returned.
    pub fn curry(&mut self, function: &Token, arg: Token) -> Result<Token, Error> {
        if arg.is_failure() {
            return Ok(arg);
        }

        let closure = match function.data() {
            Data::Closure(closure) => closure,
            Data::Failure(_) => return Ok(function.clone()),
            _ => return self.take(Error::Uncallable(function.shown(self).to_string())),
        };

        let signature = &closure.lambda.signature;
        let index = closure.args.len();
        let slot = match signature.get(index) {
            Some(slot) if index < closure.lambda.arity() => *slot,
            _ => return self.take(Error::Uncallable(function.shown(self).to_string())),
        };

        let arg = match self.narrow(&arg, slot) {
            Some(narrowed) => narrowed,
            None => {
                return self.take(Error::TypeMismatch {
                    expected: self.name(slot),
                    got: self.name(arg.ty()),
                })
            },
        };

        let mut args = closure.args.clone();
        args.push(arg);
        let residual = &signature[index + 1..];

        if residual.len() > 1 {
            let ty = self.lookup_or_create_function(residual.to_vec());
            let partial = Closure {
                lambda: Rc::clone(&closure.lambda),
                args,
            };
            return Ok(Token::new(Data::Closure(partial), ty));
        }

        let ret = closure.lambda.ret();
        log::trace!("evaluating {} with {} arguments", closure.lambda.name, args.len());
        let result = closure.lambda.run(self, args)?;
        if result.is_failure() {
            return Ok(result);
        }

        match self.narrow(&result, ret) {
            Some(narrowed) => Ok(narrowed),
            None => self.take(Error::TypeMismatch {
                expected: self.name(ret),
                got: self.name(result.ty()),
            }),
        }
    }
}
