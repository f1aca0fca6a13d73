use crate::{
    common::{
        data::Data,
        error::Error,
        token::Token,
    },
    function::{
        closure::Closure,
        lambda::Lambda,
    },
    types::universe::{
        TypeId,
        Universe,
    },
};

impl Universe {
    fn unary(&self, function: &Token) -> Result<(TypeId, TypeId), Error> {
        if !matches!(function.data(), Data::Closure(_)) {
            return Err(Error::OrConstructorFailure(
                "cannot 'or' tokens of non-function types".to_string(),
            ));
        }
        match self.signature(function.ty()) {
            Some([domain, ret]) => Ok((*domain, *ret)),
            _ => Err(Error::OrConstructorFailure("cannot 'or' curried-functions".to_string())),
        }
    }

    /// Combines two single-argument functions into one over the sum of their domains.
    /// The combined function looks at which variant its argument holds
    /// and calls the function defined over it.
    /// Both functions must return the same type,
    /// and no value may be in both domains.
    pub fn union_functions(&mut self, a: &Token, b: &Token) -> Result<Token, Error> {
        let ((da, ra), (db, rb)) = match (self.unary(a), self.unary(b)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(error), _) | (_, Err(error)) => return self.take(error),
        };

        let reason = if ra != rb {
            Some("cannot 'or' functions with differing return types")
        } else if da == db {
            Some("cannot 'or' functions defined over the same domain")
        } else if !self.leaves(da).is_disjoint(&self.leaves(db)) {
            Some("cannot 'or' functions with overlapping domains")
        } else {
            None
        };
        if let Some(reason) = reason {
            return self.take(Error::OrConstructorFailure(reason.to_string()));
        }

        let domain = self.union(da, db);
        let name = format!("{} | {}", name_of(a), name_of(b));
        log::debug!("combining {} over <{}>", name, self.get(domain));

        let (left, right) = (a.clone(), b.clone());
        let body = move |universe: &mut Universe, mut args: Vec<Token>| {
            let arg = args.remove(0);
            if let Some(narrowed) = universe.narrow(&arg, da) {
                universe.call(&left, vec![narrowed])
            } else if let Some(narrowed) = universe.narrow(&arg, db) {
                universe.call(&right, vec![narrowed])
            } else {
                universe.take(Error::TypeMismatch {
                    expected: universe.name(domain),
                    got: universe.name(arg.ty()),
                })
            }
        };

        Ok(self.lambda(Lambda::new(&name, vec![domain, ra], body)))
    }

    /// Product induction: turns a function over the field types of a product
    /// into a single-argument function over the product itself,
    /// which spreads a record's fields into the wrapped function in declared order.
    /// The product is the first registered one whose field types match.
    pub fn induce(&mut self, function: &Token) -> Result<Token, Error> {
        let signature = match (function.data(), self.signature(function.ty())) {
            (Data::Closure(_), Some(signature)) => signature.to_vec(),
            _ => return self.take(Error::Uncallable(function.shown(self).to_string())),
        };

        let (ret, domain) = match signature.split_last() {
            Some((ret, domain)) => (*ret, domain),
            None => return self.take(Error::Uncallable(function.shown(self).to_string())),
        };
        let product = match self.lookup_product(domain) {
            Some(product) => product,
            None => {
                let fields = domain.iter().map(|ty| self.name(*ty)).collect::<Vec<_>>();
                return self.take(Error::InvalidArgument {
                    expected: "a product type declared over the function's arguments".to_string(),
                    got: format!("[{}]", fields.join(", ")),
                });
            },
        };

        let name = format!("ind<{}>", name_of(function));
        let inner = function.clone();
        let body = move |universe: &mut Universe, args: Vec<Token>| {
            let fields: Vec<Token> = args
                .into_iter()
                .next()
                .as_ref()
                .and_then(Token::fields)
                .map(|fields| fields.iter().map(|(_, token)| token.clone()).collect())
                .unwrap_or_default();
            universe.call(&inner, fields)
        };

        Ok(self.lambda(Lambda::new(&name, vec![product, ret], body)))
    }
}

fn name_of(function: &Token) -> &str {
    match function.data() {
        Data::Closure(Closure { lambda, .. }) => &lambda.name,
        _ => "?",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Refinement;

    struct Domains {
        int: TypeId,
        str: TypeId,
        four: TypeId,
        dash: TypeId,
    }

    fn domains(universe: &mut Universe) -> Domains {
        let (int, str) = (universe.int(), universe.str());
        Domains {
            int,
            str,
            four: universe.refine(str, Refinement::new().size_eq(4)).unwrap(),
            dash: universe
                .refine(str, Refinement::new().predicate(crate::Predicate::equals("-")))
                .unwrap(),
        }
    }

    /// A function answering `answer` for anything in `domain`.
    fn constant(universe: &mut Universe, name: &str, domain: TypeId, answer: &'static str) -> Token {
        let str = universe.str();
        universe
            .function(name, vec![domain], str, move |universe, _| {
                let str = universe.str();
                universe.construct(str, answer)
            })
            .unwrap()
    }

    #[test]
    fn sum_dispatch() {
        let mut universe = Universe::new();
        let d = domains(&mut universe);
        let f = constant(&mut universe, "f", d.int, "f");
        let g = constant(&mut universe, "g", d.four, "g");
        let both = universe.union_functions(&f, &g).unwrap();
        assert_eq!(both.shown(&universe).to_string(), "f | g : int | str* -> str");

        let domain = universe.union(d.int, d.four);
        let nine = universe.construct(domain, "9").unwrap();
        let four = universe.construct(domain, "four").unwrap();
        assert_eq!(universe.call(&both, vec![nine]).unwrap().as_str(), Some("f"));
        assert_eq!(universe.call(&both, vec![four]).unwrap().as_str(), Some("g"));

        let five = universe.construct(d.str, "fives").unwrap();
        assert!(universe.call(&both, vec![five]).is_err());
    }

    #[test]
    fn nested_dispatch() {
        let mut universe = Universe::new();
        let d = domains(&mut universe);
        let f = constant(&mut universe, "f", d.int, "f");
        let g = constant(&mut universe, "g", d.four, "g");
        let h = constant(&mut universe, "h", d.dash, "h");
        let fg = universe.union_functions(&f, &g).unwrap();
        let fgh = universe.union_functions(&fg, &h).unwrap();

        let small = universe.union(d.int, d.four);
        let domain = universe.union(small, d.dash);
        for (raw, expected) in [("9", "f"), ("four", "g"), ("-", "h")] {
            let arg = universe.construct(domain, raw).unwrap();
            assert_eq!(universe.call(&fgh, vec![arg]).unwrap().as_str(), Some(expected));
        }
    }

    #[test]
    fn or_failures() {
        let mut universe = Universe::new();
        let d = domains(&mut universe);
        let f = constant(&mut universe, "f", d.int, "f");
        let g = constant(&mut universe, "g", d.int, "g");
        let wide = constant(&mut universe, "wide", d.str, "wide");
        let four = constant(&mut universe, "four", d.four, "four");
        let counts = universe
            .function("count", vec![d.four], d.int, |universe, _| {
                let int = universe.int();
                universe.construct(int, "4")
            })
            .unwrap();
        let curried = universe
            .function("pair", vec![d.int, d.int], d.int, |_, mut args| Ok(args.remove(0)))
            .unwrap();
        let one = universe.construct(d.int, "1").unwrap();

        let reason = |result: Result<Token, Error>| match result {
            Err(Error::OrConstructorFailure(reason)) => reason,
            other => panic!("expected an 'or' failure, got {:?}", other),
        };

        assert_eq!(
            reason(universe.union_functions(&f, &one)),
            "cannot 'or' tokens of non-function types"
        );
        assert_eq!(
            reason(universe.union_functions(&curried, &f)),
            "cannot 'or' curried-functions"
        );
        assert_eq!(
            reason(universe.union_functions(&f, &counts)),
            "cannot 'or' functions with differing return types"
        );
        assert_eq!(
            reason(universe.union_functions(&f, &g)),
            "cannot 'or' functions defined over the same domain"
        );
        let either = universe.union_functions(&f, &four).unwrap();
        assert_eq!(
            reason(universe.union_functions(&either, &four)),
            "cannot 'or' functions with overlapping domains"
        );
        assert!(universe.union_functions(&f, &wide).is_ok());
    }

    #[test]
    fn induction() {
        let mut universe = Universe::new();
        let (int, str) = (universe.int(), universe.str());
        let product = universe.product(vec![("a", int), ("b", str)]).unwrap();
        let f = universe
            .function("f", vec![int, str], str, |universe, args| {
                let n = args[0].as_int().unwrap_or_default();
                let text = args[1].as_str().unwrap_or_default();
                let str = universe.str();
                universe.construct(str, format!("{}{}", n, text))
            })
            .unwrap();

        let induced = universe.induce(&f).unwrap();
        assert_eq!(induced.shown(&universe).to_string(), "ind<f> : int & str -> str");

        let a = universe.construct(int, "7").unwrap();
        let b = universe.construct(str, " days").unwrap();
        let record = universe.record(product, vec![("a", a), ("b", b)]).unwrap();
        assert_eq!(universe.call(&induced, vec![record]).unwrap().as_str(), Some("7 days"));
    }

    #[test]
    fn induction_needs_a_product() {
        let mut universe = Universe::new();
        let int = universe.int();
        let f = universe
            .function("f", vec![int, int], int, |_, mut args| Ok(args.remove(0)))
            .unwrap();
        assert!(matches!(universe.induce(&f), Err(Error::InvalidArgument { .. })));
    }
}
