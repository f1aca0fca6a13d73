use std::{
    collections::BTreeMap,
    fmt::{
        self,
        Display,
        Formatter,
    },
};

use crate::{
    common::{
        data::{
            Data,
            Side,
        },
        error::Error,
    },
    types::universe::{
        TypeId,
        Universe,
    },
};

/// A runtime value paired with the type it was constructed as.
/// Tokens are only built by the `Universe`,
/// which keeps the declared type and the shape of the data consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    data: Data,
    ty: TypeId,
}

impl Token {
    pub(crate) fn new(data: Data, ty: TypeId) -> Token {
        Token { data, ty }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            Data::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a field of a record token.
    pub fn field(&self, name: &str) -> Option<&Token> {
        self.fields()?
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, token)| token)
    }

    pub fn fields(&self) -> Option<&[(String, Token)]> {
        match &self.data {
            Data::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn injection(&self) -> Option<(Side, &Token)> {
        match &self.data {
            Data::Injection(side, inner) => Some((*side, inner)),
            _ => None,
        }
    }

    /// Strips every layer of sum injection,
    /// returning the token of the concrete leaf type.
    pub fn leaf(&self) -> &Token {
        let mut token = self;
        while let Data::Injection(_, inner) = &token.data {
            token = inner;
        }
        token
    }

    pub fn failure(&self) -> Option<&Error> {
        match &self.data {
            Data::Failure(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure().is_some()
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.data, Data::Closure(_))
    }

    /// Pairs the token with its universe so it can be displayed
    /// as `value : type`.
    pub fn shown<'a>(&'a self, universe: &'a Universe) -> Shown<'a> {
        Shown { token: self, universe }
    }
}

/// A token ready to be displayed, see [`Token::shown`].
pub struct Shown<'a> {
    token: &'a Token,
    universe: &'a Universe,
}

impl Shown<'_> {
    fn value(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.token.data {
            Data::Int(n) => write!(f, "{}", n),
            Data::Str(s) => write!(f, "{}", s),
            Data::Record(fields) => {
                write!(f, "[")?;
                for (index, (_, token)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", token.shown(self.universe))?;
                }
                write!(f, "]")
            },
            Data::Injection(side, inner) => {
                write!(f, "{}({})", side, inner.shown(self.universe))
            },
            Data::Closure(closure) if closure.args.is_empty() => {
                write!(f, "{}", closure.lambda.name)
            },
            Data::Closure(closure) => write!(f, "klambda<{}>", closure.lambda.name),
            Data::Failure(error) => write!(f, "{}", error),
        }
    }
}

impl Display for Shown<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.value(f)?;
        write!(f, " : {}", self.universe.get(self.token.ty))
    }
}

/// Input accepted by `Universe::construct`.
/// Text is parsed against primitive and sum types,
/// field maps build records, and existing tokens are checked and narrowed.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    Text(String),
    Token(Token),
    Fields(BTreeMap<String, Raw>),
}

impl Raw {
    pub fn shape(&self) -> &'static str {
        match self {
            Raw::Text(_) => "text",
            Raw::Token(_) => "a token",
            Raw::Fields(_) => "a field map",
        }
    }
}

impl From<&str> for Raw {
    fn from(text: &str) -> Raw {
        Raw::Text(text.to_string())
    }
}

impl From<String> for Raw {
    fn from(text: String) -> Raw {
        Raw::Text(text)
    }
}

impl From<i64> for Raw {
    fn from(n: i64) -> Raw {
        Raw::Text(n.to_string())
    }
}

impl From<Token> for Raw {
    fn from(token: Token) -> Raw {
        Raw::Token(token)
    }
}

impl<K: Into<String>> FromIterator<(K, Token)> for Raw {
    fn from_iter<I: IntoIterator<Item = (K, Token)>>(iter: I) -> Raw {
        Raw::Fields(
            iter.into_iter()
                .map(|(name, token)| (name.into(), Raw::Token(token)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leaf_strips_injections() {
        let mut universe = Universe::new();
        let int = universe.int();
        let str = universe.str();
        let inner = universe.union(int, str);
        let dash = universe.refine(str, crate::Refinement::new().size_eq(1)).unwrap();
        let outer = universe.union(inner, dash);

        let token = universe.construct(outer, "594").unwrap();
        assert_eq!(token.ty(), outer);
        assert!(token.injection().is_some());
        assert_eq!(token.leaf().as_int(), Some(594));
        assert_eq!(token.leaf().ty(), int);
    }

    #[test]
    fn render() {
        let mut universe = Universe::new();
        let int = universe.int();
        let str = universe.str();
        let either = universe.union(int, str);

        let token = universe.construct(either, "594").unwrap();
        assert_eq!(token.shown(&universe).to_string(), "inl(594 : int) : int | str");

        let token = universe.construct(str, "hello").unwrap();
        assert_eq!(token.shown(&universe).to_string(), "hello : str");
    }

    #[test]
    fn raw_from_fields() {
        let mut universe = Universe::new();
        let int = universe.int();
        let a = universe.construct(int, "1").unwrap();
        let raw: Raw = vec![("a", a.clone())].into_iter().collect();
        match raw {
            Raw::Fields(fields) => assert_eq!(fields.get("a"), Some(&Raw::Token(a))),
            other => panic!("expected fields, got {:?}", other),
        }
    }
}
