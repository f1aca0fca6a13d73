use std::collections::{BTreeSet, HashMap};

use crate::{
    common::{
        config::{
            Config,
            Policy,
        },
        data::Data,
        error::Error,
        token::{
            Raw,
            Token,
        },
    },
    types::{
        descriptor::{
            Descriptor,
            Kind,
            Primitive,
        },
        refine::ConstraintKey,
    },
};

/// Refers to a type registered in a `Universe`.
/// Structurally identical types always share a `TypeId`,
/// so comparing ids is comparing types.
/// A `TypeId` is only meaningful to the universe that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

/// The structural identity a type is interned under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Key {
    Refined(Primitive, Vec<ConstraintKey>),
    /// The set of leaf types, so order and nesting don't matter.
    Sum(BTreeSet<TypeId>),
    Product(String, Vec<(String, TypeId)>),
    Function(Vec<TypeId>),
    Failure,
}

/// Owns every type created during a session.
/// Types are push-only: nothing is ever removed or changed once registered,
/// and every identity or dedup decision is made here.
///
/// A universe is not meant to be shared between threads;
/// give each stream or session its own.
#[derive(Debug)]
pub struct Universe {
    types: Vec<Descriptor>,
    keys: HashMap<Key, TypeId>,
    names: HashMap<String, TypeId>,
    config: Config,
    int: TypeId,
    str: TypeId,
    error: TypeId,
}

impl Default for Universe {
    fn default() -> Universe {
        Universe::new()
    }
}

impl Universe {
    pub fn new() -> Universe {
        Universe::with_config(Config::default())
    }

    /// Creates a universe holding the primitive types `int` and `str`
    /// and the built-in `error` type, each declared under its name.
    pub fn with_config(config: Config) -> Universe {
        let mut universe = Universe {
            types: vec![],
            keys: HashMap::new(),
            names: HashMap::new(),
            config,
            int: TypeId(0),
            str: TypeId(0),
            error: TypeId(0),
        };

        for primitive in [Primitive::Int, Primitive::Str] {
            let id = universe.register(
                Descriptor::refined(primitive, vec![]),
                Key::Refined(primitive, vec![]),
            );
            universe.names.insert(primitive.name().to_string(), id);
        }
        let error = universe.register(
            Descriptor::new("error".to_string(), Kind::Failure),
            Key::Failure,
        );
        universe.names.insert("error".to_string(), error);

        universe.int = universe.names["int"];
        universe.str = universe.names["str"];
        universe.error = error;
        universe
    }

    pub fn int(&self) -> TypeId {
        self.int
    }

    pub fn str(&self) -> TypeId {
        self.str
    }

    pub fn error(&self) -> TypeId {
        self.error
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.config.policy = policy;
    }

    /// Returns the descriptor of a type.
    /// Panics if `id` was issued by another universe.
    pub fn get(&self, id: TypeId) -> &Descriptor {
        &self.types[id.0]
    }

    /// The display name of a type, e.g. `int | str*`.
    pub fn name(&self, id: TypeId) -> String {
        self.get(id).to_string()
    }

    /// All registered types, in registration order.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &Descriptor)> {
        self.types.iter().enumerate().map(|(index, d)| (TypeId(index), d))
    }

    pub(crate) fn find(&self, key: &Key) -> Option<TypeId> {
        self.keys.get(key).copied()
    }

    pub(crate) fn register(&mut self, descriptor: Descriptor, key: Key) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(descriptor);
        self.keys.insert(key, id);
        id
    }

    /// Binds a name to a type.
    /// Named types are immutable, so a name can't be bound twice,
    /// though one type may be bound under several names.
    pub fn declare(&mut self, name: &str, id: TypeId) -> Result<(), Error> {
        if self.names.contains_key(name) {
            return Err(Error::AlreadyDefined(name.to_string()));
        }
        log::debug!("declaring `{}` as <{}>", name, self.get(id));
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Returns the function type with exactly this signature,
    /// registering it first if needed.
    /// The last entry of `signature` is the return type.
    pub fn lookup_or_create_function(&mut self, signature: Vec<TypeId>) -> TypeId {
        let key = Key::Function(signature.clone());
        if let Some(existing) = self.find(&key) {
            return existing;
        }

        let name = signature
            .iter()
            .map(|ty| self.name(*ty))
            .collect::<Vec<_>>()
            .join(" -> ");
        log::debug!("interning function type {}", name);
        self.register(Descriptor::new(name, Kind::Function { signature }), key)
    }

    /// Finds the first product type whose field types are exactly `prefix`,
    /// in declaration order.
    pub fn lookup_product(&self, prefix: &[TypeId]) -> Option<TypeId> {
        self.types().find_map(|(id, descriptor)| match descriptor.kind() {
            Kind::Product { fields }
                if fields.len() == prefix.len()
                    && fields.iter().zip(prefix).all(|((_, a), b)| a == b) =>
            {
                Some(id)
            },
            _ => None,
        })
    }

    /// The signature of a function type, or `None` for other types.
    pub fn signature(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.get(id).kind() {
            Kind::Function { signature } => Some(signature),
            _ => None,
        }
    }

    /// Whether `raw` is valid text for a type.
    /// Only primitive types and sums of them match text.
    pub fn matches(&self, id: TypeId, raw: &str) -> bool {
        let descriptor = self.get(id);
        match descriptor.kind() {
            Kind::Primitive(primitive) => primitive.accepts(raw) && descriptor.satisfies(raw),
            Kind::Sum { left, right } => self.matches(*left, raw) || self.matches(*right, raw),
            Kind::Product { .. } | Kind::Function { .. } | Kind::Failure => false,
        }
    }

    /// Constructs a token of a type.
    ///
    /// - Text builds primitives, and sums by trying the left branch first.
    /// - A field map builds a record, see `construct_record`.
    /// - An existing token is checked with `is_a` and narrowed to the type.
    ///
    /// Failures are reported through the session's error policy.
    pub fn construct(&self, id: TypeId, raw: impl Into<Raw>) -> Result<Token, Error> {
        let raw: Raw = raw.into();
        match (self.get(id).kind(), raw) {
            (_, Raw::Token(token)) => match self.narrow(&token, id) {
                Some(narrowed) => Ok(narrowed),
                None => self.take(Error::TypeMismatch {
                    expected: self.name(id),
                    got: self.name(token.ty()),
                }),
            },
            (Kind::Primitive(primitive), Raw::Text(text)) => {
                let data = match (primitive, text.parse::<i64>()) {
                    _ if !self.matches(id, &text) => None,
                    (Primitive::Int, Ok(n)) => Some(Data::Int(n)),
                    (Primitive::Int, Err(_)) => None,
                    (Primitive::Str, _) => Some(Data::Str(text.clone())),
                };
                match data {
                    Some(data) => Ok(Token::new(data, id)),
                    None => self.take(Error::TypeMismatch {
                        expected: self.name(id),
                        got: format!("{:?}", text),
                    }),
                }
            },
            (Kind::Sum { left, right }, Raw::Text(text)) => {
                self.construct_sum(id, (*left, *right), &text)
            },
            (Kind::Product { .. }, Raw::Fields(fields)) => self.construct_record(id, fields),
            (Kind::Product { .. }, other) => self.take(Error::InvalidArgument {
                expected: "a field map".to_string(),
                got: other.shape().to_string(),
            }),
            (_, other) => self.take(Error::InvalidArgument {
                expected: format!("text for <{}>", self.get(id)),
                got: other.shape().to_string(),
            }),
        }
    }

    /// Reports an error according to the session's policy:
    /// `Raise` returns it as `Err`,
    /// `Pass` returns it inside a token of the `error` type.
    pub fn take(&self, error: Error) -> Result<Token, Error> {
        match self.config.policy {
            Policy::Raise => Err(error),
            Policy::Pass => {
                log::debug!("passing error as a value: {}", error);
                Ok(Token::new(Data::Failure(error), self.error))
            },
        }
    }
}
