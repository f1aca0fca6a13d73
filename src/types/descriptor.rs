use std::fmt::{self, Display, Formatter};

use crate::types::{
    refine::Constraint,
    universe::TypeId,
};

/// The primitive types every universe starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Str,
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Str => "str",
        }
    }

    /// Whether `raw` is a literal of this primitive,
    /// ignoring any refinement.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Primitive::Int => {
                !raw.chars().any(char::is_whitespace) && raw.parse::<i64>().is_ok()
            },
            Primitive::Str => true,
        }
    }
}

/// What kind of type a descriptor describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Primitive(Primitive),
    Sum { left: TypeId, right: TypeId },
    Product { fields: Vec<(String, TypeId)> },
    /// Argument types in call order, followed by the return type.
    Function { signature: Vec<TypeId> },
    /// The type of errors handed back as values.
    Failure,
}

/// A registered type.
/// Descriptors are immutable: once the universe registers one,
/// it only ever hands out shared references to it.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    kind: Kind,
    constraints: Vec<Constraint>,
}

impl Descriptor {
    pub(crate) fn new(name: String, kind: Kind) -> Descriptor {
        Descriptor { name, kind, constraints: vec![] }
    }

    pub(crate) fn refined(primitive: Primitive, constraints: Vec<Constraint>) -> Descriptor {
        Descriptor {
            name: primitive.name().to_string(),
            kind: Kind::Primitive(primitive),
            constraints,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn has_predicate(&self) -> bool {
        !self.constraints.is_empty()
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self.kind {
            Kind::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    /// Whether `raw` satisfies every constraint, stopping at the first failure.
    pub fn satisfies(&self, raw: &str) -> bool {
        self.constraints.iter().all(|constraint| constraint.holds(raw))
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.has_predicate() {
            write!(f, "*")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int_literals() {
        assert!(Primitive::Int.accepts("100"));
        assert!(Primitive::Int.accepts("-4"));
        assert!(Primitive::Int.accepts("00015"));
        assert!(!Primitive::Int.accepts("1 0"));
        assert!(!Primitive::Int.accepts("10,"));
        assert!(!Primitive::Int.accepts(""));
        assert!(!Primitive::Int.accepts("99999999999999999999"));
    }

    #[test]
    fn str_literals() {
        assert!(Primitive::Str.accepts(""));
        assert!(Primitive::Str.accepts("anything at all"));
    }
}
