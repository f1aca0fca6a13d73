use std::{
    collections::BTreeMap,
    fmt::{
        self,
        Debug,
        Formatter,
    },
    rc::Rc,
};

use crate::{
    common::error::Error,
    types::{
        descriptor::Descriptor,
        universe::{
            Key,
            TypeId,
            Universe,
        },
    },
};

/// An opaque boolean test over raw text.
/// Closures can't be compared, so every predicate carries a key:
/// two predicates with the same key are treated as the same predicate
/// when refinements are interned.
#[derive(Clone)]
pub struct Predicate {
    key: String,
    test: Rc<dyn Fn(&str) -> bool>,
}

impl Predicate {
    pub fn new(key: &str, test: impl Fn(&str) -> bool + 'static) -> Predicate {
        Predicate {
            key: key.to_string(),
            test: Rc::new(test),
        }
    }

    /// Accepts exactly `text`.
    pub fn equals(text: &str) -> Predicate {
        let expected = text.to_string();
        Predicate::new(&format!("equals={}", text), move |raw| raw == expected)
    }

    /// Accepts anything containing `text`.
    pub fn contains(text: &str) -> Predicate {
        let needle = text.to_string();
        Predicate::new(&format!("contains={}", text), move |raw| raw.contains(&needle))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn test(&self, raw: &str) -> bool {
        (self.test)(raw)
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.key)
    }
}

/// A single condition a refined type imposes on raw text.
#[derive(Debug, Clone)]
pub enum Constraint {
    Predicate(Predicate),
    /// The raw text is exactly this many characters long.
    SizeEq(usize),
    /// The raw text never contains the terminator,
    /// so a parser slot of this type stops right before it.
    EndsOn(char),
}

/// The comparable part of a `Constraint`, used for interning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintKey {
    Predicate(String),
    SizeEq(usize),
    EndsOn(char),
}

impl Constraint {
    pub fn holds(&self, raw: &str) -> bool {
        match self {
            Constraint::Predicate(predicate) => predicate.test(raw),
            Constraint::SizeEq(size) => raw.chars().count() == *size,
            Constraint::EndsOn(end) => !raw.contains(*end),
        }
    }

    pub fn key(&self) -> ConstraintKey {
        match self {
            Constraint::Predicate(p) => ConstraintKey::Predicate(p.key.clone()),
            Constraint::SizeEq(size) => ConstraintKey::SizeEq(*size),
            Constraint::EndsOn(end) => ConstraintKey::EndsOn(*end),
        }
    }
}

/// The constraints passed to [`Universe::refine`].
/// ```
/// use ktypes::{Predicate, Refinement};
///
/// let refinement = Refinement::new()
///     .predicate(Predicate::contains("hello"))
///     .ends_on(' ');
/// assert!(!refinement.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Refinement {
    predicate: Option<Predicate>,
    size_eq: Option<usize>,
    ends_on: Option<char>,
}

impl Refinement {
    pub fn new() -> Refinement {
        Refinement::default()
    }

    pub fn predicate(mut self, predicate: Predicate) -> Refinement {
        self.predicate = Some(predicate);
        self
    }

    pub fn size_eq(mut self, size: usize) -> Refinement {
        self.size_eq = Some(size);
        self
    }

    pub fn ends_on(mut self, end: char) -> Refinement {
        self.ends_on = Some(end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_none() && self.size_eq.is_none() && self.ends_on.is_none()
    }

    /// Constraints in a fixed order: predicate, size, terminator.
    fn constraints(self) -> Vec<Constraint> {
        let mut constraints = vec![];
        if let Some(predicate) = self.predicate {
            constraints.push(Constraint::Predicate(predicate));
        }
        if let Some(size) = self.size_eq {
            constraints.push(Constraint::SizeEq(size));
        }
        if let Some(end) = self.ends_on {
            constraints.push(Constraint::EndsOn(end));
        }
        constraints
    }
}

impl Universe {
    /// Narrows a primitive type by a refinement.
    /// Refining with no constraints returns `base` unchanged.
    /// Refining an already refined type keeps its constraints
    /// and adds the new ones that aren't already present.
    /// The result is interned on the primitive and the sorted set of constraint keys,
    /// so the same constraints return the same `TypeId` whatever order they were applied in.
    ///
    /// Only primitive types can be refined;
    /// anything else is a schema error and is always returned as `Err`.
    pub fn refine(&mut self, base: TypeId, refinement: Refinement) -> Result<TypeId, Error> {
        if refinement.is_empty() {
            return Ok(base);
        }

        let descriptor = self.get(base);
        let primitive = descriptor.primitive().ok_or_else(|| Error::InvalidArgument {
            expected: "a primitive type to refine".to_string(),
            got: format!("<{}>", descriptor),
        })?;

        let mut keyed: BTreeMap<ConstraintKey, Constraint> = descriptor
            .constraints()
            .iter()
            .map(|constraint| (constraint.key(), constraint.clone()))
            .collect();
        for constraint in refinement.constraints() {
            keyed.entry(constraint.key()).or_insert(constraint);
        }
        let (keys, constraints): (Vec<_>, Vec<_>) = keyed.into_iter().unzip();

        let key = Key::Refined(primitive, keys);
        if let Some(existing) = self.find(&key) {
            return Ok(existing);
        }

        log::debug!("interning refinement of {} by {:?}", primitive.name(), key);
        Ok(self.register(Descriptor::refined(primitive, constraints), key))
    }
}
