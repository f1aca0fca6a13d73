use std::collections::BTreeSet;

use crate::{
    common::{
        data::{
            Data,
            Side,
        },
        error::Error,
        token::Token,
    },
    types::{
        descriptor::{
            Descriptor,
            Kind,
        },
        universe::{
            Key,
            TypeId,
            Universe,
        },
    },
};

impl Universe {
    /// The leaf (non-sum) types of a type.
    /// A non-sum type is its own single leaf.
    pub fn leaves(&self, id: TypeId) -> BTreeSet<TypeId> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(id, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: TypeId, leaves: &mut BTreeSet<TypeId>) {
        match self.get(id).kind() {
            Kind::Sum { left, right } => {
                self.collect_leaves(*left, leaves);
                self.collect_leaves(*right, leaves);
            },
            _ => {
                leaves.insert(id);
            },
        }
    }

    pub fn is_sum(&self, id: TypeId) -> bool {
        matches!(self.get(id).kind(), Kind::Sum { .. })
    }

    /// The sum of two types.
    /// Sums are identified by their set of leaves,
    /// so `a | b`, `b | a` and `(a | b) | a` are all the same type.
    /// Duplicate leaves collapse: a union with a single distinct leaf
    /// is that leaf itself.
    pub fn union(&mut self, a: TypeId, b: TypeId) -> TypeId {
        self.lookup_or_create_sum(a, b)
    }

    pub fn lookup_or_create_sum(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let mut leaves = self.leaves(a);
        leaves.extend(self.leaves(b));

        if leaves.len() == 1 {
            return a;
        }

        let key = Key::Sum(leaves);
        if let Some(existing) = self.find(&key) {
            return existing;
        }

        let name = format!("{} | {}", self.get(a), self.get(b));
        log::debug!("interning sum type {}", name);
        self.register(Descriptor::new(name, Kind::Sum { left: a, right: b }), key)
    }

    /// Tries the left branch, then the right.
    pub(crate) fn construct_sum(
        &self,
        id: TypeId,
        (left, right): (TypeId, TypeId),
        raw: &str,
    ) -> Result<Token, Error> {
        let (side, branch) = if self.matches(left, raw) {
            (Side::Inl, left)
        } else if self.matches(right, raw) {
            (Side::Inr, right)
        } else {
            return self.take(Error::TypeMismatch {
                expected: self.name(id),
                got: format!("{:?}", raw),
            });
        };

        let inner = self.construct(branch, raw)?;
        Ok(Token::new(Data::Injection(side, Box::new(inner)), id))
    }

    /// Views a token as a token of `ty`, if it is one.
    ///
    /// A token is of its own type. An injected token is also of any type
    /// one of its inner tokens is; in that case the inner token is returned.
    /// Failing that, an injected token is of any sum containing its leaf type,
    /// and its leaf is injected again through that sum.
    pub fn narrow(&self, token: &Token, ty: TypeId) -> Option<Token> {
        if token.ty() == ty {
            return Some(token.clone());
        }

        if let Data::Injection(_, inner) = token.data() {
            if let Some(narrowed) = self.narrow(inner, ty) {
                return Some(narrowed);
            }
            return self.inject(token.leaf(), ty);
        }

        None
    }

    /// Wraps a leaf token in the injections leading to it from `ty`,
    /// taking the left branch when both contain it.
    fn inject(&self, leaf: &Token, ty: TypeId) -> Option<Token> {
        if leaf.ty() == ty {
            return Some(leaf.clone());
        }

        let (left, right) = match self.get(ty).kind() {
            Kind::Sum { left, right } => (*left, *right),
            _ => return None,
        };
        let (side, branch) = if self.leaves(left).contains(&leaf.ty()) {
            (Side::Inl, left)
        } else if self.leaves(right).contains(&leaf.ty()) {
            (Side::Inr, right)
        } else {
            return None;
        };

        let inner = self.inject(leaf, branch)?;
        Some(Token::new(Data::Injection(side, Box::new(inner)), ty))
    }

    pub fn is_a(&self, token: &Token, ty: TypeId) -> bool {
        self.narrow(token, ty).is_some()
    }
}
