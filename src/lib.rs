//! # KTypes
//! A runtime type algebra: a registry of structural types,
//! refined by predicates, combined into sums and records,
//! and used to typecheck curried functions.
//! Alongside it lives a schema-driven incremental parser
//! that turns raw character streams into typed records.
//!
//! ## Declaring types
//! Every type lives inside a [`Universe`], which owns and interns them.
//! Types are referred to by [`TypeId`] handles,
//! so two structurally identical declarations compare equal by id:
//!
//! ```
//! use ktypes::{Refinement, Universe};
//!
//! let mut universe = Universe::new();
//! let int = universe.int();
//! let five = universe.refine(int, Refinement::new().size_eq(5)).unwrap();
//! assert_eq!(five, universe.refine(int, Refinement::new().size_eq(5)).unwrap());
//!
//! let str = universe.str();
//! let either = universe.union(int, str);
//! assert_eq!(either, universe.union(str, int));
//! ```
//!
//! ## Parsing
//! A format string names the fields of a product type between markers:
//!
//! ```
//! use ktypes::{Refinement, Universe};
//!
//! let mut universe = Universe::new();
//! let int = universe.int();
//! let line = universe.refine(universe.str(), Refinement::new().ends_on('\n')).unwrap();
//! let pair = universe.product(vec![("id", int), ("name", line)]).unwrap();
//!
//! let parser = universe.parser(pair, "$id$,$name$\n").unwrap();
//! let record = parser.parse_one(&universe, "12,bob\n").unwrap();
//! assert_eq!(record.field("id").and_then(|t| t.as_int()), Some(12));
//! ```
//!
//! ## Overview
//! - `common`: tokens, runtime data, errors and session configuration.
//! - `types`: the universe, refinement, sums, products and token arithmetic.
//! - `function`: curried functions, sum-domain combination and product induction.
//! - `parser`: format compilation and the streaming matcher.

pub mod common;
pub mod function;
pub mod parser;
pub mod types;

pub use common::{
    config::{
        Config,
        Policy,
    },
    data::{
        Data,
        Side,
    },
    error::Error,
    token::{
        Raw,
        Token,
    },
};
pub use function::lambda::Lambda;
pub use parser::{Fragment, Parser};
pub use types::{
    descriptor::{
        Descriptor,
        Kind,
        Primitive,
    },
    ops::BinOp,
    refine::{
        Constraint,
        Predicate,
        Refinement,
    },
    universe::{
        TypeId,
        Universe,
    },
};
