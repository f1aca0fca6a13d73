//! The type registry and the algebra built on top of it.
//!
//! Every type is owned by a [`universe::Universe`] and referred to by a
//! [`universe::TypeId`]. Each module below adds one group of operations
//! to the universe:
//!
//! - `refine`: predicate refinement of primitive types.
//! - `sum`: coproducts, membership and narrowing of injected tokens.
//! - `product`: records.
//! - `ops`: arithmetic on primitive tokens.

pub mod descriptor;
pub mod ops;
pub mod product;
pub mod refine;
pub mod sum;
pub mod universe;
