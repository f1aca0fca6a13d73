//! Curried functions over registered types.
//! A function is a [`lambda::Lambda`] with an explicit signature,
//! wrapped in a [`closure::Closure`] token that collects arguments
//! until the last one arrives and the body runs.

pub mod closure;
pub mod combine;
pub mod lambda;
