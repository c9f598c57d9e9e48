//! Per-algorithm parameter store.
//!
//! A [`ParameterSpace`] holds the configured values of one algorithm
//! instance. The algorithm declares what it reads in a
//! [`ParameterSchema`], and a [`ParameterResolver`] hands the values out
//! during initialization, exactly once each. Anything missing, unknown or
//! left unread is a fatal configuration error.

mod resolver;
mod space;

pub use resolver::ParameterResolver;
pub use space::{Parameter, ParameterDecl, ParameterSchema, ParameterScope, ParameterSpace};
