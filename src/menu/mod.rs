//! Trigger menus: a static graph of algorithm instances.
//!
//! A [`MenuConfig`] names the event inputs and the algorithm instances in
//! evaluation order. [`TopoMenu::build`] resolves it against an
//! [`AlgorithmRegistry`](crate::algorithm::AlgorithmRegistry) once;
//! afterwards [`TopoMenu::evaluate`] runs every instance on one event,
//! feeding composite outputs to the instances that consume them.

mod config;
mod runner;

pub use config::{AlgorithmConfig, InputDecl, MenuConfig};
pub use runner::{EventInputs, EventResult, InstanceResult, TopoMenu, ARENA_PRESIZE_LIMIT};
