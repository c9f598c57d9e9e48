//! Abstract decision-algorithm contract and dispatch.
//!
//! - [`DecisionAlgorithm`]: initialize once from a parameter store,
//!   then `process` one event at a time.
//! - [`ProcessContext`]: the decision, output arrays and composite arena
//!   an algorithm writes into.
//! - [`cuts`]: window and threshold primitives, including the strict vs.
//!   inclusive lower-bound distinction between algorithm families.
//! - [`AlgorithmRegistry`] / [`AnyAlgorithm`]: type-name lookup resolved
//!   to a concrete variant at menu-load time.

pub mod cuts;
mod registry;
mod types;

pub use cuts::{passes_et, EtaWindow, PairCut, Window, WindowKind};
pub use registry::{AlgorithmRegistry, AnyAlgorithm, Constructor};
pub use types::{evaluate_pairs, evaluate_unique_pairs, DecisionAlgorithm, ProcessContext};
