//! Bit-exact Level-1 topological trigger decision engine.
//!
//! Consumes ordered lists of trigger candidates (TOBs) per event and
//! produces per-algorithm decision bits, optionally together with the
//! accepted candidate pairs as composite objects:
//!
//! - **TOBs** ([`tob`]): integer-valued candidates with per-kind
//!   granularity, capacity-bounded input lists and a per-event composite
//!   arena.
//! - **Kinematics** ([`kinematics`]): fixed-point Δη, Δφ, ΔR² and
//!   invariant mass², reproducing the firmware arithmetic exactly.
//! - **Parameters** ([`params`]): named, optionally per-bit integer
//!   configuration, resolved once with strict validation.
//! - **Algorithms** ([`algorithm`], [`algorithms`]): the decision contract
//!   and the concrete Δη / ΔR² / disambiguation / invariant-mass /
//!   multiplicity / MET families.
//! - **Menus** ([`menu`]): a validated static graph of algorithm
//!   instances evaluated event by event, optionally in parallel.
//!
//! # Architecture
//!
//! Decision bits are computed from integer fields only. Floating-point
//! views exist for monitoring and never feed a decision. The crate emits
//! `tracing` events but installs no subscriber.

pub mod algorithm;
pub mod algorithms;
pub mod decision;
pub mod error;
pub mod kinematics;
pub mod menu;
pub mod params;
pub mod tob;

pub use decision::{Decision, MAX_DECISION_BITS};
pub use error::{TopoError, TopoResult};
pub use menu::{EventInputs, EventResult, MenuConfig, TopoMenu};
pub use tob::{GenericTob, TobArray, TobKind};
