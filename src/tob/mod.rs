//! Trigger Object Blocks and their containers.
//!
//! - [`GenericTob`]: the kind-erased candidate every algorithm consumes.
//! - [`sources`]: the kind-specific upstream shapes and their conversions.
//! - [`TobArray`]: an ordered, capacity-bounded input list.
//! - [`CompositeArena`] / [`OutputArray`]: per-event storage for accepted
//!   pairs, cleared at every event boundary.

mod arena;
mod array;
pub mod sources;
mod types;

pub use arena::{CompositeArena, CompositeId, CompositeTob, OutputArray};
pub use array::TobArray;
pub use sources::{ClusterKind, ClusterTob, JetTob, MetTob, MuonTiming, MuonTob};
pub use types::{GenericTob, MetComponents, MuonFlags, TobKind, TobResolution};
