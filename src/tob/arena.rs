//! Per-event storage for composite TOBs.
//!
//! Algorithms that accept a combination record it here instead of
//! allocating it individually. The orchestrator clears the arena at every
//! event boundary, so composites never outlive their event.

use super::array::TobArray;
use super::types::GenericTob;
use crate::error::TopoResult;

/// Index of a composite inside a [`CompositeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeId(u32);

impl CompositeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A passing pair of input TOBs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeTob {
    first: GenericTob,
    second: GenericTob,
    combined: GenericTob,
}

impl CompositeTob {
    /// Pairs two TOBs.
    ///
    /// The combined view has the saturating Et sum and the eta/phi (and
    /// resolution) of the higher-Et constituent; on a tie, `first` leads.
    pub fn new(first: GenericTob, second: GenericTob) -> Self {
        let lead = if second.et() > first.et() {
            &second
        } else {
            &first
        };
        let combined = GenericTob::composite(
            first.et().saturating_add(second.et()),
            lead.eta(),
            lead.phi(),
            lead.resolution(),
        );
        Self {
            first,
            second,
            combined,
        }
    }

    pub fn first(&self) -> &GenericTob {
        &self.first
    }

    pub fn second(&self) -> &GenericTob {
        &self.second
    }

    /// The pair as a single TOB for downstream algorithms.
    pub fn combined(&self) -> &GenericTob {
        &self.combined
    }
}

/// Bump-style arena, bulk-freed with [`CompositeArena::clear`].
///
/// One arena belongs to one worker; it is not shared between algorithm
/// instances running concurrently.
#[derive(Debug, Clone, Default)]
pub struct CompositeArena {
    composites: Vec<CompositeTob>,
}

impl CompositeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the arena for the worst case of a menu.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            composites: Vec::with_capacity(capacity),
        }
    }

    /// Stores the pair and returns its id.
    pub fn create(&mut self, first: &GenericTob, second: &GenericTob) -> CompositeId {
        let id = CompositeId(self.composites.len() as u32);
        self.composites.push(CompositeTob::new(*first, *second));
        id
    }

    pub fn get(&self, id: CompositeId) -> Option<&CompositeTob> {
        self.composites.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    /// Releases every composite of the current event.
    pub fn clear(&mut self) {
        self.composites.clear();
    }
}

/// The composites written to one output bit, in acceptance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArray {
    name: String,
    ids: Vec<CompositeId>,
}

impl OutputArray {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, id: CompositeId) {
        self.ids.push(id);
    }

    pub fn ids(&self) -> &[CompositeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Resolves the ids against the arena they were created in.
    pub fn resolve<'a>(
        &'a self,
        arena: &'a CompositeArena,
    ) -> impl Iterator<Item = &'a CompositeTob> + 'a {
        self.ids.iter().filter_map(move |&id| arena.get(id))
    }

    /// Materializes the combined TOBs as an input list for a later stage.
    pub fn to_tob_array(&self, arena: &CompositeArena) -> TopoResult<TobArray> {
        TobArray::from_tobs(
            self.name.clone(),
            self.ids.len(),
            self.resolve(arena).map(|c| *c.combined()),
        )
    }
}
