//! Comparison primitives shared by the algorithm family.
//!
//! Plain inclusive algorithms accept `min <= x <= max`; the
//! disambiguation family accepts `min < x <= max`. The two are separate
//! [`WindowKind`]s and must not be unified.

use crate::tob::GenericTob;

/// Boundary semantics of a [`Window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// `min <= x <= max`
    Inclusive,
    /// `min < x <= max`
    StrictLower,
}

/// A closed or half-open range on an integer hardware quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub min: u64,
    pub max: u64,
    pub kind: WindowKind,
}

impl Window {
    pub const fn inclusive(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            kind: WindowKind::Inclusive,
        }
    }

    pub const fn strict_lower(min: u64, max: u64) -> Self {
        Self {
            min,
            max,
            kind: WindowKind::StrictLower,
        }
    }

    #[inline]
    pub fn contains(&self, x: u64) -> bool {
        let above = match self.kind {
            WindowKind::Inclusive => x >= self.min,
            WindowKind::StrictLower => x > self.min,
        };
        above && x <= self.max
    }
}

/// Inclusive window on |eta| in the TOB's own eta units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaWindow {
    pub min: u32,
    pub max: u32,
}

impl EtaWindow {
    #[inline]
    pub fn contains(&self, eta: i32) -> bool {
        let abs = eta.unsigned_abs();
        abs >= self.min && abs <= self.max
    }
}

/// Hardware Et threshold: a TOB passes only strictly above `min_et`.
#[inline]
pub fn passes_et(tob: &GenericTob, min_et: u32) -> bool {
    tob.et() > min_et
}

/// The selection of one output bit of a two-object algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCut {
    pub min_et1: u32,
    pub min_et2: u32,
    pub eta1: Option<EtaWindow>,
    pub eta2: Option<EtaWindow>,
    pub window: Window,
}

impl PairCut {
    #[inline]
    pub fn accepts_first(&self, tob: &GenericTob) -> bool {
        passes_et(tob, self.min_et1) && self.eta1.is_none_or(|w| w.contains(tob.eta()))
    }

    #[inline]
    pub fn accepts_second(&self, tob: &GenericTob) -> bool {
        passes_et(tob, self.min_et2) && self.eta2.is_none_or(|w| w.contains(tob.eta()))
    }

    /// Object cuts on both TOBs, then the window on the pair quantity.
    #[inline]
    pub fn accepts(&self, first: &GenericTob, second: &GenericTob, quantity: u64) -> bool {
        self.accepts_first(first) && self.accepts_second(second) && self.window.contains(quantity)
    }
}
