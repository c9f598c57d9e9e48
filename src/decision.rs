//! Fixed-width decision bit vector.

use crate::error::{TopoError, TopoResult};

/// Widest decision a single algorithm instance may produce.
pub const MAX_DECISION_BITS: usize = 64;

/// One bit per configured output of an algorithm instance.
///
/// Bits only ever go from `false` to `true` during an evaluation: there is
/// no way to clear a single bit, so the result is the union of every
/// accepted combination no matter in which order they were tested.
///
/// # Examples
///
/// ```
/// use l1topo_core::Decision;
///
/// let mut d = Decision::new(3).unwrap();
/// d.set_bit(1);
/// d.set_bit(1);
/// assert!(d.bit(1));
/// assert!(!d.bit(0));
/// assert_eq!(d.count(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    bits: u64,
    width: u8,
}

impl Decision {
    /// Creates an all-false decision of `width` bits.
    pub fn new(width: usize) -> TopoResult<Self> {
        if width == 0 || width > MAX_DECISION_BITS {
            return Err(TopoError::DecisionWidth {
                width,
                max: MAX_DECISION_BITS,
            });
        }
        Ok(Self {
            bits: 0,
            width: width as u8,
        })
    }

    /// Latches bit `index` to `true`.
    ///
    /// Returns `true` if the bit was newly set by this call.
    #[inline]
    pub fn set_bit(&mut self, index: usize) -> bool {
        debug_assert!(index < self.width(), "bit {index} outside width {}", self.width);
        if index >= self.width() {
            return false;
        }
        let mask = 1u64 << index;
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        index < self.width() && self.bits & (1u64 << index) != 0
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Raw bit pattern, bit `i` at position `i`.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn any(&self) -> bool {
        self.bits != 0
    }

    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates all bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width()).map(move |i| self.bit(i))
    }
}
