//! Ordered, capacity-bounded TOB lists.

use super::types::GenericTob;
use crate::error::{TopoError, TopoResult};

/// An ordered sequence of [`GenericTob`] with a hard capacity.
///
/// The order is whatever the upstream stage produced (typically
/// descending Et) and is never changed here. Algorithms look at it only
/// through [`TobArray::leading`], which reproduces the hardware's fixed
/// number of comparator slots.
///
/// # Examples
///
/// ```
/// use l1topo_core::tob::{GenericTob, TobArray, TobKind};
///
/// let mut jets = TobArray::new("Jets", 4);
/// jets.push(GenericTob::new(TobKind::Jet, 500, 3, 10)).unwrap();
/// jets.push(GenericTob::new(TobKind::Jet, 300, -8, 40)).unwrap();
///
/// assert_eq!(jets.leading(6).len(), 2);
/// assert_eq!(jets.leading(1)[0].et(), 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TobArray {
    name: String,
    capacity: usize,
    tobs: Vec<GenericTob>,
}

impl TobArray {
    /// Creates an empty array.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            tobs: Vec::with_capacity(capacity),
        }
    }

    /// Builds an array from an already ordered sequence.
    pub fn from_tobs<I>(name: impl Into<String>, capacity: usize, tobs: I) -> TopoResult<Self>
    where
        I: IntoIterator<Item = GenericTob>,
    {
        let mut array = Self::new(name, capacity);
        for tob in tobs {
            array.push(tob)?;
        }
        Ok(array)
    }

    /// Appends a candidate, failing once the capacity is reached.
    pub fn push(&mut self, tob: GenericTob) -> TopoResult<()> {
        if self.tobs.len() >= self.capacity {
            return Err(TopoError::CapacityExceeded {
                array: self.name.clone(),
                capacity: self.capacity,
            });
        }
        self.tobs.push(tob);
        Ok(())
    }

    /// The first `min(n, len)` candidates in array order.
    #[inline]
    pub fn leading(&self, n: usize) -> &[GenericTob] {
        &self.tobs[..n.min(self.tobs.len())]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.tobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenericTob> {
        self.tobs.iter()
    }

    pub fn as_slice(&self) -> &[GenericTob] {
        &self.tobs
    }

    /// Drops all candidates, keeping name and capacity.
    pub fn clear(&mut self) {
        self.tobs.clear();
    }
}

impl<'a> IntoIterator for &'a TobArray {
    type Item = &'a GenericTob;
    type IntoIter = std::slice::Iter<'a, GenericTob>;

    fn into_iter(self) -> Self::IntoIter {
        self.tobs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tob::TobKind;
    use proptest::prelude::*;

    fn jet(et: u32) -> GenericTob {
        GenericTob::new(TobKind::Jet, et, 0, 0)
    }

    #[test]
    fn test_capacity_enforced() {
        let mut arr = TobArray::new("Jets", 2);
        assert!(arr.push(jet(3)).is_ok());
        assert!(arr.push(jet(2)).is_ok());
        let err = arr.push(jet(1)).unwrap_err();
        assert_eq!(
            err,
            TopoError::CapacityExceeded {
                array: "Jets".into(),
                capacity: 2
            }
        );
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn test_order_preserved() {
        let arr = TobArray::from_tobs("Jets", 4, [jet(5), jet(9), jet(1)]).unwrap();
        let ets: Vec<u32> = arr.iter().map(|t| t.et()).collect();
        assert_eq!(ets, vec![5, 9, 1]);
    }

    #[test]
    fn test_leading_on_empty() {
        let arr = TobArray::new("Empty", 8);
        assert!(arr.leading(3).is_empty());
        assert!(arr.is_empty());
    }

    proptest! {
        #[test]
        fn prop_leading_never_over_reads(len in 0usize..12, n in 0usize..20) {
            let arr = TobArray::from_tobs("A", 12, (0..len).map(|i| jet(i as u32))).unwrap();
            let view = arr.leading(n);
            prop_assert_eq!(view.len(), n.min(len));
            for (i, tob) in view.iter().enumerate() {
                prop_assert_eq!(tob.et(), i as u32);
            }
        }
    }
}
