//! Inclusive invariant-mass window between two lists.

use super::{not_initialized, pair_bound, resolve_windows, visited};
use crate::algorithm::{evaluate_pairs, DecisionAlgorithm, PairCut, ProcessContext, WindowKind};
use crate::error::TopoResult;
use crate::kinematics::inv_mass2_bw;
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

#[derive(Debug, Clone)]
struct Params {
    max_tob1: usize,
    max_tob2: usize,
    cuts: Vec<PairCut>,
}

/// Accepts pairs with `MinMSqr <= M² <= MaxMSqr`, M² in Et counts².
///
/// Parameters: `MaxTob1`, `MaxTob2`; per bit `MinET1`, `MinET2`,
/// `MinMSqr`, `MaxMSqr`.
///
/// A pair containing a zero-Et object has M² = 0 by construction. Mass
/// windows take the full `u64` range.
#[derive(Debug, Clone)]
pub struct InvariantMassInclusive2 {
    name: String,
    output_bits: usize,
    params: Option<Params>,
}

impl InvariantMassInclusive2 {
    pub const TYPE_NAME: &'static str = "InvariantMassInclusive2";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            params: None,
        }
    }
}

impl DecisionAlgorithm for InvariantMassInclusive2 {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn input_count(&self) -> usize {
        2
    }

    fn output_bits(&self) -> usize {
        self.output_bits
    }

    fn parameter_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .global("MaxTob1")
            .global("MaxTob2")
            .per_bit("MinET1")
            .per_bit("MinET2")
            .per_bit("MinMSqr")
            .per_bit("MaxMSqr")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;

        let max_tob1 = r.take_usize("MaxTob1")?;
        let max_tob2 = r.take_usize("MaxTob2")?;
        let min_et1 = r.take_bits_u32("MinET1", bits)?;
        let min_et2 = r.take_bits_u32("MinET2", bits)?;
        let windows = resolve_windows(&mut r, "MinMSqr", "MaxMSqr", bits, WindowKind::Inclusive)?;
        r.finish()?;

        let cuts = (0..bits)
            .map(|i| PairCut {
                min_et1: min_et1[i],
                min_et2: min_et2[i],
                eta1: None,
                eta2: None,
                window: windows[i],
            })
            .collect();

        debug!(algorithm = %self.name, max_tob1, max_tob2, bits, "initialized");
        self.params = Some(Params {
            max_tob1,
            max_tob2,
            cuts,
        });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    fn max_composites(&self, input_capacities: &[usize]) -> usize {
        self.params.as_ref().map_or(0, |p| {
            pair_bound(
                self.output_bits,
                visited(p.max_tob1, input_capacities, 0),
                visited(p.max_tob2, input_capacities, 1),
            )
        })
    }

    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
        self.check_io(inputs, ctx)?;
        let p = self.params.as_ref().ok_or_else(|| not_initialized(&self.name))?;

        evaluate_pairs(
            inputs[0].leading(p.max_tob1),
            inputs[1].leading(p.max_tob2),
            &p.cuts,
            inv_mass2_bw,
            ctx,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testutil::{array, jet, run};

    fn configured(windows: &[(i64, i64)]) -> InvariantMassInclusive2 {
        let bits = windows.len();
        let mins: Vec<i64> = windows.iter().map(|w| w.0).collect();
        let maxs: Vec<i64> = windows.iter().map(|w| w.1).collect();
        let mut alg = InvariantMassInclusive2::new("InvM", bits);
        alg.initialize(
            &ParameterSpace::new()
                .with_parameter("MaxTob1", 2)
                .with_parameter("MaxTob2", 2)
                .with_bit_parameters("MinET1", &vec![0; bits])
                .with_bit_parameters("MinET2", &vec![0; bits])
                .with_bit_parameters("MinMSqr", &mins)
                .with_bit_parameters("MaxMSqr", &maxs),
        )
        .unwrap();
        alg
    }

    #[test]
    fn test_back_to_back_mass() {
        // 2 * 10 * 20 * (cosh 0 - cos pi) = 800
        let a = array("A", &[jet(10, 0, 0)]);
        let b = array("B", &[jet(20, 0, 32)]);
        let alg = configured(&[(800, 800), (0, 799), (801, 10_000)]);
        let out = run(&alg, &[&a, &b]).unwrap();
        assert!(out.decision.bit(0));
        assert!(!out.decision.bit(1));
        assert!(!out.decision.bit(2));
    }

    #[test]
    fn test_mass_window_beyond_u32() {
        // 4 * 60000^2 = 14_400_000_000
        let a = array("A", &[jet(60_000, 0, 0)]);
        let b = array("B", &[jet(60_000, 0, 32)]);
        let alg = configured(&[(10_000_000_000, 20_000_000_000), (0, u32::MAX as i64)]);
        let out = run(&alg, &[&a, &b]).unwrap();
        assert!(out.decision.bit(0));
        assert!(!out.decision.bit(1));
    }

    #[test]
    fn test_collinear_pair_is_massless() {
        let a = array("A", &[jet(10, 4, 4)]);
        let alg = configured(&[(0, 0)]);
        assert!(run(&alg, &[&a, &a]).unwrap().decision.bit(0));
    }
}
