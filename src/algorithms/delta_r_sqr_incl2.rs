//! Inclusive ΔR² between two lists.

use super::{not_initialized, pair_bound, resolve_windows, visited};
use crate::algorithm::{evaluate_pairs, DecisionAlgorithm, PairCut, ProcessContext, WindowKind};
use crate::error::TopoResult;
use crate::kinematics::{delta_r2_bw, Rounding};
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

#[derive(Debug, Clone)]
struct Params {
    max_tob1: usize,
    max_tob2: usize,
    cuts: Vec<PairCut>,
}

/// Accepts pairs with `DRCutMin <= ΔR² <= DRCutMax` (ΔR² scaled by 100).
///
/// Parameters: `MaxTob1`, `MaxTob2`; per bit `MinET1`, `MinET2`,
/// `DRCutMin`, `DRCutMax`.
#[derive(Debug, Clone)]
pub struct DeltaRSqrIncl2 {
    name: String,
    output_bits: usize,
    rounding: Rounding,
    params: Option<Params>,
}

impl DeltaRSqrIncl2 {
    pub const TYPE_NAME: &'static str = "DeltaRSqrIncl2";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            rounding: Rounding::default(),
            params: None,
        }
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

impl DecisionAlgorithm for DeltaRSqrIncl2 {
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
            .per_bit("DRCutMin")
            .per_bit("DRCutMax")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;

        let max_tob1 = r.take_usize("MaxTob1")?;
        let max_tob2 = r.take_usize("MaxTob2")?;
        let min_et1 = r.take_bits_u32("MinET1", bits)?;
        let min_et2 = r.take_bits_u32("MinET2", bits)?;
        let windows = resolve_windows(&mut r, "DRCutMin", "DRCutMax", bits, WindowKind::Inclusive)?;
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
        let rounding = self.rounding;

        evaluate_pairs(
            inputs[0].leading(p.max_tob1),
            inputs[1].leading(p.max_tob2),
            &p.cuts,
            |a, b| delta_r2_bw(a, b, rounding) as u64,
            ctx,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testutil::{array, jet, run};
    use crate::algorithms::DisambiguationDRIncl2;
    use crate::tob::{GenericTob, TobKind};

    fn configured(dr_min: i64, dr_max: i64) -> DeltaRSqrIncl2 {
        let mut alg = DeltaRSqrIncl2::new("DR", 1);
        alg.initialize(
            &ParameterSpace::new()
                .with_parameter("MaxTob1", 4)
                .with_parameter("MaxTob2", 4)
                .with_bit_parameters("MinET1", &[0])
                .with_bit_parameters("MinET2", &[0])
                .with_bit_parameters("DRCutMin", &[dr_min])
                .with_bit_parameters("DRCutMax", &[dr_max]),
        )
        .unwrap();
        alg
    }

    #[test]
    fn test_zero_separation_accepted() {
        let same = array("A", &[jet(50, 10, 5)]);
        let out = run(&configured(0, 100), &[&same, &same]).unwrap();
        assert!(out.decision.bit(0));
    }

    #[test]
    fn test_families_differ_only_at_lower_bound() {
        let same = array("A", &[jet(50, 10, 5)]);
        let mut disamb = DisambiguationDRIncl2::new("DisDR", 1);
        disamb
            .initialize(
                &ParameterSpace::new()
                    .with_parameter("MaxTob1", 4)
                    .with_parameter("MaxTob2", 4)
                    .with_bit_parameters("MinET1", &[0])
                    .with_bit_parameters("MinET2", &[0])
                    .with_bit_parameters("EtaMin1", &[0])
                    .with_bit_parameters("EtaMax1", &[49])
                    .with_bit_parameters("EtaMin2", &[0])
                    .with_bit_parameters("EtaMax2", &[49])
                    .with_bit_parameters("DRCutMin", &[0])
                    .with_bit_parameters("DRCutMax", &[100]),
            )
            .unwrap();

        assert!(run(&configured(0, 100), &[&same, &same]).unwrap().decision.bit(0));
        assert!(!run(&disamb, &[&same, &same]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_phi_wrap() {
        // phi 1 and 63 are 2 bins apart across the 2π seam
        let a = array("A", &[jet(50, 0, 1)]);
        let b = array("B", &[jet(50, 0, 63)]);
        assert!(run(&configured(4, 4), &[&a, &b]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_truncating_variant() {
        // 100 * (0.05² + 0.25²) = 6.5
        let a = GenericTob::new(TobKind::EmCluster, 50, 0, 0);
        let b = GenericTob::new(TobKind::EmCluster, 50, 2, 5);
        let la = array("A", &[a]);
        let lb = array("B", &[b]);

        let half_up = configured(7, 7);
        assert!(run(&half_up, &[&la, &lb]).unwrap().decision.bit(0));

        let mut trunc = DeltaRSqrIncl2::new("DR", 1).with_rounding(Rounding::Truncate);
        trunc
            .initialize(
                &ParameterSpace::new()
                    .with_parameter("MaxTob1", 1)
                    .with_parameter("MaxTob2", 1)
                    .with_bit_parameters("MinET1", &[0])
                    .with_bit_parameters("MinET2", &[0])
                    .with_bit_parameters("DRCutMin", &[7])
                    .with_bit_parameters("DRCutMax", &[7]),
            )
            .unwrap();
        assert!(!run(&trunc, &[&la, &lb]).unwrap().decision.bit(0));
    }
}
