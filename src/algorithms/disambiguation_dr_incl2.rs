//! ΔR disambiguation between two lists.

use super::{not_initialized, pair_bound, resolve_eta_windows, resolve_windows, visited};
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

/// Accepts pairs with `DRCutMin < ΔR² <= DRCutMax`.
///
/// Parameters:
/// - `MaxTob1`, `MaxTob2`
/// - per bit: `MinET1`, `MinET2` (strict), `EtaMin1`, `EtaMax1`,
///   `EtaMin2`, `EtaMax2` (inclusive, on |eta| in each list's own units),
///   `DRCutMin`, `DRCutMax` (ΔR² scaled by 100)
///
/// The lower bound is strict: two objects at identical eta/phi are never
/// accepted, even with `DRCutMin = 0`. This is what separates the
/// disambiguation family from [`super::DeltaRSqrIncl2`].
#[derive(Debug, Clone)]
pub struct DisambiguationDRIncl2 {
    name: String,
    output_bits: usize,
    rounding: Rounding,
    params: Option<Params>,
}

impl DisambiguationDRIncl2 {
    pub const TYPE_NAME: &'static str = "DisambiguationDRIncl2";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            rounding: Rounding::default(),
            params: None,
        }
    }

    /// Rounding of the ΔR² accumulator; half-up unless set.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

impl DecisionAlgorithm for DisambiguationDRIncl2 {
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
            .per_bit("EtaMin1")
            .per_bit("EtaMax1")
            .per_bit("EtaMin2")
            .per_bit("EtaMax2")
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
        let eta1 = resolve_eta_windows(&mut r, "EtaMin1", "EtaMax1", bits)?;
        let eta2 = resolve_eta_windows(&mut r, "EtaMin2", "EtaMax2", bits)?;
        let windows = resolve_windows(&mut r, "DRCutMin", "DRCutMax", bits, WindowKind::StrictLower)?;
        r.finish()?;

        let cuts = (0..bits)
            .map(|i| PairCut {
                min_et1: min_et1[i],
                min_et2: min_et2[i],
                eta1: Some(eta1[i]),
                eta2: Some(eta2[i]),
                window: windows[i],
            })
            .collect();

        debug!(algorithm = %self.name, max_tob1, max_tob2, bits, rounding = ?self.rounding, "initialized");
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
    use crate::error::TopoError;

    fn params(dr_min: i64, dr_max: i64) -> ParameterSpace {
        ParameterSpace::new()
            .with_parameter("MaxTob1", 4)
            .with_parameter("MaxTob2", 4)
            .with_bit_parameters("MinET1", &[10])
            .with_bit_parameters("MinET2", &[10])
            .with_bit_parameters("EtaMin1", &[0])
            .with_bit_parameters("EtaMax1", &[49])
            .with_bit_parameters("EtaMin2", &[0])
            .with_bit_parameters("EtaMax2", &[49])
            .with_bit_parameters("DRCutMin", &[dr_min])
            .with_bit_parameters("DRCutMax", &[dr_max])
    }

    fn configured(dr_min: i64, dr_max: i64) -> DisambiguationDRIncl2 {
        let mut alg = DisambiguationDRIncl2::new("DisDR", 1);
        alg.initialize(&params(dr_min, dr_max)).unwrap();
        alg
    }

    #[test]
    fn test_separation_scenario() {
        // (10,5) and (10,35): dR2 = 900
        let a = array("A", &[jet(50, 10, 5)]);
        let b = array("B", &[jet(50, 10, 35)]);

        let narrow = run(&configured(0, 40), &[&a, &b]).unwrap();
        assert!(!narrow.decision.bit(0));
        assert!(narrow.outputs[0].is_empty());

        let wide = run(&configured(0, 3200), &[&a, &b]).unwrap();
        assert!(wide.decision.bit(0));
        assert_eq!(wide.outputs[0].len(), 1);
        assert_eq!(wide.arena.len(), 1);
    }

    #[test]
    fn test_upper_bound_inclusive() {
        let a = array("A", &[jet(50, 10, 5)]);
        let b = array("B", &[jet(50, 10, 35)]);
        assert!(run(&configured(0, 900), &[&a, &b]).unwrap().decision.bit(0));
        assert!(!run(&configured(0, 899), &[&a, &b]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_zero_separation_rejected() {
        let same = array("A", &[jet(50, 10, 5)]);
        let out = run(&configured(0, 3200), &[&same, &same]).unwrap();
        assert!(!out.decision.bit(0));
    }

    #[test]
    fn test_strict_lower_at_boundary() {
        let a = array("A", &[jet(50, 10, 5)]);
        let b = array("B", &[jet(50, 10, 35)]);
        assert!(!run(&configured(900, 3200), &[&a, &b]).unwrap().decision.bit(0));
        assert!(run(&configured(899, 3200), &[&a, &b]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_eta_window() {
        let mut space = params(0, 10_000);
        // replace the list-1 window by |eta| in [20, 49]
        space = ParameterSpace::from_iter(space.iter().cloned().map(|mut p| {
            if p.name == "EtaMin1" {
                p.value = 20;
            }
            p
        }));
        let mut alg = DisambiguationDRIncl2::new("DisDR", 1);
        alg.initialize(&space).unwrap();

        let central = array("A", &[jet(50, 10, 5)]);
        let forward = array("A", &[jet(50, -25, 5)]);
        let other = array("B", &[jet(50, 0, 20)]);
        assert!(!run(&alg, &[&central, &other]).unwrap().decision.bit(0));
        assert!(run(&alg, &[&forward, &other]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_single_input_refused() {
        let a = array("A", &[jet(50, 10, 5)]);
        assert!(matches!(
            run(&configured(0, 100), &[&a]),
            Err(TopoError::InputCount { .. })
        ));
    }
}
