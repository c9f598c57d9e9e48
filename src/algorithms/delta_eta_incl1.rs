//! Inclusive Δη within one list.

use super::{not_initialized, resolve_windows, unique_pair_bound, visited};
use crate::algorithm::{
    evaluate_unique_pairs, DecisionAlgorithm, PairCut, ProcessContext, WindowKind,
};
use crate::error::TopoResult;
use crate::kinematics::delta_eta_bw;
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

#[derive(Debug, Clone)]
struct Params {
    max_tob: usize,
    cuts: Vec<PairCut>,
}

/// Single-list variant of [`super::DeltaEtaIncl2`].
///
/// Visits each unordered pair `(i, j)` with `i < j` among the leading
/// `MaxTob` objects, so an object is never paired with itself and each
/// pair is seen once. `MinET1` applies to the earlier (higher-priority)
/// object, `MinET2` to the later one.
///
/// Parameters: `MaxTob`; per bit `MinET1`, `MinET2`, `MinDeltaEta`,
/// `MaxDeltaEta`.
#[derive(Debug, Clone)]
pub struct DeltaEtaIncl1 {
    name: String,
    output_bits: usize,
    params: Option<Params>,
}

impl DeltaEtaIncl1 {
    pub const TYPE_NAME: &'static str = "DeltaEtaIncl1";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            params: None,
        }
    }
}

impl DecisionAlgorithm for DeltaEtaIncl1 {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn input_count(&self) -> usize {
        1
    }

    fn output_bits(&self) -> usize {
        self.output_bits
    }

    fn parameter_schema(&self) -> ParameterSchema {
        ParameterSchema::new()
            .global("MaxTob")
            .per_bit("MinET1")
            .per_bit("MinET2")
            .per_bit("MinDeltaEta")
            .per_bit("MaxDeltaEta")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;

        let max_tob = r.take_usize("MaxTob")?;
        let min_et1 = r.take_bits_u32("MinET1", bits)?;
        let min_et2 = r.take_bits_u32("MinET2", bits)?;
        let windows = resolve_windows(
            &mut r,
            "MinDeltaEta",
            "MaxDeltaEta",
            bits,
            WindowKind::Inclusive,
        )?;
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

        debug!(algorithm = %self.name, max_tob, bits, "initialized");
        self.params = Some(Params { max_tob, cuts });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    fn max_composites(&self, input_capacities: &[usize]) -> usize {
        self.params.as_ref().map_or(0, |p| {
            unique_pair_bound(self.output_bits, visited(p.max_tob, input_capacities, 0))
        })
    }

    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
        self.check_io(inputs, ctx)?;
        let p = self.params.as_ref().ok_or_else(|| not_initialized(&self.name))?;

        evaluate_unique_pairs(
            inputs[0].leading(p.max_tob),
            &p.cuts,
            |a, b| delta_eta_bw(a, b) as u64,
            ctx,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testutil::{array, jet, run};

    fn configured(max_tob: i64, min_deta: i64, max_deta: i64) -> DeltaEtaIncl1 {
        let mut alg = DeltaEtaIncl1::new("DEta1", 1);
        alg.initialize(
            &ParameterSpace::new()
                .with_parameter("MaxTob", max_tob)
                .with_bit_parameters("MinET1", &[20])
                .with_bit_parameters("MinET2", &[10])
                .with_bit_parameters("MinDeltaEta", &[min_deta])
                .with_bit_parameters("MaxDeltaEta", &[max_deta]),
        )
        .unwrap();
        alg
    }

    #[test]
    fn test_no_self_pairs() {
        let alg = configured(4, 0, 0);
        let single = array("J", &[jet(50, 5, 0)]);
        assert!(!run(&alg, &[&single]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_each_pair_once() {
        let alg = configured(4, 0, 100);
        let list = array("J", &[jet(50, 0, 0), jet(40, 1, 0), jet(30, 2, 0)]);
        let out = run(&alg, &[&list]).unwrap();
        assert_eq!(out.outputs[0].len(), 3);
        assert_eq!(alg.max_composites(&[]), 6);
    }

    #[test]
    fn test_thresholds_by_position() {
        // leading object passes MinET2 but not MinET1
        let alg = configured(4, 0, 100);
        let list = array("J", &[jet(15, 0, 0), jet(15, 1, 0)]);
        assert!(!run(&alg, &[&list]).unwrap().decision.bit(0));
    }

    #[test]
    fn test_bounded_by_max_tob() {
        let alg = configured(2, 10, 10);
        let list = array("J", &[jet(50, 0, 0), jet(40, 1, 0), jet(30, 10, 0)]);
        assert!(!run(&alg, &[&list]).unwrap().decision.bit(0));
        let wider = configured(3, 10, 10);
        assert!(run(&wider, &[&list]).unwrap().decision.bit(0));
    }
}
