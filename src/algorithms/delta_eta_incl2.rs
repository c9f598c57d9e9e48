//! Inclusive Δη between two lists.

use super::{not_initialized, pair_bound, resolve_windows, visited};
use crate::algorithm::{evaluate_pairs, DecisionAlgorithm, PairCut, ProcessContext, WindowKind};
use crate::error::TopoResult;
use crate::kinematics::delta_eta_bw;
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

#[derive(Debug, Clone)]
struct Params {
    max_tob1: usize,
    max_tob2: usize,
    cuts: Vec<PairCut>,
}

/// Accepts pairs whose |Δη| lies in `[MinDeltaEta, MaxDeltaEta]`.
///
/// Parameters:
/// - `MaxTob1`, `MaxTob2`: leading objects visited in each list
/// - per bit: `MinET1`, `MinET2` (strict), `MinDeltaEta`, `MaxDeltaEta`
///
/// Δη is in the common eta units of the two lists. Both bounds are
/// inclusive, so `MinDeltaEta = 0` accepts a TOB paired with itself when
/// both inputs are the same list.
#[derive(Debug, Clone)]
pub struct DeltaEtaIncl2 {
    name: String,
    output_bits: usize,
    params: Option<Params>,
}

impl DeltaEtaIncl2 {
    pub const TYPE_NAME: &'static str = "DeltaEtaIncl2";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            params: None,
        }
    }
}

impl DecisionAlgorithm for DeltaEtaIncl2 {
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
            .per_bit("MinDeltaEta")
            .per_bit("MaxDeltaEta")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;

        let max_tob1 = r.take_usize("MaxTob1")?;
        let max_tob2 = r.take_usize("MaxTob2")?;
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
            |a, b| delta_eta_bw(a, b) as u64,
            ctx,
        );
        Ok(())
    }
}
