//! Object counting above threshold.

use super::not_initialized;
use crate::algorithm::{passes_et, DecisionAlgorithm, ProcessContext};
use crate::error::{TopoError, TopoResult};
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct BitCut {
    min_et: u32,
    eta_max: u32,
    min_count: usize,
}

#[derive(Debug, Clone)]
struct Params {
    max_tob: usize,
    cuts: Vec<BitCut>,
}

/// Sets bit `i` when at least `MinCount[i]` of the leading `MaxTob`
/// objects have `Et > MinET[i]` and `|eta| <= EtaMax[i]`.
///
/// Decision-only: no composites are emitted. `MinCount = 0` would make
/// the bit unconditionally true and is rejected at initialization.
#[derive(Debug, Clone)]
pub struct Multiplicity {
    name: String,
    output_bits: usize,
    params: Option<Params>,
}

impl Multiplicity {
    pub const TYPE_NAME: &'static str = "Multiplicity";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            params: None,
        }
    }
}

impl DecisionAlgorithm for Multiplicity {
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
            .per_bit("MinET")
            .per_bit("EtaMax")
            .per_bit("MinCount")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;

        let max_tob = r.take_usize("MaxTob")?;
        let min_et = r.take_bits_u32("MinET", bits)?;
        let eta_max = r.take_bits_u32("EtaMax", bits)?;
        let min_count = r.take_bits_u32("MinCount", bits)?;
        r.finish()?;

        if let Some(bit) = min_count.iter().position(|&c| c == 0) {
            return Err(TopoError::InvalidParameter {
                algorithm: self.name.clone(),
                parameter: format!("MinCount[bit {bit}]"),
                value: 0,
                reason: "bit would always be set".into(),
            });
        }

        let cuts = (0..bits)
            .map(|i| BitCut {
                min_et: min_et[i],
                eta_max: eta_max[i],
                min_count: min_count[i] as usize,
            })
            .collect();

        debug!(algorithm = %self.name, max_tob, bits, "initialized");
        self.params = Some(Params { max_tob, cuts });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    fn max_composites(&self, _input_capacities: &[usize]) -> usize {
        0
    }

    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
        self.check_io(inputs, ctx)?;
        let p = self.params.as_ref().ok_or_else(|| not_initialized(&self.name))?;
        let leading = inputs[0].leading(p.max_tob);

        for (bit, cut) in p.cuts.iter().enumerate() {
            let count = leading
                .iter()
                .filter(|t| passes_et(t, cut.min_et) && t.eta().unsigned_abs() <= cut.eta_max)
                .count();
            if count >= cut.min_count {
                ctx.set_bit(bit);
            }
        }
        Ok(())
    }
}
