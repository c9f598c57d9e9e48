//! Missing-transverse-energy threshold.

use super::not_initialized;
use crate::algorithm::{DecisionAlgorithm, ProcessContext};
use crate::error::TopoResult;
use crate::params::{ParameterResolver, ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use tracing::debug;

/// Sets bit `i` when the leading MET object has `|MET| > MinXE[i]`.
///
/// The comparison is `ex² + ey² > MinXE²` in 64-bit integers, so it
/// needs no square root and never rounds. An object without vector
/// components falls back to `Et²`. An empty input leaves every bit
/// false, as does a zero-magnitude vector.
#[derive(Debug, Clone)]
pub struct MetCut {
    name: String,
    output_bits: usize,
    /// `MinXE²` per bit.
    thresholds2: Option<Vec<i64>>,
}

impl MetCut {
    pub const TYPE_NAME: &'static str = "MetCut";

    pub fn new(name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            name: name.into(),
            output_bits,
            thresholds2: None,
        }
    }
}

impl DecisionAlgorithm for MetCut {
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
        ParameterSchema::new().per_bit("MinXE")
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        let bits = self.output_bits;
        let schema = self.parameter_schema();
        let mut r = ParameterResolver::new(&self.name, &schema, params, bits)?;
        let min_xe = r.take_bits_u32("MinXE", bits)?;
        r.finish()?;

        debug!(algorithm = %self.name, bits, "initialized");
        self.thresholds2 = Some(min_xe.iter().map(|&x| (x as i64) * (x as i64)).collect());
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.thresholds2.is_some()
    }

    fn max_composites(&self, _input_capacities: &[usize]) -> usize {
        0
    }

    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
        self.check_io(inputs, ctx)?;
        let thresholds2 = self
            .thresholds2
            .as_ref()
            .ok_or_else(|| not_initialized(&self.name))?;

        let Some(met) = inputs[0].leading(1).first() else {
            return Ok(());
        };
        let magnitude2 = match met.met() {
            Some(components) => components.magnitude2(),
            None => (met.et() as i64) * (met.et() as i64),
        };

        for (bit, &threshold2) in thresholds2.iter().enumerate() {
            if magnitude2 > threshold2 {
                ctx.set_bit(bit);
            }
        }
        Ok(())
    }
}
