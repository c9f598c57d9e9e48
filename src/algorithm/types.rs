//! The decision-algorithm contract.

use super::cuts::PairCut;
use crate::decision::Decision;
use crate::error::{TopoError, TopoResult};
use crate::params::{ParameterSchema, ParameterSpace};
use crate::tob::{CompositeArena, GenericTob, OutputArray, TobArray};
use tracing::trace;

/// Where an algorithm writes during one `process` call.
///
/// Holds the instance's decision, its output arrays (either none, or one
/// per output bit) and the worker's composite arena.
#[derive(Debug)]
pub struct ProcessContext<'a> {
    decision: &'a mut Decision,
    outputs: &'a mut [OutputArray],
    arena: &'a mut CompositeArena,
}

impl<'a> ProcessContext<'a> {
    pub fn new(
        decision: &'a mut Decision,
        outputs: &'a mut [OutputArray],
        arena: &'a mut CompositeArena,
    ) -> Self {
        Self {
            decision,
            outputs,
            arena,
        }
    }

    /// Latches `bit` and records the pair in that bit's output array.
    #[inline]
    pub fn accept(&mut self, bit: usize, first: &GenericTob, second: &GenericTob) {
        self.set_bit(bit);
        if let Some(out) = self.outputs.get_mut(bit) {
            let id = self.arena.create(first, second);
            out.push(id);
        }
    }

    /// Latches `bit` without emitting a composite.
    #[inline]
    pub fn set_bit(&mut self, bit: usize) {
        if self.decision.set_bit(bit) {
            trace!(bit, "decision bit latched");
        }
    }

    pub fn decision(&self) -> &Decision {
        self.decision
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

/// A configurable trigger algorithm.
///
/// Lifecycle: constructed by the registry with an instance name and an
/// output width, initialized once from its [`ParameterSpace`], then
/// processed once per event. `process` is a pure function of its inputs
/// and the cached parameters; nothing carries over between events.
///
/// # Examples
///
/// ```
/// use l1topo_core::algorithm::{DecisionAlgorithm, ProcessContext};
/// use l1topo_core::algorithms::DeltaEtaIncl2;
/// use l1topo_core::params::ParameterSpace;
/// use l1topo_core::tob::{CompositeArena, GenericTob, OutputArray, TobArray, TobKind};
/// use l1topo_core::Decision;
///
/// let mut alg = DeltaEtaIncl2::new("DEta-J20-J20", 1);
/// alg.initialize(
///     &ParameterSpace::new()
///         .with_parameter("MaxTob1", 4)
///         .with_parameter("MaxTob2", 4)
///         .with_bit_parameters("MinET1", &[20])
///         .with_bit_parameters("MinET2", &[20])
///         .with_bit_parameters("MinDeltaEta", &[0])
///         .with_bit_parameters("MaxDeltaEta", &[15]),
/// )
/// .unwrap();
///
/// let jets = TobArray::from_tobs("Jets", 6, [
///     GenericTob::new(TobKind::Jet, 50, 10, 0),
///     GenericTob::new(TobKind::Jet, 30, -2, 20),
/// ])
/// .unwrap();
///
/// let mut decision = Decision::new(1).unwrap();
/// let mut outputs = vec![OutputArray::new("DEta-out")];
/// let mut arena = CompositeArena::new();
/// let mut ctx = ProcessContext::new(&mut decision, &mut outputs, &mut arena);
/// alg.process(&[&jets, &jets], &mut ctx).unwrap();
///
/// assert!(decision.bit(0));
/// ```
pub trait DecisionAlgorithm: Send + Sync + std::fmt::Debug {
    /// Registry name of the algorithm type.
    fn type_name(&self) -> &'static str;

    /// Instance name.
    fn name(&self) -> &str;

    /// Number of input arrays `process` expects.
    fn input_count(&self) -> usize;

    /// Number of decision bits this instance writes.
    fn output_bits(&self) -> usize;

    /// Parameters read by `initialize`.
    fn parameter_schema(&self) -> ParameterSchema;

    /// Resolves every declared parameter into typed fields.
    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()>;

    fn is_initialized(&self) -> bool;

    /// Upper bound on composites one `process` call can emit when input
    /// `i` holds at most `input_capacities[i]` objects. Inputs without an
    /// entry are bounded by the configured multiplicity alone. Saturates
    /// at `usize::MAX`.
    fn max_composites(&self, input_capacities: &[usize]) -> usize;

    /// Evaluates one event.
    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()>;

    /// Verifies the call shape before any combination is evaluated.
    fn check_io(&self, inputs: &[&TobArray], ctx: &ProcessContext<'_>) -> TopoResult<()> {
        if !self.is_initialized() {
            return Err(TopoError::NotInitialized {
                algorithm: self.name().to_string(),
            });
        }
        if inputs.len() != self.input_count() {
            return Err(TopoError::InputCount {
                algorithm: self.name().to_string(),
                expected: self.input_count(),
                got: inputs.len(),
            });
        }
        let outputs = ctx.output_count();
        if outputs != 0 && outputs != self.output_bits() {
            return Err(TopoError::OutputCount {
                algorithm: self.name().to_string(),
                expected: self.output_bits(),
                got: outputs,
            });
        }
        if ctx.decision().width() != self.output_bits() {
            return Err(TopoError::OutputCount {
                algorithm: self.name().to_string(),
                expected: self.output_bits(),
                got: ctx.decision().width(),
            });
        }
        Ok(())
    }
}

/// Evaluates every (first, second) combination of the two leading
/// slices against each bit's cut.
///
/// `quantity` is computed once per combination; every bit is tested
/// independently and every passing combination is recorded.
#[inline]
pub fn evaluate_pairs<F>(
    first: &[GenericTob],
    second: &[GenericTob],
    cuts: &[PairCut],
    quantity: F,
    ctx: &mut ProcessContext<'_>,
) where
    F: Fn(&GenericTob, &GenericTob) -> u64,
{
    for a in first {
        for b in second {
            let q = quantity(a, b);
            for (bit, cut) in cuts.iter().enumerate() {
                if cut.accepts(a, b, q) {
                    ctx.accept(bit, a, b);
                }
            }
        }
    }
}

/// Like [`evaluate_pairs`] over one list, visiting each unordered pair
/// `i < j` once. Self-pairs are skipped.
#[inline]
pub fn evaluate_unique_pairs<F>(
    list: &[GenericTob],
    cuts: &[PairCut],
    quantity: F,
    ctx: &mut ProcessContext<'_>,
) where
    F: Fn(&GenericTob, &GenericTob) -> u64,
{
    for (i, a) in list.iter().enumerate() {
        for b in &list[i + 1..] {
            let q = quantity(a, b);
            for (bit, cut) in cuts.iter().enumerate() {
                if cut.accepts(a, b, q) {
                    ctx.accept(bit, a, b);
                }
            }
        }
    }
}
