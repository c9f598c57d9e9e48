//! Concrete decision algorithms.
//!
//! Two-object algorithms share the same shape: take the leading
//! `MaxTob1`/`MaxTob2` objects of each list, apply per-bit Et (and
//! optionally |eta|) cuts, compute one fixed-point pair quantity and test
//! it against every bit's window. They differ in the quantity and in the
//! window's lower-bound semantics:
//!
//! | algorithm                 | inputs | quantity        | window          |
//! |---------------------------|--------|-----------------|-----------------|
//! | [`DeltaEtaIncl2`]         | 2      | Δη              | inclusive       |
//! | [`DeltaEtaIncl1`]         | 1      | Δη, pairs i < j | inclusive       |
//! | [`DeltaRSqrIncl2`]        | 2      | ΔR²             | inclusive       |
//! | [`DisambiguationDRIncl2`] | 2      | ΔR²             | strict lower    |
//! | [`InvariantMassInclusive2`] | 2    | M²              | inclusive       |
//!
//! [`Multiplicity`] and [`MetCut`] are single-object algorithms that only
//! set decision bits.

mod delta_eta_incl1;
mod delta_eta_incl2;
mod delta_r_sqr_incl2;
mod disambiguation_dr_incl2;
mod invariant_mass_incl2;
mod met_cut;
mod multiplicity;

pub use delta_eta_incl1::DeltaEtaIncl1;
pub use delta_eta_incl2::DeltaEtaIncl2;
pub use delta_r_sqr_incl2::DeltaRSqrIncl2;
pub use disambiguation_dr_incl2::DisambiguationDRIncl2;
pub use invariant_mass_incl2::InvariantMassInclusive2;
pub use met_cut::MetCut;
pub use multiplicity::Multiplicity;

use crate::algorithm::{EtaWindow, Window, WindowKind};
use crate::error::{TopoError, TopoResult};
use crate::params::ParameterResolver;

pub(crate) fn not_initialized(name: &str) -> TopoError {
    TopoError::NotInitialized {
        algorithm: name.to_string(),
    }
}

/// Leading objects visited on input `index`: the multiplicity, clamped to
/// the input's capacity when one is known.
pub(crate) fn visited(max_tob: usize, input_capacities: &[usize], index: usize) -> usize {
    input_capacities
        .get(index)
        .map_or(max_tob, |&capacity| max_tob.min(capacity))
}

/// Composites from `n1 x n2` combinations on every bit.
pub(crate) fn pair_bound(bits: usize, n1: usize, n2: usize) -> usize {
    bits.saturating_mul(n1).saturating_mul(n2)
}

/// Composites from the `i < j` pairs of `n` objects on every bit.
pub(crate) fn unique_pair_bound(bits: usize, n: usize) -> usize {
    let pairs = if n % 2 == 0 {
        (n / 2).saturating_mul(n.saturating_sub(1))
    } else {
        n.saturating_mul((n - 1) / 2)
    };
    bits.saturating_mul(pairs)
}

/// Resolves one `[min, max]` window per bit, rejecting `min > max`.
pub(crate) fn resolve_windows(
    r: &mut ParameterResolver<'_>,
    min_name: &'static str,
    max_name: &'static str,
    bits: usize,
    kind: WindowKind,
) -> TopoResult<Vec<Window>> {
    let mins = r.take_bits_u64(min_name, bits)?;
    let maxs = r.take_bits_u64(max_name, bits)?;
    mins.into_iter()
        .zip(maxs)
        .map(|(min, max)| {
            check_order(r, min_name, max_name, min, max)?;
            Ok(Window { min, max, kind })
        })
        .collect()
}

/// Resolves one |eta| window per bit.
pub(crate) fn resolve_eta_windows(
    r: &mut ParameterResolver<'_>,
    min_name: &'static str,
    max_name: &'static str,
    bits: usize,
) -> TopoResult<Vec<EtaWindow>> {
    let mins = r.take_bits_u32(min_name, bits)?;
    let maxs = r.take_bits_u32(max_name, bits)?;
    mins.into_iter()
        .zip(maxs)
        .map(|(min, max)| {
            check_order(r, min_name, max_name, min as u64, max as u64)?;
            Ok(EtaWindow { min, max })
        })
        .collect()
}

fn check_order(
    r: &ParameterResolver<'_>,
    min_name: &str,
    max_name: &str,
    min: u64,
    max: u64,
) -> TopoResult<()> {
    if min > max {
        return Err(TopoError::InvalidParameter {
            algorithm: r.algorithm().to_string(),
            parameter: min_name.to_string(),
            value: i64::try_from(min).unwrap_or(i64::MAX),
            reason: format!("greater than {max_name} = {max}"),
        });
    }
    Ok(())
}


#[cfg(test)]
pub(crate) mod testutil {
    use crate::algorithm::{DecisionAlgorithm, ProcessContext};
    use crate::decision::Decision;
    use crate::error::TopoResult;
    use crate::tob::{CompositeArena, GenericTob, OutputArray, TobArray, TobKind};

    pub fn jet(et: u32, eta: i32, phi: i32) -> GenericTob {
        GenericTob::new(TobKind::Jet, et, eta, phi)
    }

    pub fn array(name: &str, tobs: &[GenericTob]) -> TobArray {
        TobArray::from_tobs(name, 16, tobs.iter().copied()).unwrap()
    }

    /// Output of one `process` call with per-bit output arrays.
    pub struct Run {
        pub decision: Decision,
        pub outputs: Vec<OutputArray>,
        pub arena: CompositeArena,
    }

    pub fn run<A: DecisionAlgorithm>(alg: &A, inputs: &[&TobArray]) -> TopoResult<Run> {
        let mut decision = Decision::new(alg.output_bits())?;
        let mut outputs: Vec<OutputArray> = (0..alg.output_bits())
            .map(|i| OutputArray::new(format!("out{i}")))
            .collect();
        let mut arena = CompositeArena::new();
        let mut ctx = ProcessContext::new(&mut decision, &mut outputs, &mut arena);
        alg.process(inputs, &mut ctx)?;
        Ok(Run {
            decision,
            outputs,
            arena,
        })
    }
}
