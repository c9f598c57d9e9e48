//! Fixed-point angular and kinematic quantities.
//!
//! Every `*_bw` function ("bitwise") works on the integer fields only and
//! reproduces the firmware result exactly. Two TOBs of different
//! granularity are first brought to a common grid: the least common
//! multiple of their scales, i.e. the finer of the two when one divides
//! the other. Phi differences wrap through the fixed-point 2π modulus
//! (`phi_bins`) before squaring.
//!
//! The invariant-mass factor comes from the integer tables in
//! [`mass_lut`], so no decision depends on libm.
//!
//! The `*_double` variants are floating views for monitoring and never
//! feed a decision bit.

pub mod mass_lut;

use crate::tob::GenericTob;
use mass_lut::{COSH_MILLI, COSH_STEPS_PER_UNIT, COS_MILLI, COS_TURN_BINS};

/// How a scaled distance is brought back to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round half away from zero (all quantities here are non-negative).
    #[default]
    HalfUp,
    /// Drop the fractional part.
    Truncate,
}

impl Rounding {
    #[inline]
    fn divide(self, num: u128, den: u128) -> u128 {
        match self {
            Rounding::HalfUp => (num + den / 2) / den,
            Rounding::Truncate => num / den,
        }
    }
}

/// Scale of the ΔR² metric: `round(100 * (Δη² + Δφ²))`.
pub const DR2_SCALE: u64 = 100;

/// Quantization of the invariant-mass angular factor.
pub const MASS_FACTOR_SCALE: u64 = 1000;

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[inline]
const fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

/// |Δη| of two TOBs on their common eta grid, with that grid's scale.
#[inline]
fn common_delta_eta(a: &GenericTob, b: &GenericTob) -> (u64, u32) {
    let sa = a.resolution().eta_scale;
    let sb = b.resolution().eta_scale;
    let scale = lcm(sa, sb);
    let ea = a.eta() as i64 * (scale / sa) as i64;
    let eb = b.eta() as i64 * (scale / sb) as i64;
    ((ea - eb).unsigned_abs(), scale)
}

/// Wrapped |Δφ| on the common phi grid, with that grid's scale and bin count.
#[inline]
fn common_delta_phi(a: &GenericTob, b: &GenericTob) -> (u64, u32, u64) {
    let ra = a.resolution();
    let rb = b.resolution();
    let scale = lcm(ra.phi_scale, rb.phi_scale);
    let fa = (scale / ra.phi_scale) as i64;
    let fb = (scale / rb.phi_scale) as i64;
    let bins = ra.phi_bins as i64 * fa;
    let raw = (a.phi() as i64 * fa - b.phi() as i64 * fb).rem_euclid(bins);
    let wrapped = if raw > bins / 2 { bins - raw } else { raw };
    (wrapped as u64, scale, bins as u64)
}

/// |Δη| in the common eta units of the two TOBs.
///
/// For two TOBs of the same kind this is simply `|eta_a - eta_b|`.
#[inline]
pub fn delta_eta_bw(a: &GenericTob, b: &GenericTob) -> u32 {
    let (deta, _) = common_delta_eta(a, b);
    u32::try_from(deta).unwrap_or(u32::MAX)
}

/// |Δφ| in common phi units, wrapped into `[0, bins/2]`.
#[inline]
pub fn delta_phi_bw(a: &GenericTob, b: &GenericTob) -> u32 {
    let (dphi, _, _) = common_delta_phi(a, b);
    dphi as u32
}

/// `round(100 * (Δφ² + Δη²))` with Δ in physical units, evaluated exactly.
///
/// With 0.1 granularity on both axes this is `Δη_units² + Δφ_units²`.
#[inline]
pub fn delta_r2_bw(a: &GenericTob, b: &GenericTob, rounding: Rounding) -> u32 {
    let (deta, eta_scale) = common_delta_eta(a, b);
    let (dphi, phi_scale, _) = common_delta_phi(a, b);
    let (deta, dphi) = (deta as u128, dphi as u128);
    let es2 = (eta_scale as u128).pow(2);
    let ps2 = (phi_scale as u128).pow(2);
    let num = DR2_SCALE as u128 * (deta * deta * ps2 + dphi * dphi * es2);
    let den = es2 * ps2;
    u32::try_from(rounding.divide(num, den)).unwrap_or(u32::MAX)
}

/// Floating ΔR² in the same `round(100 * ...)` convention.
pub fn delta_r2_double(a: &GenericTob, b: &GenericTob) -> f64 {
    let deta = a.eta_double() - b.eta_double();
    let period = a.resolution().phi_bins as f64 / a.resolution().phi_scale as f64;
    let mut dphi = (a.phi_double() - b.phi_double()).abs() % period;
    if dphi > period / 2.0 {
        dphi = period - dphi;
    }
    (DR2_SCALE as f64 * (dphi * dphi + deta * deta)).round()
}

/// `cosh Δη - cos Δφ` in thousandths, read from [`mass_lut`].
///
/// Δη is looked up in steps of 0.025 and clamps at 10. Δφ is taken as a
/// true angle (`bins` phi units span 2π) in steps of 2π/128.
pub fn mass_factor_milli(a: &GenericTob, b: &GenericTob) -> u64 {
    let (deta, eta_scale) = common_delta_eta(a, b);
    let (dphi, _, bins) = common_delta_phi(a, b);
    let eta_scale = eta_scale as u64;
    let eta_index = deta
        .saturating_mul(COSH_STEPS_PER_UNIT)
        .saturating_add(eta_scale / 2)
        / eta_scale;
    let phi_index = (dphi * COS_TURN_BINS + bins / 2) / bins;
    let cosh = COSH_MILLI[(eta_index as usize).min(COSH_MILLI.len() - 1)];
    let cos = COS_MILLI[(phi_index as usize).min(COS_MILLI.len() - 1)];
    // cosh >= 1000 >= cos
    (cosh as i64 - cos as i64).unsigned_abs()
}

/// `2 · Et1 · Et2 · (cosh Δη − cos Δφ)` in Et counts², rounded half-up.
///
/// Saturates instead of overflowing; a zero-Et TOB yields 0.
pub fn inv_mass2_bw(a: &GenericTob, b: &GenericTob) -> u64 {
    let factor = mass_factor_milli(a, b) as u128;
    let product = 2 * a.et() as u128 * b.et() as u128;
    let scale = MASS_FACTOR_SCALE as u128;
    let m2 = (product.saturating_mul(factor) + scale / 2) / scale;
    u64::try_from(m2).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tob::TobKind;
    use proptest::prelude::*;

    fn jet(eta: i32, phi: i32) -> GenericTob {
        GenericTob::new(TobKind::Jet, 100, eta, phi)
    }

    fn em(eta: i32, phi: i32) -> GenericTob {
        GenericTob::new(TobKind::EmCluster, 100, eta, phi)
    }

    #[test]
    fn test_delta_eta_same_kind() {
        assert_eq!(delta_eta_bw(&jet(10, 0), &jet(-5, 0)), 15);
        assert_eq!(delta_eta_bw(&jet(-5, 0), &jet(10, 0)), 15);
    }

    #[test]
    fn test_delta_eta_mixed_granularity() {
        // 1.0 and 0.5 on a 0.025 grid
        assert_eq!(delta_eta_bw(&jet(10, 0), &em(20, 0)), 20);
    }

    #[test]
    fn test_delta_phi_wraps() {
        assert_eq!(delta_phi_bw(&jet(0, 2), &jet(0, 62)), 4);
        assert_eq!(delta_phi_bw(&jet(0, 0), &jet(0, 32)), 32);
        assert_eq!(delta_phi_bw(&jet(0, 0), &jet(0, 33)), 31);
    }

    #[test]
    fn test_delta_r2_scenario() {
        // (10,5) vs (10,35): dphi = 3.0, deta = 0 -> 900
        assert_eq!(delta_r2_bw(&jet(10, 5), &jet(10, 35), Rounding::HalfUp), 900);
        assert!((delta_r2_double(&jet(10, 5), &jet(10, 35)) - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_r2_rounding_modes() {
        // deta = 1 unit of 0.025 -> 100 * 0.000625 = 0.0625
        // dphi = 3 units of 0.05 -> 100 * 0.0225 = 2.25
        let a = em(0, 0);
        let b = em(1, 3);
        assert_eq!(delta_r2_bw(&a, &b, Rounding::HalfUp), 2);
        assert_eq!(delta_r2_bw(&a, &b, Rounding::Truncate), 2);

        // 100 * (0.05² + 0.25²) = 6.5 exactly
        let c = em(2, 5);
        assert_eq!(delta_r2_bw(&a, &c, Rounding::HalfUp), 7);
        assert_eq!(delta_r2_bw(&a, &c, Rounding::Truncate), 6);
    }

    #[test]
    fn test_self_pair_is_zero() {
        let t = jet(7, 9);
        assert_eq!(delta_r2_bw(&t, &t, Rounding::HalfUp), 0);
        assert_eq!(delta_eta_bw(&t, &t), 0);
        assert_eq!(inv_mass2_bw(&t, &t), 0);
    }

    #[test]
    fn test_inv_mass_back_to_back() {
        // deta = 0, dphi = pi -> factor 2000, m2 = 2 * 10 * 20 * 2 = 800
        let a = GenericTob::new(TobKind::Jet, 10, 0, 0);
        let b = GenericTob::new(TobKind::Jet, 20, 0, 32);
        assert_eq!(mass_factor_milli(&a, &b), 2000);
        assert_eq!(inv_mass2_bw(&a, &b), 800);
    }

    #[test]
    fn test_mass_tables_pinned() {
        assert_eq!(mass_lut::COSH_MILLI[0], 1000);
        assert_eq!(mass_lut::COSH_MILLI[40], 1543);
        assert_eq!(mass_lut::COSH_MILLI[400], 11_013_233);
        assert_eq!(mass_lut::COS_MILLI[0], 1000);
        assert_eq!(mass_lut::COS_MILLI[16], 707);
        assert_eq!(mass_lut::COS_MILLI[32], 0);
        assert_eq!(mass_lut::COS_MILLI[64], -1000);
        assert!(mass_lut::COSH_MILLI.windows(2).all(|w| w[0] <= w[1]));
        assert!(mass_lut::COS_MILLI.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_mass_factor_grids() {
        // deta 1.0, dphi pi/2: 1543 - 0
        assert_eq!(mass_factor_milli(&jet(0, 0), &jet(10, 16)), 1543);
        // same angles on the fine grid
        let a = GenericTob::new(TobKind::Muon, 10, 0, 0);
        let b = GenericTob::new(TobKind::Muon, 10, 40, 32);
        assert_eq!(mass_factor_milli(&a, &b), 1543);
        // mixed: jet eta 1.0 vs muon eta 0, muon phi pi/4
        let c = GenericTob::new(TobKind::Muon, 10, 0, 16);
        assert_eq!(mass_factor_milli(&jet(10, 0), &c), 1543 - 707);
    }

    #[test]
    fn test_mass_factor_clamps_large_deta() {
        let far = mass_factor_milli(&jet(-2_000_000, 0), &jet(2_000_000, 0));
        assert_eq!(far, 11_013_233 - 1000);
        assert_eq!(mass_factor_milli(&jet(-50, 0), &jet(50, 0)), far);
    }

    #[test]
    fn test_delta_r2_extreme_eta_saturates() {
        let a = em(20_000_000, 0);
        let b = em(-20_000_000, 0);
        assert_eq!(delta_r2_bw(&a, &b, Rounding::HalfUp), u32::MAX);
        assert_eq!(delta_r2_bw(&b, &a, Rounding::Truncate), u32::MAX);
        let c = jet(i32::MAX, 0);
        let d = GenericTob::new(TobKind::Muon, 10, i32::MIN, 64);
        assert_eq!(delta_r2_bw(&c, &d, Rounding::HalfUp), u32::MAX);
    }

    #[test]
    fn test_delta_r2_large_but_representable() {
        // deta = 6553.5 on the 0.025 grid: 100 * 6553.5^2 = 4_294_836_225
        assert_eq!(delta_r2_bw(&em(262_140, 0), &em(0, 0), Rounding::HalfUp), 4_294_836_225);
    }

    #[test]
    fn test_inv_mass_zero_et() {
        let a = GenericTob::new(TobKind::Jet, 0, 0, 0);
        let b = GenericTob::new(TobKind::Jet, 200, 30, 20);
        assert_eq!(inv_mass2_bw(&a, &b), 0);
    }

    /// Reference ΔR² with each TOB kept on its own grid, in u128.
    fn reference_dr2(a: &GenericTob, b: &GenericTob, rounding: Rounding) -> u128 {
        let (ra, rb) = (a.resolution(), b.resolution());
        let (sa, sb) = (ra.eta_scale as i128, rb.eta_scale as i128);
        let (pa, pb) = (ra.phi_scale as i128, rb.phi_scale as i128);
        // Δη in units of 1/(sa*sb)
        let deta = (a.eta() as i128 * sb - b.eta() as i128 * sa).unsigned_abs();
        // Δφ in units of 1/(pa*pb), full turn = bins_a/pa
        let turn = ra.phi_bins as i128 * pb;
        let raw = (a.phi() as i128 * pb - b.phi() as i128 * pa).rem_euclid(turn);
        let dphi = (if raw > turn / 2 { turn - raw } else { raw }) as u128;
        let e2 = (sa * sb) as u128 * (sa * sb) as u128;
        let p2 = (pa * pb) as u128 * (pa * pb) as u128;
        let num = 100 * (deta * deta * p2 + dphi * dphi * e2);
        let den = e2 * p2;
        match rounding {
            Rounding::HalfUp => (num + den / 2) / den,
            Rounding::Truncate => num / den,
        }
    }

    fn any_tob() -> impl Strategy<Value = GenericTob> {
        (any::<bool>(), -200i32..200, 0i32..128).prop_map(|(fine, eta, phi)| {
            if fine {
                GenericTob::new(TobKind::Muon, 10, eta, phi % 128)
            } else {
                GenericTob::new(TobKind::Jet, 10, eta / 4, phi % 64)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_dr2_matches_exact_reference(a in any_tob(), b in any_tob(), trunc in any::<bool>()) {
            let rounding = if trunc { Rounding::Truncate } else { Rounding::HalfUp };
            let got = delta_r2_bw(&a, &b, rounding);
            prop_assert_eq!(got as u128, reference_dr2(&a, &b, rounding));
            // no drift under repeated evaluation
            prop_assert_eq!(got, delta_r2_bw(&a, &b, rounding));
        }

        #[test]
        fn prop_dr2_symmetric(a in any_tob(), b in any_tob()) {
            prop_assert_eq!(
                delta_r2_bw(&a, &b, Rounding::HalfUp),
                delta_r2_bw(&b, &a, Rounding::HalfUp)
            );
            prop_assert_eq!(delta_eta_bw(&a, &b), delta_eta_bw(&b, &a));
        }

        #[test]
        fn prop_dphi_at_most_half_turn(p1 in 0i32..64, p2 in 0i32..64) {
            prop_assert!(delta_phi_bw(&jet(0, p1), &jet(0, p2)) <= 32);
        }
    }
}
