//! Kind-specific upstream objects and their conversion into [`GenericTob`].
//!
//! These are the shapes the reconstruction stage hands over. The
//! conversions copy the integer fields unchanged and attach the kind tag;
//! nothing here rescales hardware values.

use super::types::{GenericTob, MetComponents, MuonFlags, TobKind};
use std::f64::consts::TAU;

/// Jet candidate in 0.1 eta/phi granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JetTob {
    pub et: u32,
    pub eta: i32,
    pub phi: i32,
}

/// Electromagnetic or hadronic-tau cluster flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    Em,
    Tau,
}

/// Calorimeter cluster candidate in 0.025/0.05 granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterTob {
    pub kind: ClusterKind,
    pub et: u32,
    pub eta: i32,
    pub phi: i32,
    /// Isolation word, carried into [`GenericTob::isolation`].
    pub isolation: u32,
}

/// Bunch-crossing assignment of a muon candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuonTiming {
    #[default]
    InTime,
    Late,
    NextBc,
}

/// Muon candidate in 0.025/0.05 granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuonTob {
    pub et: u32,
    pub eta: i32,
    pub phi: i32,
    pub timing: MuonTiming,
    pub flags: MuonFlags,
}

/// Missing transverse energy as raw vector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetTob {
    pub ex: i32,
    pub ey: i32,
}

impl MetTob {
    /// Phi bin of the vector direction, or `None` for a zero vector.
    fn phi_bin(&self) -> Option<i32> {
        if self.ex == 0 && self.ey == 0 {
            return None;
        }
        let bins = TobKind::Met.resolution().phi_bins as f64;
        let angle = (self.ey as f64).atan2(self.ex as f64);
        let bin = (angle / TAU * bins).round() as i64;
        Some(bin.rem_euclid(bins as i64) as i32)
    }
}

impl From<JetTob> for GenericTob {
    fn from(jet: JetTob) -> Self {
        GenericTob::new(TobKind::Jet, jet.et, jet.eta, jet.phi)
    }
}

impl From<ClusterTob> for GenericTob {
    fn from(cluster: ClusterTob) -> Self {
        let kind = match cluster.kind {
            ClusterKind::Em => TobKind::EmCluster,
            ClusterKind::Tau => TobKind::TauCluster,
        };
        GenericTob::new(kind, cluster.et, cluster.eta, cluster.phi).with_isolation(cluster.isolation)
    }
}

impl From<MuonTob> for GenericTob {
    fn from(muon: MuonTob) -> Self {
        let kind = match muon.timing {
            MuonTiming::InTime => TobKind::Muon,
            MuonTiming::Late => TobKind::LateMuon,
            MuonTiming::NextBc => TobKind::MuonNextBc,
        };
        GenericTob::new(kind, muon.et, muon.eta, muon.phi).with_muon_flags(muon.flags)
    }
}

impl From<MetTob> for GenericTob {
    /// Et is the floor of `sqrt(ex² + ey²)`, saturated to `u32`.
    fn from(met: MetTob) -> Self {
        let components = MetComponents {
            ex: met.ex,
            ey: met.ey,
            direction_defined: met.ex != 0 || met.ey != 0,
        };
        let magnitude = (components.magnitude2() as u64).isqrt();
        let et = u32::try_from(magnitude).unwrap_or(u32::MAX);
        let phi = met.phi_bin().unwrap_or(0);
        GenericTob::new(TobKind::Met, et, 0, phi).with_met(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_conversion() {
        let tob: GenericTob = JetTob {
            et: 400,
            eta: -7,
            phi: 12,
        }
        .into();
        assert_eq!(tob.kind(), TobKind::Jet);
        assert_eq!((tob.et(), tob.eta(), tob.phi()), (400, -7, 12));
    }

    #[test]
    fn test_cluster_kind_tag() {
        let tau: GenericTob = ClusterTob {
            kind: ClusterKind::Tau,
            et: 80,
            eta: 30,
            phi: 64,
            isolation: 3,
        }
        .into();
        assert_eq!(tau.kind(), TobKind::TauCluster);
        assert!((tau.eta_double() - 0.75).abs() < 1e-12);
        assert_eq!(tau.isolation(), Some(3));
    }

    #[test]
    fn test_isolation_only_on_clusters() {
        let jet: GenericTob = JetTob { et: 10, eta: 0, phi: 0 }.into();
        assert_eq!(jet.isolation(), None);
    }

    #[test]
    fn test_muon_timing_and_flags() {
        let tob: GenericTob = MuonTob {
            et: 140,
            eta: 10,
            phi: 20,
            timing: MuonTiming::Late,
            flags: MuonFlags {
                charge: 1,
                bw2or3: 1,
                inner_coin: 0,
                good_mf: 1,
            },
        }
        .into();
        assert_eq!(tob.kind(), TobKind::LateMuon);
        assert_eq!(tob.muon_flags().map(|f| f.good_mf), Some(1));
    }

    #[test]
    fn test_met_magnitude_and_direction() {
        let tob: GenericTob = MetTob { ex: 30, ey: 40 }.into();
        assert_eq!(tob.et(), 50);
        let met = tob.met().copied().unwrap_or_default();
        assert!(met.direction_defined);
        assert_eq!(met.magnitude2(), 2500);

        // +y axis is a quarter turn
        let up: GenericTob = MetTob { ex: 0, ey: 7 }.into();
        assert_eq!(up.phi(), 16);

        // -y wraps into the upper half of the bin range
        let down: GenericTob = MetTob { ex: 0, ey: -7 }.into();
        assert_eq!(down.phi(), 48);
    }

    #[test]
    fn test_met_zero_vector_sentinel() {
        let tob: GenericTob = MetTob { ex: 0, ey: 0 }.into();
        assert_eq!(tob.et(), 0);
        assert_eq!(tob.phi(), 0);
        assert_eq!(tob.met().map(|m| m.direction_defined), Some(false));
    }
}
