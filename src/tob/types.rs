//! Kind-erased trigger candidate.

/// Object-kind tag carried by every [`GenericTob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TobKind {
    Jet,
    EmCluster,
    TauCluster,
    Muon,
    LateMuon,
    MuonNextBc,
    Met,
    /// Synthetic pair produced by an algorithm that accepted a combination.
    Composite,
}

impl TobKind {
    /// Hardware granularity of this kind.
    ///
    /// | kind                     | Et  | eta | phi | phi bins (2π) |
    /// |--------------------------|-----|-----|-----|---------------|
    /// | Jet, Met, Composite      | /10 | /10 | /10 | 64            |
    /// | EM/Tau clusters, muons   | /10 | /40 | /20 | 128           |
    pub const fn resolution(self) -> TobResolution {
        match self {
            TobKind::Jet | TobKind::Met | TobKind::Composite => TobResolution::COARSE,
            TobKind::EmCluster
            | TobKind::TauCluster
            | TobKind::Muon
            | TobKind::LateMuon
            | TobKind::MuonNextBc => TobResolution::FINE,
        }
    }

    pub const fn is_muon(self) -> bool {
        matches!(self, TobKind::Muon | TobKind::LateMuon | TobKind::MuonNextBc)
    }
}

/// Fixed-point scale factors of a TOB's integer fields.
///
/// The integer fields are the source of truth; a floating view is
/// `raw / scale`. `phi_bins` is the number of phi units spanning a full
/// turn and acts as the 2π modulus when wrapping phi differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TobResolution {
    /// Et counts per GeV.
    pub et_scale: u32,
    /// Eta units per unit of pseudorapidity.
    pub eta_scale: u32,
    /// Phi units per radian-equivalent unit.
    pub phi_scale: u32,
    /// Phi units in one full turn.
    pub phi_bins: u32,
}

impl TobResolution {
    /// 0.1 granularity in eta and phi, 64 phi bins.
    pub const COARSE: TobResolution = TobResolution {
        et_scale: 10,
        eta_scale: 10,
        phi_scale: 10,
        phi_bins: 64,
    };

    /// 0.025 in eta, 0.05 in phi, 128 phi bins.
    pub const FINE: TobResolution = TobResolution {
        et_scale: 10,
        eta_scale: 40,
        phi_scale: 20,
        phi_bins: 128,
    };
}

/// Muon-specific quality information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MuonFlags {
    /// -1, 0 (unknown) or +1.
    pub charge: i8,
    pub bw2or3: u8,
    pub inner_coin: u8,
    pub good_mf: u8,
}

/// Missing-transverse-energy vector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetComponents {
    pub ex: i32,
    pub ey: i32,
    /// `false` for a zero-magnitude vector; phi is then a 0 sentinel.
    pub direction_defined: bool,
}

impl MetComponents {
    /// `ex² + ey²` without overflow.
    pub fn magnitude2(&self) -> i64 {
        let ex = self.ex as i64;
        let ey = self.ey as i64;
        ex * ex + ey * ey
    }
}

/// A uniform, immutable trigger candidate.
///
/// Built once per input candidate per event, either directly from raw
/// fields or by converting one of the kind-specific source objects in
/// [`super::sources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericTob {
    et: u32,
    eta: i32,
    phi: i32,
    kind: TobKind,
    resolution: TobResolution,
    muon: Option<MuonFlags>,
    isolation: Option<u32>,
    met: Option<MetComponents>,
}

impl GenericTob {
    /// Creates a TOB with the kind's native resolution.
    pub fn new(kind: TobKind, et: u32, eta: i32, phi: i32) -> Self {
        Self {
            et,
            eta,
            phi,
            kind,
            resolution: kind.resolution(),
            muon: None,
            isolation: None,
            met: None,
        }
    }

    /// Creates a composite TOB whose integer fields keep the given resolution.
    pub(crate) fn composite(et: u32, eta: i32, phi: i32, resolution: TobResolution) -> Self {
        Self {
            et,
            eta,
            phi,
            kind: TobKind::Composite,
            resolution,
            muon: None,
            isolation: None,
            met: None,
        }
    }

    pub fn with_muon_flags(mut self, flags: MuonFlags) -> Self {
        self.muon = Some(flags);
        self
    }

    /// Attaches a calorimeter isolation word.
    pub fn with_isolation(mut self, isolation: u32) -> Self {
        self.isolation = Some(isolation);
        self
    }

    pub fn with_met(mut self, met: MetComponents) -> Self {
        self.met = Some(met);
        self
    }

    #[inline]
    pub fn et(&self) -> u32 {
        self.et
    }

    #[inline]
    pub fn eta(&self) -> i32 {
        self.eta
    }

    #[inline]
    pub fn phi(&self) -> i32 {
        self.phi
    }

    #[inline]
    pub fn kind(&self) -> TobKind {
        self.kind
    }

    #[inline]
    pub fn resolution(&self) -> TobResolution {
        self.resolution
    }

    pub fn muon_flags(&self) -> Option<&MuonFlags> {
        self.muon.as_ref()
    }

    /// Isolation word of an EM or tau cluster.
    pub fn isolation(&self) -> Option<u32> {
        self.isolation
    }

    pub fn met(&self) -> Option<&MetComponents> {
        self.met.as_ref()
    }

    /// Et in GeV. Not for hardware-exact comparisons.
    pub fn et_double(&self) -> f64 {
        self.et as f64 / self.resolution.et_scale as f64
    }

    /// Eta in units of pseudorapidity. Not for hardware-exact comparisons.
    pub fn eta_double(&self) -> f64 {
        self.eta as f64 / self.resolution.eta_scale as f64
    }

    /// Phi in radian-equivalent units. Not for hardware-exact comparisons.
    pub fn phi_double(&self) -> f64 {
        self.phi as f64 / self.resolution.phi_scale as f64
    }
}
