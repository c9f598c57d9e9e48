//! Name-based construction of algorithm instances.

use super::types::{DecisionAlgorithm, ProcessContext};
use crate::algorithms::{
    DeltaEtaIncl1, DeltaEtaIncl2, DeltaRSqrIncl2, DisambiguationDRIncl2,
    InvariantMassInclusive2, MetCut, Multiplicity,
};
use crate::error::{TopoError, TopoResult};
use crate::params::{ParameterSchema, ParameterSpace};
use crate::tob::TobArray;
use std::collections::BTreeMap;

/// Any algorithm the registry can build.
///
/// Built-in types are plain variants, so a configured menu calls each
/// algorithm's `process` through a `match` rather than a vtable, and the
/// per-combination loop inside is fully monomorphized. Algorithms defined
/// outside this crate go through [`AnyAlgorithm::Custom`].
#[derive(Debug)]
pub enum AnyAlgorithm {
    DeltaEtaIncl1(DeltaEtaIncl1),
    DeltaEtaIncl2(DeltaEtaIncl2),
    DeltaRSqrIncl2(DeltaRSqrIncl2),
    DisambiguationDRIncl2(DisambiguationDRIncl2),
    InvariantMassInclusive2(InvariantMassInclusive2),
    Multiplicity(Multiplicity),
    MetCut(MetCut),
    Custom(Box<dyn DecisionAlgorithm>),
}

macro_rules! dispatch {
    ($self:expr, $alg:ident => $body:expr) => {
        match $self {
            AnyAlgorithm::DeltaEtaIncl1($alg) => $body,
            AnyAlgorithm::DeltaEtaIncl2($alg) => $body,
            AnyAlgorithm::DeltaRSqrIncl2($alg) => $body,
            AnyAlgorithm::DisambiguationDRIncl2($alg) => $body,
            AnyAlgorithm::InvariantMassInclusive2($alg) => $body,
            AnyAlgorithm::Multiplicity($alg) => $body,
            AnyAlgorithm::MetCut($alg) => $body,
            AnyAlgorithm::Custom($alg) => $body,
        }
    };
}

impl DecisionAlgorithm for AnyAlgorithm {
    fn type_name(&self) -> &'static str {
        dispatch!(self, a => a.type_name())
    }

    fn name(&self) -> &str {
        dispatch!(self, a => a.name())
    }

    fn input_count(&self) -> usize {
        dispatch!(self, a => a.input_count())
    }

    fn output_bits(&self) -> usize {
        dispatch!(self, a => a.output_bits())
    }

    fn parameter_schema(&self) -> ParameterSchema {
        dispatch!(self, a => a.parameter_schema())
    }

    fn initialize(&mut self, params: &ParameterSpace) -> TopoResult<()> {
        dispatch!(self, a => a.initialize(params))
    }

    fn is_initialized(&self) -> bool {
        dispatch!(self, a => a.is_initialized())
    }

    fn max_composites(&self, input_capacities: &[usize]) -> usize {
        dispatch!(self, a => a.max_composites(input_capacities))
    }

    fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
        dispatch!(self, a => a.process(inputs, ctx))
    }
}

/// Builds an algorithm from an instance name and an output width.
pub type Constructor = fn(name: &str, output_bits: usize) -> AnyAlgorithm;

/// Maps algorithm type names to constructors.
///
/// Lookups happen once, while a menu is loaded.
///
/// # Examples
///
/// ```
/// use l1topo_core::algorithm::{AlgorithmRegistry, DecisionAlgorithm};
///
/// let registry = AlgorithmRegistry::with_builtin();
/// let alg = registry.create("DisambiguationDRIncl2", "DisJ-EM", 2).unwrap();
/// assert_eq!(alg.input_count(), 2);
/// assert!(registry.create("NoSuchAlg", "x", 1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every algorithm of this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [(&str, Constructor); 7] = [
            (DeltaEtaIncl1::TYPE_NAME, |n, b| {
                AnyAlgorithm::DeltaEtaIncl1(DeltaEtaIncl1::new(n, b))
            }),
            (DeltaEtaIncl2::TYPE_NAME, |n, b| {
                AnyAlgorithm::DeltaEtaIncl2(DeltaEtaIncl2::new(n, b))
            }),
            (DeltaRSqrIncl2::TYPE_NAME, |n, b| {
                AnyAlgorithm::DeltaRSqrIncl2(DeltaRSqrIncl2::new(n, b))
            }),
            (DisambiguationDRIncl2::TYPE_NAME, |n, b| {
                AnyAlgorithm::DisambiguationDRIncl2(DisambiguationDRIncl2::new(n, b))
            }),
            (InvariantMassInclusive2::TYPE_NAME, |n, b| {
                AnyAlgorithm::InvariantMassInclusive2(InvariantMassInclusive2::new(n, b))
            }),
            (Multiplicity::TYPE_NAME, |n, b| {
                AnyAlgorithm::Multiplicity(Multiplicity::new(n, b))
            }),
            (MetCut::TYPE_NAME, |n, b| AnyAlgorithm::MetCut(MetCut::new(n, b))),
        ];
        for (name, ctor) in builtin {
            registry.constructors.insert(name.to_string(), ctor);
        }
        registry
    }

    /// Adds a constructor. Fails if the type name is taken.
    pub fn register(&mut self, type_name: impl Into<String>, ctor: Constructor) -> TopoResult<()> {
        let type_name = type_name.into();
        if self.constructors.contains_key(&type_name) {
            return Err(TopoError::DuplicateName(type_name));
        }
        self.constructors.insert(type_name, ctor);
        Ok(())
    }

    /// Instantiates an uninitialized algorithm.
    pub fn create(&self, type_name: &str, name: &str, output_bits: usize) -> TopoResult<AnyAlgorithm> {
        let ctor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| TopoError::UnknownAlgorithm(type_name.to_string()))?;
        Ok(ctor(name, output_bits))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names in sorted order.
    pub fn type_names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct AlwaysOn {
        name: String,
    }

    impl DecisionAlgorithm for AlwaysOn {
        fn type_name(&self) -> &'static str {
            "AlwaysOn"
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn input_count(&self) -> usize {
            1
        }
        fn output_bits(&self) -> usize {
            1
        }
        fn parameter_schema(&self) -> ParameterSchema {
            ParameterSchema::new()
        }
        fn initialize(&mut self, _params: &ParameterSpace) -> TopoResult<()> {
            Ok(())
        }
        fn is_initialized(&self) -> bool {
            true
        }
        fn max_composites(&self, _input_capacities: &[usize]) -> usize {
            0
        }
        fn process(&self, inputs: &[&TobArray], ctx: &mut ProcessContext<'_>) -> TopoResult<()> {
            self.check_io(inputs, ctx)?;
            ctx.set_bit(0);
            Ok(())
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = AlgorithmRegistry::with_builtin();
        assert_eq!(
            registry.type_names(),
            vec![
                "DeltaEtaIncl1",
                "DeltaEtaIncl2",
                "DeltaRSqrIncl2",
                "DisambiguationDRIncl2",
                "InvariantMassInclusive2",
                "MetCut",
                "Multiplicity",
            ]
        );
    }

    #[test]
    fn test_create_resolves_concrete_type() {
        let registry = AlgorithmRegistry::with_builtin();
        let alg = registry.create("DeltaEtaIncl2", "DEta", 3).unwrap();
        assert!(matches!(alg, AnyAlgorithm::DeltaEtaIncl2(_)));
        assert_eq!(alg.name(), "DEta");
        assert_eq!(alg.output_bits(), 3);
        assert!(!alg.is_initialized());
    }

    #[test]
    fn test_unknown_type() {
        let registry = AlgorithmRegistry::with_builtin();
        assert_eq!(
            registry.create("Bogus", "x", 1).unwrap_err(),
            TopoError::UnknownAlgorithm("Bogus".into())
        );
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = AlgorithmRegistry::with_builtin();
        registry
            .register("AlwaysOn", |n, _| {
                AnyAlgorithm::Custom(Box::new(AlwaysOn { name: n.to_string() }))
            })
            .unwrap();
        assert!(registry.contains("AlwaysOn"));
        assert!(registry
            .register("AlwaysOn", |n, b| AnyAlgorithm::MetCut(MetCut::new(n, b)))
            .is_err());

        let alg = registry.create("AlwaysOn", "on", 1).unwrap();
        assert_eq!(alg.type_name(), "AlwaysOn");
    }
}
