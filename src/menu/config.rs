//! Static menu configuration.

use crate::decision::MAX_DECISION_BITS;
use crate::error::{TopoError, TopoResult};
use crate::params::ParameterSpace;
use std::collections::HashSet;

/// An event-level input list the orchestrator provides for every event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputDecl {
    pub name: String,
    /// Upper bound on the list length.
    pub capacity: usize,
}

impl InputDecl {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// One algorithm instance of a menu.
///
/// `inputs` name either event inputs or output arrays of instances
/// configured earlier. `outputs` is empty for a decision-only instance,
/// otherwise it holds one array name per output bit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmConfig {
    /// Registry type name, e.g. `"DeltaEtaIncl2"`.
    pub algorithm_type: String,
    /// Instance name, unique within the menu.
    pub name: String,
    pub inputs: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outputs: Vec<String>,
    pub output_bits: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: ParameterSpace,
}

impl AlgorithmConfig {
    pub fn new(algorithm_type: impl Into<String>, name: impl Into<String>, output_bits: usize) -> Self {
        Self {
            algorithm_type: algorithm_type.into(),
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            output_bits,
            parameters: ParameterSpace::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    pub fn with_parameters(mut self, parameters: ParameterSpace) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A complete trigger menu: event inputs plus algorithm instances in
/// evaluation order.
///
/// # Examples
///
/// ```
/// use l1topo_core::menu::{AlgorithmConfig, MenuConfig};
/// use l1topo_core::params::ParameterSpace;
///
/// let config = MenuConfig::new("physics")
///     .with_input("Jets", 6)
///     .with_algorithm(
///         AlgorithmConfig::new("Multiplicity", "2J20", 1)
///             .with_input("Jets")
///             .with_parameters(
///                 ParameterSpace::new()
///                     .with_parameter("MaxTob", 6)
///                     .with_bit_parameters("MinET", &[20])
///                     .with_bit_parameters("EtaMax", &[49])
///                     .with_bit_parameters("MinCount", &[2]),
///             ),
///     );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuConfig {
    pub name: String,
    pub inputs: Vec<InputDecl>,
    pub algorithms: Vec<AlgorithmConfig>,
}

impl MenuConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, capacity: usize) -> Self {
        self.inputs.push(InputDecl::new(name, capacity));
        self
    }

    pub fn with_algorithm(mut self, algorithm: AlgorithmConfig) -> Self {
        self.algorithms.push(algorithm);
        self
    }

    /// Checks the configuration graph.
    ///
    /// Every name (event input, instance, output array) is unique, every
    /// instance input refers to an event input or to an output of an
    /// earlier instance, output widths fit a decision word, and the output
    /// array list is empty or matches the width. Algorithm types, input
    /// counts and parameters are checked when the menu is built.
    pub fn validate(&self) -> TopoResult<()> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut available: HashSet<&str> = HashSet::new();

        for input in &self.inputs {
            if !names.insert(&input.name) {
                return Err(TopoError::DuplicateName(input.name.clone()));
            }
            if input.capacity == 0 {
                return Err(TopoError::InvalidConfig(format!(
                    "input {} has zero capacity",
                    input.name
                )));
            }
            available.insert(&input.name);
        }

        for alg in &self.algorithms {
            if !names.insert(&alg.name) {
                return Err(TopoError::DuplicateName(alg.name.clone()));
            }
            if alg.output_bits == 0 || alg.output_bits > MAX_DECISION_BITS {
                return Err(TopoError::DecisionWidth {
                    width: alg.output_bits,
                    max: MAX_DECISION_BITS,
                });
            }
            if !alg.outputs.is_empty() && alg.outputs.len() != alg.output_bits {
                return Err(TopoError::OutputCount {
                    algorithm: alg.name.clone(),
                    expected: alg.output_bits,
                    got: alg.outputs.len(),
                });
            }
            if let Some(missing) = alg.inputs.iter().find(|i| !available.contains(i.as_str())) {
                return Err(TopoError::UnknownInput {
                    algorithm: alg.name.clone(),
                    input: missing.clone(),
                });
            }
            for output in &alg.outputs {
                if !names.insert(output) {
                    return Err(TopoError::DuplicateName(output.clone()));
                }
                available.insert(output);
            }
        }
        Ok(())
    }
}
