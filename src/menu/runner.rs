//! Menu build and per-event evaluation.

use super::config::{InputDecl, MenuConfig};
use crate::algorithm::{AlgorithmRegistry, AnyAlgorithm, DecisionAlgorithm, ProcessContext};
use crate::decision::Decision;
use crate::error::{TopoError, TopoResult};
use crate::tob::{CompositeArena, OutputArray, TobArray};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Most composites a fresh arena reserves up front.
pub const ARENA_PRESIZE_LIMIT: usize = 1 << 16;

/// The event-level input lists for one event, keyed by array name.
#[derive(Debug, Clone, Default)]
pub struct EventInputs {
    arrays: HashMap<String, TobArray>,
}

impl EventInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_array(mut self, array: TobArray) -> Self {
        self.insert(array);
        self
    }

    /// Adds a list under its own name, returning any list it replaces.
    pub fn insert(&mut self, array: TobArray) -> Option<TobArray> {
        self.arrays.insert(array.name().to_string(), array)
    }

    pub fn get(&self, name: &str) -> Option<&TobArray> {
        self.arrays.get(name)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

impl FromIterator<TobArray> for EventInputs {
    fn from_iter<I: IntoIterator<Item = TobArray>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for array in iter {
            inputs.insert(array);
        }
        inputs
    }
}

/// What one instance produced for one event.
#[derive(Debug, Clone)]
pub struct InstanceResult {
    pub name: String,
    pub decision: Decision,
    /// Composite ids per output bit, valid against the arena the event
    /// was evaluated with until it is cleared.
    pub outputs: Vec<OutputArray>,
}

/// Decisions and output arrays of every instance, in menu order.
#[derive(Debug, Clone, Default)]
pub struct EventResult {
    instances: Vec<InstanceResult>,
}

impl EventResult {
    pub fn decision(&self, instance: &str) -> Option<&Decision> {
        self.instance(instance).map(|r| &r.decision)
    }

    pub fn outputs(&self, instance: &str) -> Option<&[OutputArray]> {
        self.instance(instance).map(|r| r.outputs.as_slice())
    }

    /// Finds an output array by its own name.
    pub fn output(&self, array: &str) -> Option<&OutputArray> {
        self.instances
            .iter()
            .flat_map(|r| r.outputs.iter())
            .find(|o| o.name() == array)
    }

    pub fn instance(&self, name: &str) -> Option<&InstanceResult> {
        self.instances.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstanceResult> {
        self.instances.iter()
    }

    /// Drops the composite outputs, keeping the decisions in menu order.
    pub fn into_decisions(self) -> Vec<Decision> {
        self.instances.into_iter().map(|r| r.decision).collect()
    }
}

#[derive(Debug, Clone)]
enum InputRef {
    Event(String),
    /// Index into the per-event list of materialized output arrays.
    Composite(usize),
}

#[derive(Debug)]
struct Stage {
    algorithm: AnyAlgorithm,
    inputs: Vec<InputRef>,
    outputs: Vec<String>,
    /// Per output: whether a later stage reads it.
    materialize: Vec<bool>,
}

/// A built, immutable trigger menu.
///
/// Every algorithm has been created, checked against its input count and
/// initialized; evaluation never reconfigures anything, so one menu can
/// be shared across threads with one [`CompositeArena`] per thread.
///
/// # Examples
///
/// ```
/// use l1topo_core::algorithm::AlgorithmRegistry;
/// use l1topo_core::menu::{AlgorithmConfig, EventInputs, MenuConfig, TopoMenu};
/// use l1topo_core::params::ParameterSpace;
/// use l1topo_core::tob::{GenericTob, TobArray, TobKind};
///
/// let config = MenuConfig::new("demo")
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
/// let menu = TopoMenu::build(config, &AlgorithmRegistry::with_builtin()).unwrap();
///
/// let jets = TobArray::from_tobs(
///     "Jets",
///     6,
///     [
///         GenericTob::new(TobKind::Jet, 40, 0, 0),
///         GenericTob::new(TobKind::Jet, 25, 10, 30),
///     ],
/// )
/// .unwrap();
/// let mut arena = menu.new_arena();
/// let result = menu.evaluate(&EventInputs::new().with_array(jets), &mut arena).unwrap();
/// assert!(result.decision("2J20").unwrap().bit(0));
/// ```
#[derive(Debug)]
pub struct TopoMenu {
    name: String,
    inputs: Vec<InputDecl>,
    stages: Vec<Stage>,
    composite_bound: usize,
}

impl TopoMenu {
    /// Validates the configuration and instantiates every algorithm.
    pub fn build(config: MenuConfig, registry: &AlgorithmRegistry) -> TopoResult<Self> {
        config.validate()?;

        let consumed: HashSet<&str> = config
            .algorithms
            .iter()
            .flat_map(|a| a.inputs.iter().map(String::as_str))
            .collect();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        // Longest list each name can carry in one event.
        let mut capacities: HashMap<&str, usize> = config
            .inputs
            .iter()
            .map(|decl| (decl.name.as_str(), decl.capacity))
            .collect();
        let mut stages = Vec::with_capacity(config.algorithms.len());
        let mut composite_bound = 0usize;

        for alg_cfg in &config.algorithms {
            let mut algorithm =
                registry.create(&alg_cfg.algorithm_type, &alg_cfg.name, alg_cfg.output_bits)?;
            if alg_cfg.inputs.len() != algorithm.input_count() {
                return Err(TopoError::InputCount {
                    algorithm: alg_cfg.name.clone(),
                    expected: algorithm.input_count(),
                    got: alg_cfg.inputs.len(),
                });
            }
            algorithm.initialize(&alg_cfg.parameters)?;

            let inputs = alg_cfg
                .inputs
                .iter()
                .map(|name| match slots.get(name.as_str()) {
                    Some(&slot) => InputRef::Composite(slot),
                    None => InputRef::Event(name.clone()),
                })
                .collect();
            let materialize: Vec<bool> = alg_cfg
                .outputs
                .iter()
                .map(|out| consumed.contains(out.as_str()))
                .collect();
            for (out, &keep) in alg_cfg.outputs.iter().zip(&materialize) {
                if keep {
                    let slot = slots.len();
                    slots.insert(out.as_str(), slot);
                }
            }

            let input_capacities: Vec<usize> = alg_cfg
                .inputs
                .iter()
                .map(|name| capacities.get(name.as_str()).copied().unwrap_or(usize::MAX))
                .collect();
            let stage_bound = algorithm.max_composites(&input_capacities);
            if !alg_cfg.outputs.is_empty() {
                composite_bound = composite_bound.saturating_add(stage_bound);
                let per_output = stage_bound / alg_cfg.output_bits.max(1);
                for out in &alg_cfg.outputs {
                    capacities.insert(out.as_str(), per_output);
                }
            }
            debug!(
                menu = %config.name,
                algorithm = %alg_cfg.name,
                kind = algorithm.type_name(),
                "instance ready"
            );
            stages.push(Stage {
                algorithm,
                inputs,
                outputs: alg_cfg.outputs.clone(),
                materialize,
            });
        }

        info!(
            menu = %config.name,
            algorithms = stages.len(),
            inputs = config.inputs.len(),
            composite_bound,
            "menu built"
        );

        Ok(Self {
            name: config.name,
            inputs: config.inputs,
            stages,
            composite_bound,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[InputDecl] {
        &self.inputs
    }

    /// Instance names in evaluation order.
    pub fn algorithm_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.stages.iter().map(|s| s.algorithm.name())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Worst-case number of composites created in one event.
    pub fn composite_bound(&self) -> usize {
        self.composite_bound
    }

    /// An arena sized for the worst-case event of this menu, up to
    /// [`ARENA_PRESIZE_LIMIT`] composites. It grows past that on demand.
    pub fn new_arena(&self) -> CompositeArena {
        CompositeArena::with_capacity(self.composite_bound.min(ARENA_PRESIZE_LIMIT))
    }

    fn check_event(&self, event: &EventInputs) -> TopoResult<()> {
        for decl in &self.inputs {
            let array = event
                .get(&decl.name)
                .ok_or_else(|| TopoError::MissingEventInput(decl.name.clone()))?;
            if array.len() > decl.capacity {
                return Err(TopoError::CapacityExceeded {
                    array: decl.name.clone(),
                    capacity: decl.capacity,
                });
            }
        }
        Ok(())
    }

    /// Evaluates one event.
    ///
    /// Clears `arena` first; the composite ids in the result stay valid
    /// until the next call with the same arena.
    pub fn evaluate(&self, event: &EventInputs, arena: &mut CompositeArena) -> TopoResult<EventResult> {
        arena.clear();
        self.check_event(event)?;

        let mut materialized: Vec<TobArray> = Vec::new();
        let mut instances = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let name = stage.algorithm.name();
            let inputs = stage
                .inputs
                .iter()
                .map(|input| match input {
                    InputRef::Event(array) => event
                        .get(array)
                        .ok_or_else(|| TopoError::MissingEventInput(array.clone())),
                    InputRef::Composite(slot) => materialized.get(*slot).ok_or_else(|| {
                        TopoError::InvalidConfig(format!("{name}: composite input {slot} not produced"))
                    }),
                })
                .collect::<TopoResult<Vec<&TobArray>>>()?;

            let mut decision = Decision::new(stage.algorithm.output_bits())?;
            let mut outputs: Vec<OutputArray> =
                stage.outputs.iter().map(|o| OutputArray::new(o.as_str())).collect();
            let mut ctx = ProcessContext::new(&mut decision, &mut outputs, arena);
            stage.algorithm.process(&inputs, &mut ctx)?;
            drop(inputs);

            for (out, &keep) in outputs.iter().zip(&stage.materialize) {
                if keep {
                    materialized.push(out.to_tob_array(arena)?);
                }
            }
            instances.push(InstanceResult {
                name: name.to_string(),
                decision,
                outputs,
            });
        }

        Ok(EventResult { instances })
    }

    /// Evaluates independent events and returns their decisions in menu
    /// order.
    ///
    /// With the `parallel` feature, events are spread over the rayon pool
    /// with one arena per worker.
    pub fn evaluate_batch(&self, events: &[EventInputs]) -> TopoResult<Vec<Vec<Decision>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            events
                .par_iter()
                .map_init(
                    || self.new_arena(),
                    |arena, event| self.evaluate(event, arena).map(EventResult::into_decisions),
                )
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut arena = self.new_arena();
            events
                .iter()
                .map(|event| self.evaluate(event, &mut arena).map(EventResult::into_decisions))
                .collect()
        }
    }
}
