//! Error taxonomy for menu loading and event evaluation.

use thiserror::Error;

/// Root error type for the decision engine.
///
/// Almost every variant is a configuration error: it is raised while a
/// menu is being built or on the first `process` call, and must stop the
/// menu from being activated. The two event-input variants
/// ([`TopoError::MissingEventInput`], [`TopoError::CapacityExceeded`])
/// flag an orchestrator that broke the input contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopoError {
    /// A declared parameter has no value in the parameter store.
    #[error("{algorithm}: missing parameter {parameter}{}", bit_suffix(.bit))]
    MissingParameter {
        algorithm: String,
        parameter: String,
        bit: Option<usize>,
    },

    /// The parameter store holds a parameter the algorithm never declared.
    #[error("{algorithm}: unknown parameter {parameter}")]
    UnknownParameter { algorithm: String, parameter: String },

    /// The same (name, bit) pair was given twice.
    #[error("{algorithm}: parameter {parameter}{} defined more than once", bit_suffix(.bit))]
    DuplicateParameter {
        algorithm: String,
        parameter: String,
        bit: Option<usize>,
    },

    /// A parameter value is out of its legal range.
    #[error("{algorithm}: invalid value {value} for {parameter}: {reason}")]
    InvalidParameter {
        algorithm: String,
        parameter: String,
        value: i64,
        reason: String,
    },

    /// An algorithm asked for the same parameter twice during initialization.
    #[error("{algorithm}: parameter {parameter}{} resolved twice", bit_suffix(.bit))]
    ParameterResolvedTwice {
        algorithm: String,
        parameter: String,
        bit: Option<usize>,
    },

    /// An algorithm declared a parameter but never read it.
    #[error("{algorithm}: declared parameter {parameter} was never resolved")]
    UnresolvedParameter { algorithm: String, parameter: String },

    /// Wrong number of input arrays for the algorithm.
    #[error("{algorithm}: expected {expected} input arrays, got {got}")]
    InputCount {
        algorithm: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of output arrays for the algorithm.
    #[error("{algorithm}: expected {expected} output arrays, got {got}")]
    OutputCount {
        algorithm: String,
        expected: usize,
        got: usize,
    },

    /// `process` was called before a successful `initialize`.
    #[error("{algorithm}: process called before initialize")]
    NotInitialized { algorithm: String },

    /// No constructor is registered under this algorithm type name.
    #[error("unknown algorithm type {0}")]
    UnknownAlgorithm(String),

    /// An algorithm reads an array no one produces.
    #[error("{algorithm}: input {input} is neither an event input nor an earlier output")]
    UnknownInput { algorithm: String, input: String },

    /// Two instances, inputs or outputs share a name.
    #[error("duplicate name {0}")]
    DuplicateName(String),

    /// Decision width outside the supported range.
    #[error("decision width {width} is outside 1..={max}")]
    DecisionWidth { width: usize, max: usize },

    /// Any other menu-level inconsistency.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The orchestrator did not supply a declared input array.
    #[error("event input {0} was not supplied")]
    MissingEventInput(String),

    /// More candidates than the array's hardware capacity.
    #[error("array {array} exceeds its capacity of {capacity}")]
    CapacityExceeded { array: String, capacity: usize },
}

impl TopoError {
    /// Returns `true` for errors that must abort menu activation.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            TopoError::MissingEventInput(_) | TopoError::CapacityExceeded { .. }
        )
    }
}

fn bit_suffix(bit: &Option<usize>) -> String {
    match bit {
        Some(b) => format!("[bit {b}]"),
        None => String::new(),
    }
}

/// Result alias used throughout the crate.
pub type TopoResult<T> = Result<T, TopoError>;
