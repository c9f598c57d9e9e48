//! Named parameter values and algorithm parameter declarations.

/// One configured value, optionally bound to an output bit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: String,
    pub value: i64,
    /// Output bit this value applies to; `None` for instance-wide values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub selection: Option<usize>,
}

/// The parameter store of one algorithm instance.
///
/// # Examples
///
/// ```
/// use l1topo_core::params::ParameterSpace;
///
/// let space = ParameterSpace::new()
///     .with_parameter("MaxTob1", 6)
///     .with_bit_parameters("MinET1", &[20, 40]);
///
/// assert_eq!(space.get("MaxTob1", None), Some(6));
/// assert_eq!(space.get("MinET1", Some(1)), Some(40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance-wide value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: i64) -> Self {
        self.push(name, value, None);
        self
    }

    /// Adds a value for one output bit.
    pub fn with_bit_parameter(mut self, name: impl Into<String>, bit: usize, value: i64) -> Self {
        self.push(name, value, Some(bit));
        self
    }

    /// Adds one value per output bit, bit `i` taking `values[i]`.
    pub fn with_bit_parameters(mut self, name: impl Into<String>, values: &[i64]) -> Self {
        let name = name.into();
        for (bit, &value) in values.iter().enumerate() {
            self.push(name.clone(), value, Some(bit));
        }
        self
    }

    /// Appends a raw entry. Duplicates are kept and reported at resolve time.
    pub fn push(&mut self, name: impl Into<String>, value: i64, selection: Option<usize>) {
        self.parameters.push(Parameter {
            name: name.into(),
            value,
            selection,
        });
    }

    /// First value stored under `(name, selection)`.
    pub fn get(&self, name: &str, selection: Option<usize>) -> Option<i64> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.selection == selection)
            .map(|p| p.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<Parameter> for ParameterSpace {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

/// Whether a declared parameter has one value or one value per output bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterScope {
    Global,
    PerBit,
}

/// A parameter an algorithm reads during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDecl {
    pub name: &'static str,
    pub scope: ParameterScope,
}

/// Everything an algorithm type declares it will read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    decls: Vec<ParameterDecl>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(mut self, name: &'static str) -> Self {
        self.decls.push(ParameterDecl {
            name,
            scope: ParameterScope::Global,
        });
        self
    }

    pub fn per_bit(mut self, name: &'static str) -> Self {
        self.decls.push(ParameterDecl {
            name,
            scope: ParameterScope::PerBit,
        });
        self
    }

    pub fn find(&self, name: &str) -> Option<&ParameterDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
