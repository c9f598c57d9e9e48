//! Checked, exactly-once resolution of a parameter store.

use super::space::{ParameterSchema, ParameterScope, ParameterSpace};
use crate::error::{TopoError, TopoResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

type Key = (&'static str, Option<usize>);

/// Resolves an algorithm's declared parameters from its store.
///
/// Construction validates the store against the schema:
/// every declared value must be present (per bit for per-bit
/// parameters), nothing undeclared may appear, and no `(name, bit)` pair
/// may be given twice. Each value can then be taken exactly once, and
/// [`ParameterResolver::finish`] fails if a declared value was never taken.
#[derive(Debug)]
pub struct ParameterResolver<'a> {
    algorithm: &'a str,
    values: HashMap<Key, i64>,
    taken: HashSet<Key>,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(
        algorithm: &'a str,
        schema: &ParameterSchema,
        space: &ParameterSpace,
        output_bits: usize,
    ) -> TopoResult<Self> {
        let mut values: HashMap<Key, i64> = HashMap::with_capacity(space.len());

        for param in space.iter() {
            let decl = schema
                .find(&param.name)
                .ok_or_else(|| TopoError::UnknownParameter {
                    algorithm: algorithm.to_string(),
                    parameter: param.name.clone(),
                })?;

            match (decl.scope, param.selection) {
                (ParameterScope::Global, Some(_)) => {
                    return Err(TopoError::InvalidParameter {
                        algorithm: algorithm.to_string(),
                        parameter: param.name.clone(),
                        value: param.value,
                        reason: "instance-wide parameter given for a single bit".into(),
                    });
                }
                (ParameterScope::PerBit, None) => {
                    return Err(TopoError::InvalidParameter {
                        algorithm: algorithm.to_string(),
                        parameter: param.name.clone(),
                        value: param.value,
                        reason: "per-bit parameter given without a bit".into(),
                    });
                }
                (ParameterScope::PerBit, Some(bit)) if bit >= output_bits => {
                    return Err(TopoError::InvalidParameter {
                        algorithm: algorithm.to_string(),
                        parameter: param.name.clone(),
                        value: param.value,
                        reason: format!("bit {bit} outside {output_bits} output bits"),
                    });
                }
                _ => {}
            }

            if values.insert((decl.name, param.selection), param.value).is_some() {
                return Err(TopoError::DuplicateParameter {
                    algorithm: algorithm.to_string(),
                    parameter: param.name.clone(),
                    bit: param.selection,
                });
            }
        }

        for decl in schema.iter() {
            let missing = match decl.scope {
                ParameterScope::Global => (!values.contains_key(&(decl.name, None))).then_some(None),
                ParameterScope::PerBit => (0..output_bits)
                    .find(|&bit| !values.contains_key(&(decl.name, Some(bit))))
                    .map(Some),
            };
            if let Some(bit) = missing {
                return Err(TopoError::MissingParameter {
                    algorithm: algorithm.to_string(),
                    parameter: decl.name.to_string(),
                    bit,
                });
            }
        }

        Ok(Self {
            algorithm,
            values,
            taken: HashSet::new(),
        })
    }

    /// Instance name the resolver reports errors for.
    pub fn algorithm(&self) -> &str {
        self.algorithm
    }

    fn take_key(&mut self, name: &'static str, bit: Option<usize>) -> TopoResult<i64> {
        let (&key, &value) = self
            .values
            .get_key_value(&(name, bit))
            .ok_or_else(|| TopoError::MissingParameter {
                algorithm: self.algorithm.to_string(),
                parameter: name.to_string(),
                bit,
            })?;
        if !self.taken.insert(key) {
            return Err(TopoError::ParameterResolvedTwice {
                algorithm: self.algorithm.to_string(),
                parameter: name.to_string(),
                bit,
            });
        }
        debug!(
            algorithm = self.algorithm,
            parameter = name,
            bit = ?bit,
            value,
            "resolved parameter"
        );
        Ok(value)
    }

    /// Takes an instance-wide value.
    pub fn take(&mut self, name: &'static str) -> TopoResult<i64> {
        self.take_key(name, None)
    }

    /// Takes the value for one bit.
    pub fn take_bit(&mut self, name: &'static str, bit: usize) -> TopoResult<i64> {
        self.take_key(name, Some(bit))
    }

    /// Takes an instance-wide value as a non-negative count.
    pub fn take_usize(&mut self, name: &'static str) -> TopoResult<usize> {
        let value = self.take(name)?;
        usize::try_from(value).map_err(|_| self.negative(name, value))
    }

    /// Takes every bit's value as a non-negative `u32`.
    pub fn take_bits_u32(&mut self, name: &'static str, bits: usize) -> TopoResult<Vec<u32>> {
        (0..bits)
            .map(|bit| {
                let value = self.take_bit(name, bit)?;
                u32::try_from(value).map_err(|_| self.negative(name, value))
            })
            .collect()
    }

    /// Takes every bit's value as a non-negative `u64`.
    pub fn take_bits_u64(&mut self, name: &'static str, bits: usize) -> TopoResult<Vec<u64>> {
        (0..bits)
            .map(|bit| {
                let value = self.take_bit(name, bit)?;
                u64::try_from(value).map_err(|_| self.negative(name, value))
            })
            .collect()
    }

    fn negative(&self, name: &str, value: i64) -> TopoError {
        TopoError::InvalidParameter {
            algorithm: self.algorithm.to_string(),
            parameter: name.to_string(),
            value,
            reason: "negative or out of range".into(),
        }
    }

    /// Fails if any declared value was never taken.
    pub fn finish(self) -> TopoResult<()> {
        let mut pending: Vec<&Key> = self
            .values
            .keys()
            .filter(|k| !self.taken.contains(*k))
            .collect();
        pending.sort();
        match pending.first() {
            Some((name, _)) => Err(TopoError::UnresolvedParameter {
                algorithm: self.algorithm.to_string(),
                parameter: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}
