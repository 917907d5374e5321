//! Bounded, clampable named values and the ordered list the dashboard edits.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{JdError, Result};

// ──────────────────── parameter ────────────────────

/// A named value that always lies within its inclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    name: String,
    min: f64,
    max: f64,
    value: f64,
}

impl Parameter {
    /// Build a parameter, clamping `value` into `[min, max]`.
    ///
    /// Fails when the name is empty, a bound or the initial value is not
    /// finite, or `min > max`. Bounds are never swapped.
    pub fn new(name: impl Into<String>, min: f64, max: f64, value: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(JdError::invalid_parameter(&name, "name must not be empty"));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(JdError::invalid_parameter(
                &name,
                format!("bounds must be finite, got [{min}, {max}]"),
            ));
        }
        if min > max {
            return Err(JdError::invalid_parameter(
                &name,
                format!("min {min} > max {max}"),
            ));
        }
        if !value.is_finite() {
            return Err(JdError::invalid_parameter(
                &name,
                format!("initial value must be finite, got {value}"),
            ));
        }

        let mut param = Self {
            name,
            min,
            max,
            value: min,
        };
        param.set_value(value);
        Ok(param)
    }

    /// Assign `clamp(v, min, max)`. Never fails.
    ///
    /// Infinite input lands on the matching bound; NaN leaves the value untouched.
    pub fn set_value(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.value = v.clamp(self.min, self.max);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Inclusive `(min, max)` bounds.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of the value within its bounds, in `0.0..=1.0`.
    ///
    /// Degenerate bounds (`min == max`) report `0.0`.
    #[must_use]
    pub fn proportion(&self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

// ──────────────────── initial data ────────────────────

/// One `(name, min, max, value)` tuple of caller-supplied initial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            value,
        }
    }
}

impl TryFrom<ParameterSpec> for Parameter {
    type Error = JdError;

    fn try_from(spec: ParameterSpec) -> Result<Self> {
        Self::new(spec.name, spec.min, spec.max, spec.value)
    }
}

/// On-disk layout of a parameter file: a sequence of `[[parameter]]` tables.
#[derive(Debug, Deserialize)]
struct ParameterFile {
    #[serde(default)]
    parameter: Vec<ParameterSpec>,
}

// ──────────────────── parameter list ────────────────────

/// Ordered, fixed-length sequence of parameters. Index order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterList {
    items: Vec<Parameter>,
}

impl ParameterList {
    /// Validate every spec and build the list, failing on the first malformed entry.
    pub fn from_specs(specs: impl IntoIterator<Item = ParameterSpec>) -> Result<Self> {
        let items = specs
            .into_iter()
            .map(Parameter::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Parse `[[parameter]]` tables from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ParameterFile = toml::from_str(raw)?;
        Self::from_specs(file.parameter)
    }

    /// Read and parse a TOML parameter file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| JdError::io(path, source))?;
        Self::from_toml_str(&raw)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Parameter> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Parameter] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ──────────────────── tests ────────────────────
