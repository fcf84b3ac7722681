//! Effective inputs for one generation

use gpgen_templates::{InputMap, InputValue};

/// Flat input map produced per manifest and environment
///
/// Built fresh on every generation and never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveInputs {
    values: InputMap,
}

impl EffectiveInputs {
    /// Empty input set
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of an input
    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    /// Whether an input is set
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set an input, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: InputValue) {
        self.values.insert(name.into(), value);
    }

    /// Set an input only when it is not already present
    ///
    /// Returns whether the value was inserted.
    pub fn insert_if_absent(&mut self, name: &str, value: InputValue) -> bool {
        if self.values.contains_key(name) {
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }

    /// Mutable access to an input, inserting `default()` when it is absent
    pub fn get_or_insert_with(
        &mut self,
        name: &str,
        default: impl FnOnce() -> InputValue,
    ) -> &mut InputValue {
        self.values.entry(name.to_string()).or_insert_with(default)
    }

    /// Mutable access to an input
    pub fn get_mut(&mut self, name: &str) -> Option<&mut InputValue> {
        self.values.get_mut(name)
    }

    /// Overlay every entry of a map
    pub fn overlay(&mut self, layer: &InputMap) {
        for (name, value) in layer {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Boolean value of an input; strings such as `"true"` are not booleans
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(InputValue::as_bool)
    }

    /// Number of inputs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no inputs are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Underlying map, as exposed to expressions under `.Inputs`
    pub fn as_map(&self) -> &InputMap {
        &self.values
    }
}

impl From<InputMap> for EffectiveInputs {
    fn from(values: InputMap) -> Self {
        Self { values }
    }
}
