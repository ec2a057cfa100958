//! Parameter model seam.
//!
//! The engine only needs to look parameters up by id, read and write their
//! current values, and push the model opacity. Hosts implement
//! [`ParameterModel`] over their own rig; [`ParameterTable`] is a small
//! in-memory implementation for tools and tests.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// The posable model written by motions.
pub trait ParameterModel {
    /// Index of the parameter named `id`, or `None` when the model lacks it.
    fn parameter_index(&self, id: &str) -> Option<usize>;

    fn parameter_value(&self, index: usize) -> f32;

    fn set_parameter_value(&mut self, index: usize, value: f32);

    fn set_model_opacity(&mut self, opacity: f32);

    /// Current value by id; `None` when the parameter does not exist.
    fn parameter_value_by_id(&self, id: &str) -> Option<f32> {
        self.parameter_index(id).map(|i| self.parameter_value(i))
    }

    /// Write by id; returns false (and writes nothing) for unknown ids.
    fn set_parameter_value_by_id(&mut self, id: &str, value: f32) -> bool {
        match self.parameter_index(id) {
            Some(i) => {
                self.set_parameter_value(i, value);
                true
            }
            None => false,
        }
    }
}

/// One row of a [`ParameterTable`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSlot {
    pub id: String,
    pub value: f32,
    pub default: f32,
}

/// Flat parameter store indexed by insertion order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterTable {
    slots: Vec<ParameterSlot>,
    index: HashMap<String, usize>,
    opacity: f32,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            opacity: 1.0,
        }
    }
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; see [`ParameterTable::add_parameter`].
    pub fn with_parameter(mut self, id: impl Into<String>, default: f32) -> Self {
        self.add_parameter(id, default);
        self
    }

    /// Insert a parameter initialized to `default`, or reset the default of an
    /// existing one. Returns its index.
    pub fn add_parameter(&mut self, id: impl Into<String>, default: f32) -> usize {
        let id = id.into();
        if let Some(&i) = self.index.get(&id) {
            self.slots[i].default = default;
            self.slots[i].value = default;
            return i;
        }
        let i = self.slots.len();
        self.index.insert(id.clone(), i);
        self.slots.push(ParameterSlot {
            id,
            value: default,
            default,
        });
        i
    }

    /// Current value by id, if present.
    pub fn value(&self, id: &str) -> Option<f32> {
        self.index.get(id).map(|&i| self.slots[i].value)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[ParameterSlot] {
        &self.slots
    }

    /// Restore every parameter to its default and the opacity to 1.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.value = slot.default;
        }
        self.opacity = 1.0;
    }
}

impl ParameterModel for ParameterTable {
    fn parameter_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn parameter_value(&self, index: usize) -> f32 {
        self.slots.get(index).map_or(0.0, |s| s.value)
    }

    fn set_parameter_value(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.value = value;
        }
    }

    fn set_model_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}
