//! Ordered, name-indexed collections of a model's layers

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};
use crate::layer::{LayerInterface, LayerMode};

/// An ordered list of layer interfaces with lookup by name
#[derive(Debug, Clone, Default)]
pub struct LayerList {
    /// Interfaces in declaration order
    interfaces: Vec<LayerInterface>,

    /// Positions by name for faster lookup
    indices: HashMap<String, usize>,
}

impl LayerList {
    /// Create a list from interfaces in declaration order
    ///
    /// Names must be unique within the list.
    pub fn new(interfaces: Vec<LayerInterface>) -> Result<Self> {
        let mut indices = HashMap::with_capacity(interfaces.len());
        for (i, interface) in interfaces.iter().enumerate() {
            if indices.insert(interface.name().to_string(), i).is_some() {
                return Err(Error::DuplicateLayerName(interface.name().to_string()));
            }
        }

        Ok(Self {
            interfaces,
            indices,
        })
    }

    /// Get an interface by position
    pub fn get(&self, index: usize) -> Result<&LayerInterface> {
        self.interfaces.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.interfaces.len(),
        })
    }

    /// Get an interface by name
    pub fn get_by_name(&self, name: &str) -> Result<&LayerInterface> {
        let index = self.index_of(name)?;
        Ok(&self.interfaces[index])
    }

    /// Position of the interface with the given name
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Whether an interface with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Layer names in declaration order
    pub fn keys(&self) -> Vec<&str> {
        self.interfaces.iter().map(LayerInterface::name).collect()
    }

    /// Number of interfaces
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Iterate interfaces in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, LayerInterface> {
        self.interfaces.iter()
    }
}

impl Index<usize> for LayerList {
    type Output = LayerInterface;

    fn index(&self, index: usize) -> &Self::Output {
        &self.interfaces[index]
    }
}

impl<'a> IntoIterator for &'a LayerList {
    type Item = &'a LayerInterface;
    type IntoIter = std::slice::Iter<'a, LayerInterface>;

    fn into_iter(self) -> Self::IntoIter {
        self.interfaces.iter()
    }
}

/// The inputs, outputs and placeholders of a model
///
/// Built once when a model is loaded and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct IoIndex {
    inputs: LayerList,
    outputs: LayerList,
    placeholders: LayerList,
}

impl IoIndex {
    /// Create an index from the three layer collections
    ///
    /// Each interface must carry the mode of the collection it is placed in.
    pub fn new(
        inputs: Vec<LayerInterface>,
        outputs: Vec<LayerInterface>,
        placeholders: Vec<LayerInterface>,
    ) -> Result<Self> {
        check_modes(&inputs, LayerMode::Input)?;
        check_modes(&outputs, LayerMode::Output)?;
        check_modes(&placeholders, LayerMode::Placeholder)?;

        Ok(Self {
            inputs: LayerList::new(inputs)?,
            outputs: LayerList::new(outputs)?,
            placeholders: LayerList::new(placeholders)?,
        })
    }

    /// Input layers
    pub fn inputs(&self) -> &LayerList {
        &self.inputs
    }

    /// Output layers
    pub fn outputs(&self) -> &LayerList {
        &self.outputs
    }

    /// Placeholder layers
    pub fn placeholders(&self) -> &LayerList {
        &self.placeholders
    }
}

fn check_modes(interfaces: &[LayerInterface], mode: LayerMode) -> Result<()> {
    match interfaces.iter().find(|interface| interface.mode() != mode) {
        Some(interface) => Err(Error::InvalidArgument(format!(
            "Layer '{}' has mode {:?} but was listed as {:?}",
            interface.name(),
            interface.mode(),
            mode
        ))),
        None => Ok(()),
    }
}

impl fmt::Display for IoIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inputs: {}", self.inputs.len())?;
        for interface in &self.inputs {
            writeln!(f, "  {interface}")?;
        }
        writeln!(f, "Outputs: {}", self.outputs.len())?;
        for interface in &self.outputs {
            writeln!(f, "  {interface}")?;
        }
        writeln!(f, "Placeholders: {}", self.placeholders.len())?;
        for interface in &self.placeholders {
            writeln!(f, "  {interface}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::VectorLayerDescription;

    fn input(name: &str) -> LayerInterface {
        LayerInterface::new(name, LayerMode::Input, VectorLayerDescription::new(vec![1], false).unwrap())
    }

    #[test]
    fn test_lookup_by_name_and_position_agree() {
        let index = IoIndex::new(vec![input("foo"), input("bar")], vec![], vec![]).unwrap();
        let inputs = index.inputs();

        assert_eq!(inputs.len(), 2);
        assert!(std::ptr::eq(inputs.get(0).unwrap(), inputs.get_by_name("foo").unwrap()));
        assert!(std::ptr::eq(inputs.get(1).unwrap(), inputs.get_by_name("bar").unwrap()));
        assert_eq!(inputs.keys(), vec!["foo", "bar"]);
        assert_eq!(inputs.index_of("bar").unwrap(), 1);
        assert_eq!(inputs[0].name(), "foo");
    }

    #[test]
    fn test_missing_name_is_not_found() {
        let index = IoIndex::new(vec![input("foo")], vec![], vec![]).unwrap();
        assert!(matches!(index.inputs().get_by_name("baz"), Err(Error::NotFound(name)) if name == "baz"));
        assert!(matches!(
            index.inputs().get(3),
            Err(Error::IndexOutOfBounds { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = IoIndex::new(vec![input("foo"), input("foo")], vec![], vec![]);
        assert!(matches!(result, Err(Error::DuplicateLayerName(name)) if name == "foo"));
    }

    #[test]
    fn test_same_name_in_different_collections() {
        let output = LayerInterface::new(
            "foo",
            LayerMode::Output,
            VectorLayerDescription::new(vec![1], false).unwrap(),
        );
        let index = IoIndex::new(vec![input("foo")], vec![output], vec![]).unwrap();
        assert_eq!(index.inputs().len(), 1);
        assert_eq!(index.outputs().len(), 1);
        assert!(index.placeholders().is_empty());
    }

    #[test]
    fn test_mode_must_match_collection() {
        let result = IoIndex::new(vec![], vec![input("foo")], vec![]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    static_assertions::assert_impl_all!(IoIndex: Send, Sync);
}
