//! Definition storage
//!
//! [`DefinitionMap`] is the mutable, insertion-ordered name → definition map
//! used while a container is being assembled. Once assembly is over it is
//! frozen into a [`DefinitionSnapshot`], which is immutable and indexed by
//! name and by produced type for resolution.

use crate::definition::ComponentDefinition;
use crate::types::TypeDescriptor;
use crate::{Result, WiringError};
use ahash::RandomState;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// The registry operations assembly-time extensions rely on
pub trait DefinitionRegistry {
    /// All definition names in registration order
    fn definition_names(&self) -> Vec<String>;

    /// The definition registered under `name`
    fn definition(&self, name: &str) -> Option<&ComponentDefinition>;

    /// Whether `name` is taken
    fn contains_definition(&self, name: &str) -> bool;

    /// Register `definition` under `name`.
    ///
    /// Fails with [`WiringError::AlreadyRegistered`] if the name is taken.
    fn register_definition(&mut self, name: String, definition: ComponentDefinition) -> Result<()>;

    /// Static type metadata of `name`, available without class loading
    fn declared_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.definition(name)
            .and_then(|definition| definition.declared_type().cloned())
    }

    /// Class name of `name`, for loading through a [`TypeLoader`](crate::TypeLoader)
    fn class_name(&self, name: &str) -> Option<String> {
        self.definition(name)
            .and_then(|definition| definition.class_name().map(str::to_owned))
    }
}

// =============================================================================
// Assembly-time map
// =============================================================================

/// Insertion-ordered definition map used during assembly
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    order: Vec<String>,
    definitions: HashMap<String, ComponentDefinition, RandomState>,
}

impl DefinitionMap {
    /// Create an empty map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentDefinition)> {
        self.order
            .iter()
            .filter_map(|name| self.definitions.get(name).map(|def| (name.as_str(), def)))
    }

    /// Freeze into an immutable snapshot
    pub fn freeze(self) -> DefinitionSnapshot {
        let Self {
            order,
            mut definitions,
        } = self;

        let entries: Vec<(String, ComponentDefinition)> = order
            .into_iter()
            .filter_map(|name| definitions.remove(&name).map(|def| (name, def)))
            .collect();

        DefinitionSnapshot::new(entries)
    }
}

impl DefinitionRegistry for DefinitionMap {
    fn definition_names(&self) -> Vec<String> {
        self.order.clone()
    }

    #[inline]
    fn definition(&self, name: &str) -> Option<&ComponentDefinition> {
        self.definitions.get(name)
    }

    #[inline]
    fn contains_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    fn register_definition(&mut self, name: String, definition: ComponentDefinition) -> Result<()> {
        if self.definitions.contains_key(&name) {
            return Err(WiringError::AlreadyRegistered { name });
        }
        self.order.push(name.clone());
        self.definitions.insert(name, definition);
        Ok(())
    }
}

// =============================================================================
// Frozen snapshot
// =============================================================================

/// Immutable, indexed view of the definitions of an assembled container
#[derive(Debug)]
pub struct DefinitionSnapshot {
    entries: Vec<(String, ComponentDefinition)>,
    by_name: HashMap<String, usize, RandomState>,
    by_type: HashMap<TypeId, Vec<usize>, RandomState>,
}

impl DefinitionSnapshot {
    fn new(entries: Vec<(String, ComponentDefinition)>) -> Self {
        let mut by_name = HashMap::with_capacity_and_hasher(entries.len(), RandomState::new());
        let mut by_type: HashMap<TypeId, Vec<usize>, RandomState> =
            HashMap::with_capacity_and_hasher(entries.len(), RandomState::new());

        for (index, (name, definition)) in entries.iter().enumerate() {
            by_name.insert(name.clone(), index);
            if let Some(target) = definition.target() {
                by_type.entry(target.id()).or_default().push(index);
            }
        }

        Self {
            entries,
            by_name,
            by_type,
        }
    }

    /// Number of definitions
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `name`
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Entry at `index`
    #[inline]
    pub fn entry(&self, index: usize) -> Option<(&str, &ComponentDefinition)> {
        self.entries
            .get(index)
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Definition registered under `name`
    #[inline]
    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.index_of(name).map(|index| &self.entries[index].1)
    }

    /// Positions of all definitions producing `type_id`, in registration order
    #[inline]
    pub fn indices_of_type(&self, type_id: &TypeId) -> &[usize] {
        self.by_type.get(type_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentDefinition)> {
        self.entries
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// All names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}
