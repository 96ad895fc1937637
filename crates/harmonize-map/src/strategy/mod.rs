//! Pluggable matching strategies and their name registries.
//!
//! Strategies are looked up by name through a [`Registry`]. The built-in
//! registries carry the methods listed in [`ColumnMatchingMethod`] and
//! [`ValueMatchingMethod`]; callers may register more under new names.

pub mod column;
pub mod value;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use polars::prelude::DataFrame;

use harmonize_model::{ColumnMapping, HarmonizeError, Result};

pub use column::{ExactColumnMatcher, JaccardDistanceColumnMatcher, JaroWinklerColumnMatcher};
pub use value::{EditDistanceValueMatcher, ExactValueMatcher, JaroWinklerValueMatcher};

/// A `(source_value, target_value, similarity)` proposal.
pub type ValueTriple = (String, String, f64);

/// Proposes correspondences between two lists of values.
pub trait ValueMatcher: Send + Sync {
    fn name(&self) -> &str;

    /// Values arrive normalized; returned triples must use the given strings.
    fn match_values(&self, source: &[String], target: &[String]) -> Result<Vec<ValueTriple>>;
}

/// Proposes correspondences between the columns of two tables.
pub trait ColumnMatcher: Send + Sync {
    fn name(&self) -> &str;

    fn map(&self, source: &DataFrame, target: &DataFrame) -> Result<Vec<ColumnMapping>>;
}

/// Built-in column matching methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnMatchingMethod {
    #[default]
    JaroWinkler,
    Exact,
    JaccardDistance,
}

impl ColumnMatchingMethod {
    pub const ALL: &'static [ColumnMatchingMethod] = &[
        ColumnMatchingMethod::JaroWinkler,
        ColumnMatchingMethod::Exact,
        ColumnMatchingMethod::JaccardDistance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColumnMatchingMethod::JaroWinkler => "jaro_winkler",
            ColumnMatchingMethod::Exact => "exact",
            ColumnMatchingMethod::JaccardDistance => "jaccard_distance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    fn create(self) -> Box<dyn ColumnMatcher> {
        match self {
            ColumnMatchingMethod::JaroWinkler => Box::new(JaroWinklerColumnMatcher::default()),
            ColumnMatchingMethod::Exact => Box::new(ExactColumnMatcher),
            ColumnMatchingMethod::JaccardDistance => {
                Box::new(JaccardDistanceColumnMatcher::default())
            }
        }
    }
}

impl fmt::Display for ColumnMatchingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in value matching methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueMatchingMethod {
    #[default]
    EditDistance,
    JaroWinkler,
    Exact,
}

impl ValueMatchingMethod {
    pub const ALL: &'static [ValueMatchingMethod] = &[
        ValueMatchingMethod::EditDistance,
        ValueMatchingMethod::JaroWinkler,
        ValueMatchingMethod::Exact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueMatchingMethod::EditDistance => "edit_distance",
            ValueMatchingMethod::JaroWinkler => "jaro_winkler",
            ValueMatchingMethod::Exact => "exact",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    fn create(self) -> Box<dyn ValueMatcher> {
        match self {
            ValueMatchingMethod::EditDistance => Box::new(EditDistanceValueMatcher::default()),
            ValueMatchingMethod::JaroWinkler => Box::new(JaroWinklerValueMatcher::default()),
            ValueMatchingMethod::Exact => Box::new(ExactValueMatcher),
        }
    }
}

impl fmt::Display for ValueMatchingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates a fresh strategy instance.
pub type Factory<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// Name to factory table for one kind of strategy.
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    factories: BTreeMap<String, Factory<T>>,
}

pub type ColumnMatcherRegistry = Registry<dyn ColumnMatcher>;
pub type ValueMatcherRegistry = Registry<dyn ValueMatcher>;

impl<T: ?Sized> Registry<T> {
    pub fn empty(kind: &'static str) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Instantiates the strategy registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<T>> {
        match self.factories.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(HarmonizeError::UnsupportedMethod {
                kind: self.kind,
                name: name.to_string(),
                supported: self.names(),
            }),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

impl Registry<dyn ColumnMatcher> {
    pub fn builtin() -> Self {
        let mut registry = Self::empty("column matching");
        for method in ColumnMatchingMethod::ALL.iter().copied() {
            registry.register(method.name(), move || method.create());
        }
        registry
    }
}

impl Registry<dyn ValueMatcher> {
    pub fn builtin() -> Self {
        let mut registry = Self::empty("value matching");
        for method in ValueMatchingMethod::ALL.iter().copied() {
            registry.register(method.name(), move || method.create());
        }
        registry
    }
}
