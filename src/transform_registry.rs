//! Registry of transform factories, keyed by transform name.
//!
//! Lets a host (or the `nestkey` CLI) build a transform from a name found in
//! configuration.

use crate::config::{ConfigDef, TransformConfig};
use crate::error::ConfigurationError;
use crate::transforms::{
    NestedValueToHeader, NestedValueToKeys, NestedValueToKeysAndHeader, Transformation,
};
use indexmap::IndexMap;

/// Builds a configured transform from raw configuration.
pub trait TransformFactory: Send + Sync {
    fn create(
        &self,
        props: &TransformConfig,
    ) -> Result<Box<dyn Transformation>, ConfigurationError>;
}

/// Simple function-based implementation of TransformFactory
impl<F> TransformFactory for F
where
    F: Fn(&TransformConfig) -> Result<Box<dyn Transformation>, ConfigurationError> + Send + Sync,
{
    fn create(
        &self,
        props: &TransformConfig,
    ) -> Result<Box<dyn Transformation>, ConfigurationError> {
        self(props)
    }
}

struct Registration {
    config: ConfigDef,
    factory: Box<dyn TransformFactory>,
}

/// Registry for storing and instantiating transforms
pub struct TransformRegistry {
    factories: IndexMap<String, Registration>,
}

impl TransformRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registry holding the three built-in transforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            NestedValueToHeader::NAME,
            NestedValueToHeader::config_def(),
            Box::new(header_factory),
        );
        registry.register(
            NestedValueToKeys::NAME,
            NestedValueToKeys::config_def(),
            Box::new(keys_factory),
        );
        registry.register(
            NestedValueToKeysAndHeader::NAME,
            NestedValueToKeysAndHeader::config_def(),
            Box::new(keys_and_header_factory),
        );
        registry
    }

    /// Register a factory and the options it accepts, replacing any previous
    /// one with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        config: ConfigDef,
        factory: Box<dyn TransformFactory>,
    ) {
        self.factories.insert(name.into(), Registration { config, factory });
    }

    /// Build and configure the transform registered as `name`.
    pub fn create(
        &self,
        name: &str,
        props: &TransformConfig,
    ) -> Result<Box<dyn Transformation>, ConfigurationError> {
        let registration = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownTransform(name.to_string()))?;

        registration.factory.create(props)
    }

    /// Build the transform named by `props.transform`.
    pub fn create_from_config(
        &self,
        props: &TransformConfig,
    ) -> Result<Box<dyn Transformation>, ConfigurationError> {
        let name = props.transform.as_deref().ok_or_else(|| {
            ConfigurationError::Load("configuration does not name a transform".to_string())
        })?;
        self.create(name, props)
    }

    /// Options declared for the transform registered as `name`.
    pub fn config_def(&self, name: &str) -> Option<&ConfigDef> {
        self.factories.get(name).map(|r| &r.config)
    }

    /// Check if a transform is registered
    pub fn has_transform(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn list_transforms(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

fn header_factory(props: &TransformConfig) -> Result<Box<dyn Transformation>, ConfigurationError> {
    Ok(Box::new(NestedValueToHeader::configure(props)?))
}

fn keys_factory(props: &TransformConfig) -> Result<Box<dyn Transformation>, ConfigurationError> {
    Ok(Box::new(NestedValueToKeys::configure(props)?))
}

fn keys_and_header_factory(
    props: &TransformConfig,
) -> Result<Box<dyn Transformation>, ConfigurationError> {
    Ok(Box::new(NestedValueToKeysAndHeader::configure(props)?))
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
