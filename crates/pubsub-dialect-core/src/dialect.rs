use serde_json::Value;

use crate::config::DialectConfig;
use crate::error::Result;
use crate::identify::identify;
use crate::parser::{self, Outcome};
use crate::registry::DialectRegistry;
use crate::shape::Shape;
use crate::validator::{self, Validated};

/// A built registry together with the config it validates under.
///
/// Build one at startup and share it by reference or `Arc`; every method
/// takes `&self` and none of them mutate.
#[derive(Debug)]
pub struct Dialect {
    registry: DialectRegistry,
    config: DialectConfig,
}

impl Dialect {
    /// Build the dialect with default config.
    pub fn new() -> Result<Self> {
        Self::with_config(DialectConfig::default())
    }

    /// Build the dialect with explicit config.
    pub fn with_config(config: DialectConfig) -> Result<Self> {
        Ok(Self {
            registry: DialectRegistry::new()?,
            config,
        })
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    /// Resolve the shape that should validate `obj`.
    pub fn identify(&self, obj: &Value) -> Option<&Shape> {
        identify(&self.registry, obj)
    }

    /// Validate `obj` against an explicit shape.
    pub fn validate(&self, obj: &Value, shape: &Shape) -> Result<Validated> {
        validator::validate(obj, shape, &self.config)
    }

    /// Callback flavour of [`Dialect::validate`].
    pub fn validate_with<R>(
        &self,
        obj: &Value,
        shape: &Shape,
        callback: impl FnOnce(Result<Validated>) -> R,
    ) -> R {
        validator::validate_with(obj, shape, &self.config, callback)
    }

    /// Identify, then validate, a decoded object.
    pub fn auto_validate(&self, obj: &Value) -> Outcome {
        parser::auto_validate(&self.registry, &self.config, obj)
    }

    /// Decode a text frame, then auto-validate it.
    pub fn parse_and_auto_validate(&self, text: &str) -> Outcome {
        parser::parse_and_auto_validate(&self.registry, &self.config, text)
    }

    /// Decode a raw byte frame, then auto-validate it.
    pub fn parse_frame(&self, frame: &[u8]) -> Outcome {
        parser::parse_frame(&self.registry, &self.config, frame)
    }
}
