//! OCPP 2.0.1 variable metadata (spec.md §3 "VariableMetadata").
//!
//! Pure data: bounds, enumerations, mutability, persistence. The
//! validation/resolution logic that consumes this metadata lives in
//! [`crate::application::variable_registry`] — this module only describes
//! the shape of a variable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    OptionList,
    SequenceList,
    MemberList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persistence {
    Persistent,
    Volatile,
}

/// `(component, instance?, variable)` key identifying one variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableKey {
    pub component: String,
    pub instance: Option<String>,
    pub variable: String,
}

impl VariableKey {
    pub fn new(component: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            instance: None,
            variable: variable.into(),
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Case-insensitive lookup key.
    pub(crate) fn canonical(&self) -> (String, Option<String>, String) {
        (
            self.component.to_ascii_lowercase(),
            self.instance.as_ref().map(|s| s.to_ascii_lowercase()),
            self.variable.to_ascii_lowercase(),
        )
    }
}

/// A dynamic resolver callback: given a station id, returns the current value.
///
/// Wins over `default_value` when present — spec.md §4.1:
/// "resolveValue(station, metadata) → string (dynamic resolver wins over defaultValue)".
pub type DynamicResolver = std::sync::Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A post-process callback applied to a value after a successful SetVariables write.
pub type PostProcess = std::sync::Arc<dyn Fn(&str, &str) + Send + Sync>;

#[derive(Clone)]
pub struct VariableMetadata {
    pub key: VariableKey,
    pub data_type: DataType,
    pub mutability: Mutability,
    pub persistence: Persistence,
    pub default_value: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub positive: bool,
    pub allow_zero: bool,
    pub enumeration: Option<Vec<String>>,
    pub max_length: Option<usize>,
    pub is_url: bool,
    pub url_schemes: Option<Vec<String>>,
    pub reboot_required: bool,
    pub dynamic_resolver: Option<DynamicResolver>,
    pub post_process: Option<PostProcess>,
}

impl std::fmt::Debug for VariableMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableMetadata")
            .field("key", &self.key)
            .field("data_type", &self.data_type)
            .field("mutability", &self.mutability)
            .field("persistence", &self.persistence)
            .field("default_value", &self.default_value)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("positive", &self.positive)
            .field("allow_zero", &self.allow_zero)
            .field("enumeration", &self.enumeration)
            .field("max_length", &self.max_length)
            .field("is_url", &self.is_url)
            .field("url_schemes", &self.url_schemes)
            .field("reboot_required", &self.reboot_required)
            .finish()
    }
}

/// Builder for [`VariableMetadata`] — registry construction reads more like
/// declarative data this way than a giant struct literal per entry.
pub struct VariableMetadataBuilder {
    inner: VariableMetadata,
}

impl VariableMetadataBuilder {
    pub fn new(key: VariableKey, data_type: DataType) -> Self {
        Self {
            inner: VariableMetadata {
                key,
                data_type,
                mutability: Mutability::ReadWrite,
                persistence: Persistence::Volatile,
                default_value: None,
                min: None,
                max: None,
                positive: false,
                allow_zero: true,
                enumeration: None,
                max_length: None,
                is_url: false,
                url_schemes: None,
                reboot_required: false,
                dynamic_resolver: None,
                post_process: None,
            },
        }
    }

    pub fn mutability(mut self, m: Mutability) -> Self {
        self.inner.mutability = m;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.inner.persistence = Persistence::Persistent;
        self
    }

    pub fn default_value(mut self, v: impl Into<String>) -> Self {
        self.inner.default_value = Some(v.into());
        self
    }

    pub fn bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.inner.min = min;
        self.inner.max = max;
        self
    }

    pub fn positive(mut self, positive: bool) -> Self {
        self.inner.positive = positive;
        self
    }

    pub fn allow_zero(mut self, allow_zero: bool) -> Self {
        self.inner.allow_zero = allow_zero;
        self
    }

    pub fn enumeration(mut self, values: Vec<String>) -> Self {
        self.inner.enumeration = Some(values);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.inner.max_length = Some(len);
        self
    }

    pub fn url(mut self, schemes: Option<Vec<String>>) -> Self {
        self.inner.is_url = true;
        self.inner.url_schemes = schemes;
        self
    }

    pub fn reboot_required(mut self, required: bool) -> Self {
        self.inner.reboot_required = required;
        self
    }

    pub fn dynamic_resolver(mut self, resolver: DynamicResolver) -> Self {
        self.inner.dynamic_resolver = Some(resolver);
        self
    }

    pub fn post_process(mut self, hook: PostProcess) -> Self {
        self.inner.post_process = Some(hook);
        self
    }

    pub fn build(self) -> VariableMetadata {
        self.inner
    }
}
