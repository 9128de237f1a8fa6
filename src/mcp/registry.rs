//! Tool registry: descriptors advertised by `tools/list` and the separate
//! name → handler binding used by the dispatcher.
//!
//! Each server variant declares its tools as a [`ToolKind`] enum. Input
//! schemas are generated from the tools' typed input structs, so the schema a
//! client sees and the parser that checks its arguments cannot drift apart.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;

/// Typed arguments of one tool.
pub trait ToolInput: DeserializeOwned + JsonSchema {
    /// Range and consistency checks that serde can't express.
    fn validate(&self, _tool: &'static str) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Parse and validate raw call arguments into a tool's input type.
///
/// Missing required fields and wrongly typed values are reported before any
/// handler work happens.
pub fn parse_input<I: ToolInput>(tool: &'static str, arguments: JsonObject) -> Result<I, ToolError> {
    let input: I = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid(tool, e.to_string()))?;
    input.validate(tool)?;
    Ok(input)
}

/// JSON Schema object for an input type, with nested definitions inlined.
pub fn input_schema<I: JsonSchema>() -> JsonObject {
    let generator = SchemaSettings::draft07().with(|s| s.inline_subschemas = true).into_generator();
    let schema = generator.into_root_schema_for::<I>();
    match serde_json::to_value(schema) {
        Ok(Value::Object(mut map)) => {
            map.remove("$schema");
            map.remove("title");
            map
        }
        _ => JsonObject::new(),
    }
}

/// Build the descriptor for a tool from its input type.
pub fn describe<I: ToolInput>(name: &'static str, description: &'static str) -> Tool {
    Tool::new(name, description, Arc::new(input_schema::<I>()))
}

/// The closed set of tools one server exposes.
pub trait ToolKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every tool, in listing order.
    const ALL: &'static [Self];

    /// Stable protocol name.
    fn name(self) -> &'static str;

    fn descriptor(self) -> Tool;
}

/// Descriptors and name bindings, built once at startup.
#[derive(Debug)]
pub struct Registry<K: ToolKind> {
    descriptors: Vec<Tool>,
    handlers: HashMap<&'static str, K>,
}

impl<K: ToolKind> Registry<K> {
    pub fn new() -> Self {
        let descriptors = K::ALL.iter().map(|kind| kind.descriptor()).collect();
        let handlers = K::ALL.iter().map(|&kind| (kind.name(), kind)).collect();
        Self { descriptors, handlers }
    }

    /// Descriptors in declaration order; the same slice on every call.
    pub fn descriptors(&self) -> &[Tool] {
        &self.descriptors
    }

    pub fn resolve(&self, name: &str) -> Option<K> {
        self.handlers.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<K: ToolKind> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}
