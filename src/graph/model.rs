//! Serialized graph document.
//!
//! JSON shape (operators abbreviated):
//! {
//!   "name": "app",
//!   "namespace": "com.acme",
//!   "public": true,
//!   "config": {
//!     "model": "spl",                 // "functional" if any Python operator
//!     "language": "spl",              // "python" likewise
//!     "includes": [{"source": "...", "target": "opt/python/modules"}],
//!     "spl": {"toolkits": [{"root": "..."}, {"name": "...", "version": "..."}]},
//!     "checkpoint": {"mode": "periodic", "period": 5000000},   // microseconds
//!     "colocateTagMapping": {"__spl_colocate$2": "__spl_colocate$0"}
//!   },
//!   "parameters": {"width": {"type": "submissionParameter", "value": {...}}},
//!   "operators": [{"name": "Beacon", "kind": "spl.utility::Beacon", ...}],
//!   "mainComposite": "com.acme::Main"   // only for a bare main composite
//! }

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphJson {
    pub name: String,
    pub namespace: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Value>,
    pub config: GraphConfigJson,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
    pub operators: Vec<Value>,
    #[serde(rename = "mainComposite", skip_serializing_if = "Option::is_none")]
    pub main_composite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphConfigJson {
    pub model: String,
    pub language: String,
    pub includes: Vec<IncludeJson>,
    pub spl: SplConfigJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointJson>,
    #[serde(
        rename = "colocateTagMapping",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub colocate_tag_mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplConfigJson {
    pub toolkits: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeJson {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointJson {
    pub mode: String,
    /// Microseconds.
    pub period: u64,
}

impl GraphJson {
    /// Serialized operator whose emitted `name` is `runtime_id`.
    pub fn operator(&self, runtime_id: &str) -> Option<&Value> {
        self.operators
            .iter()
            .find(|op| op.get("name").and_then(Value::as_str) == Some(runtime_id))
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
