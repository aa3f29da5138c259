//! Port model.
//!
//! Ports live in arenas owned by the graph and point back at their operator
//! by id. Edges are stored on both ends.

use crate::spl::expr::Expression;
use crate::spl::schema::Schema;
use crate::spl::window::WindowConfig;
use indexmap::IndexMap;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputPortId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputPortId(pub(crate) usize);

impl OperatorId {
    /// Creation index of the operator.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// How tuples are routed across parallel channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routing {
    #[default]
    RoundRobin,
    HashPartitioned,
    KeyPartitioned,
    Broadcast,
}

impl Routing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Routing::RoundRobin => "ROUND_ROBIN",
            Routing::HashPartitioned => "HASH_PARTITIONED",
            Routing::KeyPartitioned => "KEY_PARTITIONED",
            Routing::Broadcast => "BROADCAST",
        }
    }
}

/// Parallel channel count.
#[derive(Debug, Clone, PartialEq)]
pub enum Width {
    Fixed(u32),
    /// Width taken from a submission parameter at submit time.
    Parameter(Expression),
}

impl Width {
    fn spl_json(&self) -> Value {
        match self {
            Width::Fixed(n) => Value::from(*n),
            Width::Parameter(e) => e.spl_json(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputPort {
    pub(crate) id: OutputPortId,
    pub(crate) operator: OperatorId,
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) runtime_id: String,
    pub(crate) schema: Schema,
    pub(crate) width: Option<Width>,
    pub(crate) partitioned_keys: Option<Vec<String>>,
    pub(crate) routing: Routing,
    pub(crate) connections: Vec<InputPortId>,
    /// Output clause assignments, attribute name to expression.
    pub(crate) assigns: IndexMap<String, Expression>,
}

impl OutputPort {
    pub fn id(&self) -> OutputPortId {
        self.id
    }

    pub fn operator(&self) -> OperatorId {
        self.operator
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn width(&self) -> Option<&Width> {
        self.width.as_ref()
    }

    pub fn routing(&self) -> Routing {
        self.routing
    }

    pub fn connections(&self) -> &[InputPortId] {
        &self.connections
    }

    pub fn assigns(&self) -> &IndexMap<String, Expression> {
        &self.assigns
    }

    pub fn is_partitioned(&self) -> bool {
        self.partitioned_keys.is_some()
            || matches!(self.routing, Routing::HashPartitioned | Routing::KeyPartitioned)
    }

    /// `connections` holds the internal names of the connected input ports.
    pub(crate) fn spl_json(&self, connections: Vec<String>) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), Value::from(self.schema.spl_type()));
        out.insert("name".to_string(), Value::from(self.runtime_id.as_str()));
        out.insert("connections".to_string(), Value::from(connections));
        out.insert("routing".to_string(), Value::from(self.routing.as_str()));
        if let Some(width) = &self.width {
            out.insert("width".to_string(), width.spl_json());
        }
        if self.is_partitioned() {
            out.insert("partitioned".to_string(), Value::Bool(true));
            if let Some(keys) = &self.partitioned_keys {
                out.insert("partitionedKeys".to_string(), Value::from(keys.clone()));
            }
        }
        if !self.assigns.is_empty() {
            let assigns: Map<String, Value> = self
                .assigns
                .iter()
                .map(|(attr, e)| (attr.clone(), e.spl_json()))
                .collect();
            out.insert("assigns".to_string(), Value::Object(assigns));
        }
        Value::Object(out)
    }
}

#[derive(Debug, Clone)]
pub struct InputPort {
    pub(crate) id: InputPortId,
    pub(crate) operator: OperatorId,
    pub(crate) index: usize,
    /// Internal name, SPL does not name input ports.
    pub(crate) name: String,
    pub(crate) schema: Option<Schema>,
    pub(crate) window: Option<WindowConfig>,
    pub(crate) alias: Option<String>,
    pub(crate) connections: Vec<OutputPortId>,
}

impl InputPort {
    pub fn id(&self) -> InputPortId {
        self.id
    }

    pub fn operator(&self) -> OperatorId {
        self.operator
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn window(&self) -> Option<&WindowConfig> {
        self.window.as_ref()
    }

    pub fn connections(&self) -> &[OutputPortId] {
        &self.connections
    }

    /// `connections` holds the runtime ids of the connected output ports.
    pub(crate) fn spl_json(&self, connections: Vec<String>) -> Value {
        let mut out = Map::new();
        out.insert("name".to_string(), Value::from(self.name.as_str()));
        if let Some(alias) = &self.alias {
            out.insert("alias".to_string(), Value::from(alias.as_str()));
        }
        out.insert("connections".to_string(), Value::from(connections));
        let schema = self.schema.clone().unwrap_or_default();
        out.insert("type".to_string(), Value::from(schema.spl_type()));
        if let Some(window) = &self.window {
            out.insert("window".to_string(), window.spl_json());
        }
        Value::Object(out)
    }
}
