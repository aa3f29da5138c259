//! Topology description (topology.json): a declarative graph.
//!
//! JSON shape:
//! {
//!   "name": "wordcount",
//!   "namespace": "com.acme",                 // optional, defaults to name
//!   "toolkits": ["/opt/tk", {"name": "com.ibm.streamsx.json", "version": "[1.0,2.0)"}],
//!   "checkpoint_period": 5,                   // seconds, optional
//!   "submission_parameters": [{"name": "width", "type": "int32", "default": 3}],
//!   "main_composite": "com.acme::Main",       // optional
//!   "operators": [
//!     {
//!       "id": "src",                          // unique within the file
//!       "kind": "spl.utility::Beacon",
//!       "name": "Beacon",                     // optional
//!       "params": {"iterations": 10, "period": {"type": "FLOAT64", "value": 0.5}},
//!       "outputs": ["tuple<uint64 seq>", {"schema": "tuple<rstring s>", "name": "Lines"}],
//!       "inputs": ["up", "up.1", {"op": "up", "port": 0, "window": {...}}],
//!       "colocate_with": ["sink"],
//!       "category": "ingest",
//!       "resource_tags": ["ingest"],
//!       "consistent": {"trigger": "periodic", "period": 2},
//!       "function": {"name": "parse", "module": "app.funcs"},
//!       "stateful": false,
//!       "parallel": {"width": 3, "routing": "HASH_PARTITIONED", "keys": ["id"]}
//!     }
//!   ]
//! }
//!
//! A parameter object `{"type": ..., "value": ...}` is a typed expression,
//! `{"submission": "width"}` refers to a declared submission parameter, and
//! anything else is passed through as a raw value.

use crate::consistent::{
    ConsistentRegionConfig, DEFAULT_DRAIN_TIMEOUT, DEFAULT_MAX_CONSECUTIVE_ATTEMPTS,
    DEFAULT_RESET_TIMEOUT, Trigger,
};
use crate::graph::callable::{Arity, PyCallable};
use crate::graph::port::{OperatorId, OutputPortId, Routing, Width};
use crate::graph::{Graph, OutputPortOptions, ToolkitRef};
use crate::spl::expr::{ExprType, Expression, ParamValue};
use crate::spl::schema::Schema;
use crate::spl::window::{Policy, WindowConfig};
use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TopologySpec {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub toolkits: Vec<ToolkitSpec>,

    #[serde(default)]
    pub checkpoint_period: Option<f64>,

    #[serde(default)]
    pub submission_parameters: Vec<SubmissionParameterSpec>,

    #[serde(default)]
    pub main_composite: Option<String>,

    #[serde(default)]
    pub operators: Vec<OperatorSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToolkitSpec {
    Root(String),
    Dependency { name: String, version: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionParameterSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub meta_type: String,

    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorSpec {
    pub id: String,

    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub params: IndexMap<String, Value>,

    #[serde(default)]
    pub outputs: Vec<OutputSpec>,

    #[serde(default)]
    pub inputs: Vec<InputRef>,

    #[serde(default)]
    pub colocate_with: Vec<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub resource_tags: Vec<String>,

    #[serde(default)]
    pub consistent: Option<ConsistentSpec>,

    #[serde(default)]
    pub function: Option<FunctionSpec>,

    #[serde(default)]
    pub stateful: Option<bool>,

    #[serde(default)]
    pub parallel: Option<ParallelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OutputSpec {
    // "tuple<...>"
    Schema(String),
    Port {
        #[serde(default)]
        schema: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputRef {
    // "op" or "op.N"
    Short(String),
    Port {
        op: String,
        #[serde(default)]
        port: usize,
        #[serde(default)]
        window: Option<WindowSpec>,
        #[serde(default)]
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Sliding,
    Tumbling,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySpec {
    Count(u64),
    TimeMs(u64),
    Punct,
}

impl From<PolicySpec> for Policy {
    fn from(p: PolicySpec) -> Self {
        match p {
            PolicySpec::Count(n) => Policy::Count(n),
            PolicySpec::TimeMs(ms) => Policy::Time(Duration::from_millis(ms)),
            PolicySpec::Punct => Policy::Punct,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowSpec {
    #[serde(rename = "type")]
    pub window_type: WindowType,
    pub evict: PolicySpec,
    #[serde(default)]
    pub trigger: Option<PolicySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsistentSpec {
    pub trigger: ConsistentTrigger,
    #[serde(default)]
    pub period: Option<f64>,
    #[serde(default)]
    pub drain_timeout: Option<f64>,
    #[serde(default)]
    pub reset_timeout: Option<f64>,
    #[serde(default)]
    pub max_consecutive_attempts: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistentTrigger {
    OperatorDriven,
    Periodic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionSpec {
    /// Function name; absent for a lambda.
    #[serde(default)]
    pub name: Option<String>,
    pub module: String,
    /// Class name when the callable is an instance.
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub payload_b64: Option<String>,
    #[serde(default)]
    pub source_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParallelSpec {
    pub width: WidthSpec,
    #[serde(default)]
    pub routing: Option<RoutingSpec>,
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WidthSpec {
    Fixed(u32),
    // Name of a declared submission parameter.
    Parameter(String),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingSpec {
    RoundRobin,
    HashPartitioned,
    KeyPartitioned,
    Broadcast,
}

impl From<RoutingSpec> for Routing {
    fn from(r: RoutingSpec) -> Self {
        match r {
            RoutingSpec::RoundRobin => Routing::RoundRobin,
            RoutingSpec::HashPartitioned => Routing::HashPartitioned,
            RoutingSpec::KeyPartitioned => Routing::KeyPartitioned,
            RoutingSpec::Broadcast => Routing::Broadcast,
        }
    }
}

/// Declared operator after the first pass.
struct Declared {
    op: OperatorId,
    outputs: Vec<OutputPortId>,
}

impl TopologySpec {
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read topology file {}", path))?;
        serde_json::from_str(&text).with_context(|| format!("parse topology file {}", path))
    }

    /// Check ids and references, then build the graph.
    pub fn validate_and_build(&self) -> anyhow::Result<Graph> {
        // 1) Ids are unique and there is something to build.
        let mut seen = HashMap::new();
        for (i, op) in self.operators.iter().enumerate() {
            if seen.insert(op.id.as_str(), i).is_some() {
                bail!("duplicate operator id in topology: {}", op.id);
            }
        }
        if self.operators.is_empty() && self.main_composite.is_none() {
            bail!("topology {} contained no operators", self.name);
        }

        // 2) Application level settings.
        let mut graph = Graph::new(&self.name, self.namespace.as_deref());
        for tk in &self.toolkits {
            graph.add_toolkit(match tk {
                ToolkitSpec::Root(root) => ToolkitRef::Root(root.clone()),
                ToolkitSpec::Dependency { name, version } => ToolkitRef::Dependency {
                    name: name.clone(),
                    version: version.clone(),
                },
            });
        }
        if let Some(period) = self.checkpoint_period {
            graph
                .set_checkpoint_period(period)
                .context("invalid checkpoint_period")?;
        }
        let mut submission = HashMap::new();
        for sp in &self.submission_parameters {
            let expr =
                graph.create_submission_parameter(&sp.name, &sp.meta_type, sp.default.clone());
            submission.insert(sp.name.clone(), expr);
        }
        if let Some(kind) = &self.main_composite {
            graph.main_composite(kind);
        }

        // 3) Operators and their output ports, in declaration order.
        let mut declared: HashMap<&str, Declared> = HashMap::new();
        for spec in &self.operators {
            let d = declare_operator(&mut graph, spec, &submission)
                .with_context(|| format!("operator {}", spec.id))?;
            declared.insert(spec.id.as_str(), d);
        }

        // 4) Wire inputs once every output port exists.
        let short_ref = Regex::new(r"^(.+?)(?:\.(\d+))?$")?;
        for spec in &self.operators {
            let op = declared[spec.id.as_str()].op;
            let qualify = spec.inputs.len() > 1;
            for input in &spec.inputs {
                let (target, port, window, alias) = match input {
                    InputRef::Short(s) => {
                        let caps = short_ref
                            .captures(s)
                            .with_context(|| format!("bad input reference {:?}", s))?;
                        let port = match caps.get(2) {
                            Some(m) => m
                                .as_str()
                                .parse::<usize>()
                                .with_context(|| format!("bad port index in {:?}", s))?,
                            None => 0,
                        };
                        (caps.get(1).map_or("", |m| m.as_str()), port, None, None)
                    }
                    InputRef::Port {
                        op: upstream,
                        port,
                        window,
                        alias,
                    } => (upstream.as_str(), *port, window.as_ref(), alias.clone()),
                };

                let Some(upstream) = declared.get(target) else {
                    bail!("operator {} references missing input {}", spec.id, target);
                };
                let Some(&oport) = upstream.outputs.get(port) else {
                    bail!(
                        "operator {} references output port {} of {}, which has {}",
                        spec.id,
                        port,
                        target,
                        upstream.outputs.len()
                    );
                };

                let window = window
                    .map(build_window)
                    .transpose()
                    .with_context(|| format!("operator {} window", spec.id))?;
                let alias = match alias {
                    Some(a) => Some(a),
                    None if qualify => Some(graph.output_port(oport)?.runtime_id().to_string()),
                    None => None,
                };
                graph.add_input_port(op, Some(oport), window, alias.as_deref())?;
            }
        }

        // 5) Placement and consistent regions.
        for spec in &self.operators {
            let op = declared[spec.id.as_str()].op;
            if !spec.colocate_with.is_empty() {
                let mut others = Vec::with_capacity(spec.colocate_with.len());
                for other in &spec.colocate_with {
                    let Some(d) = declared.get(other.as_str()) else {
                        bail!("operator {} colocated with missing id {}", spec.id, other);
                    };
                    others.push(d.op);
                }
                graph.colocate(op, &others, "colocate")?;
            }
            if let Some(cr) = &spec.consistent {
                let config = build_consistent(cr)
                    .with_context(|| format!("operator {} consistent region", spec.id))?;
                graph.operator_mut(op)?.set_consistent(config)?;
            }
        }

        Ok(graph)
    }
}

fn declare_operator(
    graph: &mut Graph,
    spec: &OperatorSpec,
    submission: &HashMap<String, Expression>,
) -> anyhow::Result<Declared> {
    let op = match &spec.function {
        Some(f) => {
            let callable = build_callable(f)?;
            let arity = if spec.inputs.is_empty() {
                Arity::Zero
            } else {
                Arity::One
            };
            graph.add_function_operator(
                &spec.kind,
                &callable,
                arity,
                spec.name.as_deref(),
                spec.stateful,
            )?
        }
        None => {
            if spec.stateful.is_some() {
                bail!("stateful only applies to function operators");
            }
            graph.add_operator(&spec.kind, spec.name.as_deref())
        }
    };

    let mut params = Vec::with_capacity(spec.params.len());
    for (name, value) in &spec.params {
        let value = param_value(value, submission)
            .with_context(|| format!("parameter {}", name))?;
        params.push((name.clone(), value));
    }
    let operator = graph.operator_mut(op)?;
    operator.set_parameters(params);
    if let Some(category) = &spec.category {
        operator.set_category(category.clone());
    }
    for tag in &spec.resource_tags {
        operator.add_resource_tag(tag.clone());
    }

    let (width, routing, keys) = match &spec.parallel {
        Some(p) => {
            let width = match &p.width {
                WidthSpec::Fixed(n) => Width::Fixed(*n),
                WidthSpec::Parameter(name) => match submission.get(name) {
                    Some(expr) => Width::Parameter(expr.clone()),
                    None => bail!("width refers to undeclared submission parameter {}", name),
                },
            };
            let keys = (!p.keys.is_empty()).then(|| p.keys.clone());
            (Some(width), p.routing.map(Routing::from), keys)
        }
        None => (None, None, None),
    };

    let mut outputs = Vec::with_capacity(spec.outputs.len());
    for out in &spec.outputs {
        let (schema, name) = match out {
            OutputSpec::Schema(s) => (Some(s.as_str()), None),
            OutputSpec::Port { schema, name } => (schema.as_deref(), name.clone()),
        };
        let schema = schema.map(Schema::parse).transpose()?;
        let options = OutputPortOptions {
            schema,
            name,
            width: width.clone(),
            partitioned_keys: keys.clone(),
            routing,
        };
        outputs.push(graph.add_output_port(op, options, None)?);
    }

    Ok(Declared { op, outputs })
}

fn build_callable(f: &FunctionSpec) -> anyhow::Result<PyCallable> {
    let payload = match &f.payload_b64 {
        Some(b64) => Some(STANDARD.decode(b64).context("decode payload_b64")?),
        None => None,
    };

    let callable = match (&f.class, &f.name) {
        (Some(class), _) => PyCallable::instance(class, &f.module, payload.unwrap_or_default()),
        (None, Some(name)) => {
            let c = PyCallable::function(name, &f.module);
            match payload {
                Some(bytes) => c.with_payload(bytes),
                None => c,
            }
        }
        (None, None) => PyCallable::lambda(&f.module, payload.unwrap_or_default()),
    };

    Ok(match &f.source_file {
        Some(path) => callable.with_source_file(path),
        None => callable,
    })
}

fn param_value(
    value: &Value,
    submission: &HashMap<String, Expression>,
) -> anyhow::Result<ParamValue> {
    let Value::Object(obj) = value else {
        return Ok(ParamValue::from(value.clone()));
    };

    if let Some(name) = obj.get("submission") {
        let Some(name) = name.as_str() else {
            bail!("submission reference must be a string");
        };
        return match submission.get(name) {
            Some(expr) => Ok(ParamValue::Expr(expr.clone())),
            None => bail!("undeclared submission parameter {}", name),
        };
    }

    match (obj.get("type"), obj.get("value")) {
        (Some(t), Some(v)) if obj.len() == 2 => {
            let type_: ExprType = serde_json::from_value(t.clone())
                .with_context(|| format!("unknown expression type {}", t))?;
            Ok(ParamValue::Expr(Expression::new(type_, v.clone())))
        }
        _ => Ok(ParamValue::Raw(value.clone())),
    }
}

fn build_window(w: &WindowSpec) -> anyhow::Result<WindowConfig> {
    let config = match w.window_type {
        WindowType::Sliding => {
            let Some(trigger) = w.trigger else {
                bail!("sliding window needs a trigger policy");
            };
            WindowConfig::sliding(w.evict.into(), trigger.into())?
        }
        WindowType::Tumbling => {
            if w.trigger.is_some() {
                bail!("tumbling window takes no trigger policy");
            }
            WindowConfig::tumbling(w.evict.into())?
        }
    };
    Ok(config)
}

fn build_consistent(cr: &ConsistentSpec) -> anyhow::Result<ConsistentRegionConfig> {
    let trigger = match cr.trigger {
        ConsistentTrigger::OperatorDriven => Trigger::OperatorDriven,
        ConsistentTrigger::Periodic => Trigger::Periodic,
    };
    Ok(ConsistentRegionConfig::new(
        trigger,
        cr.period.map(Into::into),
        cr.drain_timeout.unwrap_or(DEFAULT_DRAIN_TIMEOUT),
        cr.reset_timeout.unwrap_or(DEFAULT_RESET_TIMEOUT),
        cr.max_consecutive_attempts
            .unwrap_or(DEFAULT_MAX_CONSECUTIVE_ATTEMPTS),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn build(doc: Value) -> anyhow::Result<Graph> {
        let spec: TopologySpec = serde_json::from_value(doc)?;
        spec.validate_and_build()
    }

    #[test]
    fn wires_short_and_indexed_references() {
        let mut g = build(json!({
            "name": "app",
            "operators": [
                {"id": "split", "kind": "spl.utility::Split", "name": "Split",
                 "outputs": ["tuple<int32 a>", "tuple<int32 a>"]},
                {"id": "lo", "kind": "spl.relational::Filter", "name": "Lo",
                 "inputs": ["split"], "outputs": ["tuple<int32 a>"]},
                {"id": "hi", "kind": "spl.relational::Filter", "name": "Hi",
                 "inputs": ["split.1"], "outputs": ["tuple<int32 a>"]}
            ]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        let outs = &doc.operator("Split").unwrap()["outputs"];
        assert_eq!(outs[0]["connections"], json!(["__spl_iport_0"]));
        assert_eq!(outs[1]["connections"], json!(["__spl_iport_1"]));
        assert_eq!(
            doc.operator("Hi").unwrap()["inputs"][0]["connections"],
            json!(["Split_OUT1"])
        );
    }

    #[test]
    fn repeated_output_names_stay_distinct() {
        let mut g = build(json!({
            "name": "app",
            "operators": [
                {"id": "a", "kind": "spl.utility::Beacon", "name": "A",
                 "outputs": [{"schema": "tuple<rstring s>", "name": "Lines"}]},
                {"id": "b", "kind": "spl.utility::Beacon", "name": "B",
                 "outputs": [{"schema": "tuple<rstring s>", "name": "Lines"}]},
                {"id": "c", "kind": "spl.utility::Custom", "name": "C", "inputs": ["b"]}
            ]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        let a = &doc.operator("A").unwrap()["outputs"][0]["name"];
        let b = &doc.operator("B").unwrap()["outputs"][0]["name"];
        assert_ne!(a, b);
        assert_eq!(a, &json!("Lines"));
        assert_eq!(b, &json!("Lines_2"));
        assert_eq!(
            doc.operator("C").unwrap()["inputs"][0]["connections"],
            json!(["Lines_2"])
        );
    }

    #[test]
    fn rejects_duplicate_ids_and_dangling_references() {
        let dup = build(json!({
            "name": "app",
            "operators": [
                {"id": "a", "kind": "spl.utility::Beacon"},
                {"id": "a", "kind": "spl.utility::Beacon"}
            ]
        }))
        .unwrap_err();
        assert!(dup.to_string().contains("duplicate operator id"));

        let missing = build(json!({
            "name": "app",
            "operators": [{"id": "a", "kind": "spl.utility::Custom", "inputs": ["nope"]}]
        }))
        .unwrap_err();
        assert!(missing.to_string().contains("missing input nope"));

        let port = build(json!({
            "name": "app",
            "operators": [
                {"id": "a", "kind": "spl.utility::Beacon", "outputs": ["tuple<int32 a>"]},
                {"id": "b", "kind": "spl.utility::Custom", "inputs": ["a.3"]}
            ]
        }))
        .unwrap_err();
        assert!(port.to_string().contains("output port 3 of a"));

        let empty = build(json!({"name": "app"})).unwrap_err();
        assert!(empty.to_string().contains("no operators"));
    }

    #[test]
    fn typed_and_submission_parameters() {
        let mut g = build(json!({
            "name": "app",
            "submission_parameters": [{"name": "rate", "type": "float64", "default": 1.5}],
            "operators": [{
                "id": "b", "kind": "spl.utility::Beacon", "name": "B",
                "params": {
                    "iterations": {"type": "UINT32", "value": 10},
                    "period": {"submission": "rate"},
                    "label": "x",
                    "missing": null
                },
                "outputs": ["tuple<int32 a>"]
            }]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        let params = &doc.operator("B").unwrap()["parameters"];
        assert_eq!(params["iterations"], json!({"type": "UINT32", "value": 10}));
        assert_eq!(params["label"], json!({"value": "x"}));
        assert_eq!(params["missing"], json!({"type": "splexpr", "value": "null"}));
        assert_eq!(params["period"]["type"], json!("submissionParameter"));
        assert!(doc.parameters.contains_key("rate"));
    }

    #[test]
    fn function_operator_with_inline_lambda() {
        let mut g = build(json!({
            "name": "app",
            "operators": [
                {"id": "src", "kind": "spl.utility::Beacon", "name": "Src",
                 "outputs": ["tuple<int32 a>"]},
                {"id": "m", "kind": "com.ibm.streamsx.topology.functional.python::Map",
                 "inputs": ["src"], "outputs": [{}],
                 "function": {"module": "__main__", "payload_b64": "AQID"},
                 "stateful": false}
            ]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        assert_eq!(doc.config.model, "functional");
        let map = doc.operator("map_lambda").unwrap();
        assert_eq!(map["parameters"]["pyCallable"], json!({"value": "AQID"}));
        assert_eq!(map["parameters"]["pyAdapter"], json!({"value": "_Callable1"}));
        assert_eq!(map["config"]["noCheckpoint"], json!(true));
    }

    #[test]
    fn parallel_width_from_submission_parameter() {
        let mut g = build(json!({
            "name": "app",
            "submission_parameters": [{"name": "width", "type": "int32", "default": 3}],
            "operators": [{
                "id": "s", "kind": "spl.utility::Beacon", "name": "S",
                "outputs": ["tuple<int32 id>"],
                "parallel": {"width": "width", "routing": "HASH_PARTITIONED", "keys": ["id"]}
            }]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        let out = &doc.operator("S").unwrap()["outputs"][0];
        assert_eq!(out["routing"], json!("HASH_PARTITIONED"));
        assert_eq!(out["partitioned"], json!(true));
        assert_eq!(out["partitionedKeys"], json!(["id"]));
        assert_eq!(out["width"]["type"], json!("submissionParameter"));

        let err = build(json!({
            "name": "app",
            "operators": [{"id": "s", "kind": "spl.utility::Beacon",
                           "outputs": ["tuple<int32 id>"], "parallel": {"width": "w"}}]
        }))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("undeclared submission parameter w"));
    }

    #[test]
    fn windows_colocation_and_consistent_regions() {
        let mut g = build(json!({
            "name": "app",
            "checkpoint_period": 10,
            "operators": [
                {"id": "a", "kind": "spl.utility::Beacon", "name": "A",
                 "outputs": ["tuple<int32 a>"], "colocate_with": ["b"],
                 "consistent": {"trigger": "periodic", "period": 2}},
                {"id": "b", "kind": "spl.relational::Aggregate", "name": "B",
                 "inputs": [{"op": "a", "window": {"type": "tumbling", "evict": {"count": 5}}}]}
            ]
        }))
        .unwrap();
        let doc = g.generate_spl_graph().unwrap();
        assert_eq!(doc.config.checkpoint.as_ref().map(|c| c.period), Some(10_000_000));
        let b = doc.operator("B").unwrap();
        assert_eq!(b["inputs"][0]["window"]["type"], json!("TUMBLING"));
        assert_eq!(
            b["config"]["placement"]["colocateTags"],
            doc.operator("A").unwrap()["config"]["placement"]["colocateTags"]
        );
        assert_eq!(
            doc.operator("A").unwrap()["consistent"]["trigger"],
            json!("PERIODIC")
        );

        let err = build(json!({
            "name": "app",
            "operators": [{"id": "a", "kind": "spl.utility::Beacon",
                           "consistent": {"trigger": "operator_driven", "period": 2}}]
        }))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("period does not apply"));
    }

    #[test]
    fn main_composite_only() {
        let mut g = build(json!({"name": "app", "main_composite": "com.acme::Main"})).unwrap();
        let doc = g.generate_spl_graph().unwrap();
        assert_eq!(doc.main_composite.as_deref(), Some("com.acme::Main"));
        assert!(doc.operators.is_empty());
    }
}
