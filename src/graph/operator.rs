//! Operator invocation nodes.

use crate::consistent::ConsistentRegionConfig;
use crate::error::ConfigError;
use crate::graph::port::{InputPortId, OperatorId, OutputPortId};
use crate::spl::expr::ParamValue;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Kinds of the Python functional toolkit start with this namespace.
pub const PYTHON_FUNCTIONAL_NAMESPACE: &str = "com.ibm.streamsx.topology.functional.python::";

/// Kind of the pass-through functional operator.
pub const PASS_THRU_KIND: &str = "com.ibm.streamsx.topology.functional.python::PyFunctionPassThru";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorModel {
    /// Plain SPL operator invocation.
    Spl,
    /// Python functional operator.
    Functional,
    /// Marker node without an operator behind it.
    Virtual,
}

impl OperatorModel {
    pub fn model(&self) -> &'static str {
        match self {
            OperatorModel::Spl => "spl",
            OperatorModel::Functional => "functional",
            OperatorModel::Virtual => "virtual",
        }
    }

    pub fn language(&self) -> &'static str {
        match self {
            OperatorModel::Spl => "spl",
            OperatorModel::Functional => "python",
            OperatorModel::Virtual => "virtual",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_: String,
    pub properties: BTreeMap<String, Value>,
}

impl Annotation {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), Value::from(self.type_.as_str()));
        out.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone().into_iter().collect()),
        );
        Value::Object(out)
    }
}

/// Where in user code the node was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub method: Option<String>,
}

impl SourceLocation {
    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("file".to_string(), Value::from(self.file.as_str()));
        out.insert("line".to_string(), Value::from(self.line));
        if let Some(method) = &self.method {
            out.insert("api.method".to_string(), Value::from(method.as_str()));
        }
        Value::Object(out)
    }
}

/// A view on one of the node's output ports.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub name: String,
    pub port: String,
    pub description: Option<String>,
    pub buffer_time: f64,
    pub sample_size: u32,
    pub start_on_submission: bool,
}

impl ViewConfig {
    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("name".to_string(), Value::from(self.name.as_str()));
        out.insert("port".to_string(), Value::from(self.port.as_str()));
        if let Some(d) = &self.description {
            out.insert("description".to_string(), Value::from(d.as_str()));
        }
        out.insert("bufferTime".to_string(), Value::from(self.buffer_time));
        out.insert("sampleSize".to_string(), Value::from(self.sample_size));
        let activate = if self.start_on_submission {
            "automatic"
        } else {
            "firstAccess"
        };
        out.insert("activateOption".to_string(), Value::from(activate));
        Value::Object(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGroup {
    pub kind: String,
    pub name: String,
}

/// Display hints for tooling, no effect on execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutHints {
    pub kind: Option<String>,
    pub hidden: bool,
    /// Runtime name to the name the user asked for.
    pub names: BTreeMap<String, String>,
    pub group: Option<LayoutGroup>,
}

impl LayoutHints {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && !self.hidden && self.names.is_empty() && self.group.is_none()
    }

    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(kind) = &self.kind {
            out.insert("kind".to_string(), Value::from(kind.as_str()));
        }
        if self.hidden {
            out.insert("hidden".to_string(), Value::Bool(true));
        }
        if !self.names.is_empty() {
            out.insert(
                "names".to_string(),
                Value::Object(
                    self.names
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                        .collect(),
                ),
            );
        }
        if let Some(group) = &self.group {
            let mut g = Map::new();
            g.insert("kind".to_string(), Value::from(group.kind.as_str()));
            g.insert("name".to_string(), Value::from(group.name.as_str()));
            out.insert("group".to_string(), Value::Object(g));
        }
        Value::Object(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub colocate_tags: Vec<String>,
    pub resource_tags: IndexSet<String>,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.colocate_tags.is_empty() && self.resource_tags.is_empty()
    }

    fn spl_json(&self) -> Value {
        let mut out = Map::new();
        if !self.colocate_tags.is_empty() {
            out.insert(
                "colocateTags".to_string(),
                Value::from(self.colocate_tags.clone()),
            );
        }
        if !self.resource_tags.is_empty() {
            let mut tags: Vec<String> = self.resource_tags.iter().cloned().collect();
            tags.sort();
            out.insert("resourceTags".to_string(), Value::from(tags));
        }
        Value::Object(out)
    }
}

/// Operator level config block.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorConfig {
    pub stream_viewability: bool,
    pub view_configs: Vec<ViewConfig>,
    pub no_checkpoint: bool,
    pub placement: Placement,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            stream_viewability: true,
            view_configs: Vec::new(),
            no_checkpoint: false,
            placement: Placement::default(),
        }
    }
}

impl OperatorConfig {
    fn spl_json(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(
            "streamViewability".to_string(),
            Value::Bool(self.stream_viewability),
        );
        out.insert(
            "viewConfigs".to_string(),
            Value::Array(self.view_configs.iter().map(ViewConfig::spl_json).collect()),
        );
        if !self.placement.is_empty() {
            out.insert("placement".to_string(), self.placement.spl_json());
        }
        if self.no_checkpoint {
            out.insert("noCheckpoint".to_string(), Value::Bool(true));
        }
        out
    }
}

/// One node of the graph.
#[derive(Debug, Clone)]
pub struct Operator {
    pub(crate) id: OperatorId,
    pub(crate) kind: String,
    pub(crate) name: String,
    pub(crate) runtime_id: String,
    pub(crate) model: OperatorModel,
    pub(crate) inputs: Vec<InputPortId>,
    pub(crate) outputs: Vec<OutputPortId>,
    pub(crate) params: IndexMap<String, ParamValue>,
    pub(crate) config: OperatorConfig,
    pub(crate) category: Option<String>,
    pub(crate) partitioned: bool,
    pub(crate) start_op: bool,
    pub(crate) source_location: Option<SourceLocation>,
    pub(crate) consistent: Option<ConsistentRegionConfig>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) layout: LayoutHints,
}

impl Operator {
    pub(crate) fn new(
        id: OperatorId,
        kind: &str,
        name: String,
        runtime_id: String,
        model: OperatorModel,
    ) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            name,
            runtime_id,
            model,
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: IndexMap::new(),
            config: OperatorConfig::default(),
            category: None,
            partitioned: false,
            start_op: false,
            source_location: None,
            consistent: None,
            annotations: Vec::new(),
            layout: LayoutHints::default(),
        }
    }

    pub fn id(&self) -> OperatorId {
        self.id
    }

    /// Position in the graph at creation time.
    pub fn index(&self) -> usize {
        self.id.0
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    pub fn model(&self) -> OperatorModel {
        self.model
    }

    pub fn is_marker(&self) -> bool {
        self.model == OperatorModel::Virtual
    }

    pub fn inputs(&self) -> &[InputPortId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPortId] {
        &self.outputs
    }

    pub fn params(&self) -> &IndexMap<String, ParamValue> {
        &self.params
    }

    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    pub fn consistent(&self) -> Option<&ConsistentRegionConfig> {
        self.consistent.as_ref()
    }

    pub fn layout(&self) -> &LayoutHints {
        &self.layout
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Set every parameter; `None` values become the SPL `null` literal.
    pub fn set_parameters<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (name, value) in params {
            self.set_parameter(name, value);
        }
    }

    /// Extend list valued parameters, creating them when absent.
    ///
    /// A parameter holding a single raw value becomes a list.
    pub fn append_parameters<K>(&mut self, params: impl IntoIterator<Item = (K, Vec<Value>)>)
    where
        K: Into<String>,
    {
        for (name, values) in params {
            let name = name.into();
            match self.params.get_mut(&name) {
                Some(ParamValue::Raw(Value::Array(existing))) => existing.extend(values),
                Some(ParamValue::Raw(single)) => {
                    let mut list = vec![single.take()];
                    list.extend(values);
                    *single = Value::Array(list);
                }
                _ => {
                    self.params
                        .insert(name, ParamValue::Raw(Value::Array(values)));
                }
            }
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
    }

    pub fn add_resource_tag(&mut self, tag: impl Into<String>) {
        self.config.placement.resource_tags.insert(tag.into());
    }

    pub fn set_partitioned(&mut self, partitioned: bool) {
        self.partitioned = partitioned;
    }

    pub fn set_start_op(&mut self, start: bool) {
        self.start_op = start;
    }

    pub fn set_source_location(&mut self, sl: SourceLocation) {
        self.source_location = Some(sl);
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn add_view(&mut self, view: ViewConfig) {
        self.config.view_configs.push(view);
    }

    pub fn set_no_checkpoint(&mut self) {
        self.config.no_checkpoint = true;
    }

    /// Attach a consistent region. Markers cannot start a region.
    pub fn set_consistent(&mut self, config: ConsistentRegionConfig) -> Result<(), ConfigError> {
        if self.is_marker() {
            return Err(ConfigError::Marker("a consistent region"));
        }
        self.consistent = Some(config);
        Ok(())
    }

    /// Layout hints: override the displayed kind, hide the node, or show
    /// `name` instead of the runtime identifier.
    pub fn set_layout(&mut self, kind: Option<&str>, hidden: bool, name: Option<&str>) {
        if let Some(kind) = kind {
            self.layout.kind = Some(kind.to_string());
        }
        if hidden {
            self.layout.hidden = true;
        }
        if let Some(name) = name {
            self.layout
                .names
                .insert(self.runtime_id.clone(), name.to_string());
        }
    }

    pub fn set_layout_group(&mut self, kind: impl Into<String>, name: impl Into<String>) {
        self.layout.group = Some(LayoutGroup {
            kind: kind.into(),
            name: name.into(),
        });
    }

    pub(crate) fn push_colocate_tag(&mut self, tag: &str) -> bool {
        if self.config.placement.colocate_tags.iter().any(|t| t == tag) {
            return false;
        }
        self.config.placement.colocate_tags.push(tag.to_string());
        true
    }

    /// Everything except ports, which the graph fills in.
    pub(crate) fn spl_json(&self, outputs: Vec<Value>, inputs: Vec<Value>) -> Map<String, Value> {
        let mut op = Map::new();
        op.insert("name".to_string(), Value::from(self.runtime_id.as_str()));
        op.insert("kind".to_string(), Value::from(self.kind.as_str()));
        op.insert("model".to_string(), Value::from(self.model.model()));
        op.insert("language".to_string(), Value::from(self.model.language()));
        op.insert("partitioned".to_string(), Value::Bool(self.partitioned));
        op.insert("outputs".to_string(), Value::Array(outputs));
        op.insert("inputs".to_string(), Value::Array(inputs));

        if self.is_marker() {
            op.insert("marker".to_string(), Value::Bool(true));
            op.insert("config".to_string(), Value::Object(Map::new()));
            return op;
        }

        if let Some(category) = &self.category {
            op.insert("category".to_string(), Value::from(category.as_str()));
        }
        if self.start_op {
            op.insert("startOp".to_string(), Value::Bool(true));
        }
        op.insert("config".to_string(), Value::Object(self.config.spl_json()));

        let params: Map<String, Value> = self
            .params
            .iter()
            .map(|(name, value)| (name.clone(), value.spl_json()))
            .collect();
        op.insert("parameters".to_string(), Value::Object(params));

        if !self.annotations.is_empty() {
            op.insert(
                "annotations".to_string(),
                Value::Array(self.annotations.iter().map(Annotation::spl_json).collect()),
            );
        }
        if let Some(sl) = &self.source_location {
            op.insert("sourcelocation".to_string(), sl.spl_json());
        }

        let mut layout = self.layout.clone();
        if self.runtime_id != self.name {
            layout
                .names
                .entry(self.runtime_id.clone())
                .or_insert_with(|| self.name.clone());
        }
        if !layout.is_empty() {
            op.insert("layout".to_string(), layout.spl_json());
        }

        if let Some(consistent) = &self.consistent {
            op.insert("consistent".to_string(), consistent.spl_json());
        }
        op
    }
}
