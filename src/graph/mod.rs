//! The graph container.
//!
//! Owns every operator and port, hands out unique names and runtime
//! identifiers, tracks colocation groups and application level settings,
//! and flattens itself into the JSON document consumed by the compiler
//! (see [`generate`]).
//!
//! Operators are never removed; an operator's index is its position at
//! creation time.

pub mod callable;
pub mod colocate;
pub mod generate;
pub mod model;
pub mod operator;
pub mod port;

use crate::consistent::Seconds;
use crate::error::{ConfigError, ReferenceError, Result};
use crate::spl::expr::Expression;
use crate::spl::ident::{self, GENERATED_PREFIX};
use crate::spl::schema::Schema;
use crate::spl::window::WindowConfig;
use callable::{Arity, Callable, MODULES_TARGET};
use colocate::ColocateTags;
use indexmap::{IndexMap, IndexSet};
use operator::{Operator, OperatorModel, PASS_THRU_KIND, PYTHON_FUNCTIONAL_NAMESPACE};
use port::{InputPort, InputPortId, OperatorId, OutputPort, OutputPortId, Routing, Width};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

pub use model::GraphJson;

/// A toolkit the application depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolkitRef {
    /// Toolkit directory shipped with the application.
    Root(String),
    /// Toolkit resolved by name and version range at build time.
    Dependency { name: String, version: String },
}

/// A file copied into the application bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    pub source: String,
    pub target: String,
}

type Deferred = Box<dyn FnOnce(&mut Graph) -> Result<()>>;

/// Options for a new output port.
#[derive(Debug, Clone, Default)]
pub struct OutputPortOptions {
    pub schema: Option<Schema>,
    pub name: Option<String>,
    pub width: Option<Width>,
    pub partitioned_keys: Option<Vec<String>>,
    pub routing: Option<Routing>,
}

pub struct Graph {
    name: String,
    namespace: String,
    operators: Vec<Operator>,
    output_ports: Vec<OutputPort>,
    input_ports: Vec<InputPort>,
    used_names: HashSet<String>,
    runtime_ids: HashSet<String>,
    port_names: HashSet<String>,
    port_ids: HashSet<String>,
    colocate_tags: ColocateTags,
    toolkits: IndexSet<ToolkitRef>,
    includes: IndexSet<Include>,
    submission_parameters: IndexMap<String, Expression>,
    checkpoint_period: Option<Seconds>,
    annotations: Vec<operator::Annotation>,
    main_composite: bool,
    deferred: Vec<Deferred>,
    next_iport: usize,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("operators", &self.operators.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl Graph {
    /// New graph. `name` and `namespace` are sanitized; the namespace
    /// defaults to the sanitized name.
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        let name = ident::fix_name(name, "Topology");
        let namespace = ident::fix_namespace(namespace.unwrap_or(&name), &name);
        Self {
            name,
            namespace,
            operators: Vec::new(),
            output_ports: Vec::new(),
            input_ports: Vec::new(),
            used_names: HashSet::new(),
            runtime_ids: HashSet::new(),
            port_names: HashSet::new(),
            port_ids: HashSet::new(),
            colocate_tags: ColocateTags::new(),
            toolkits: IndexSet::new(),
            includes: IndexSet::new(),
            submission_parameters: IndexMap::new(),
            checkpoint_period: None,
            annotations: Vec::new(),
            main_composite: false,
            deferred: Vec::new(),
            next_iport: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn last_operator(&self) -> Option<&Operator> {
        self.operators.last()
    }

    pub fn operator(&self, id: OperatorId) -> Result<&Operator> {
        self.operators
            .get(id.0)
            .ok_or_else(|| ReferenceError::UnknownOperator(id.0).into())
    }

    pub fn operator_mut(&mut self, id: OperatorId) -> Result<&mut Operator> {
        self.operators
            .get_mut(id.0)
            .ok_or_else(|| ReferenceError::UnknownOperator(id.0).into())
    }

    pub fn output_port(&self, id: OutputPortId) -> Result<&OutputPort> {
        self.output_ports
            .get(id.0)
            .ok_or_else(|| ReferenceError::UnknownOutputPort(id.0).into())
    }

    fn output_port_mut(&mut self, id: OutputPortId) -> Result<&mut OutputPort> {
        self.output_ports
            .get_mut(id.0)
            .ok_or_else(|| ReferenceError::UnknownOutputPort(id.0).into())
    }

    pub fn input_port(&self, id: InputPortId) -> Result<&InputPort> {
        self.input_ports
            .get(id.0)
            .ok_or_else(|| ReferenceError::UnknownInputPort(id.0).into())
    }

    fn input_port_mut(&mut self, id: InputPortId) -> Result<&mut InputPort> {
        self.input_ports
            .get_mut(id.0)
            .ok_or_else(|| ReferenceError::UnknownInputPort(id.0).into())
    }

    /// Allocate a unique name.
    ///
    /// A requested name already in use gets the first free `_2`, `_3`, ...
    /// suffix. Without a request the name comes from the callable (lambdas
    /// become `<action>_lambda`), then `action`, then the graph name.
    pub fn requested_name(
        &mut self,
        name: Option<&str>,
        action: Option<&str>,
        func: Option<&dyn Callable>,
    ) -> String {
        if let Some(name) = name {
            if self.used_names.insert(name.to_string()) {
                return name.to_string();
            }
            let mut n = 2usize;
            loop {
                let candidate = format!("{name}_{n}");
                if self.used_names.insert(candidate.clone()) {
                    debug!(requested = name, allocated = %candidate, "name de-duplicated");
                    return candidate;
                }
                n += 1;
            }
        }

        let derived = match func {
            Some(f) if f.is_lambda() => format!("{}_lambda", action.unwrap_or("op")),
            Some(f) => f.name().to_string(),
            None => action.map(str::to_string).unwrap_or_else(|| self.name.clone()),
        };
        self.requested_name(Some(&derived), None, None)
    }

    /// Name and runtime id for a new operator; re-requests on the rare
    /// runtime id collision.
    fn allocate_names(
        &mut self,
        kind: &str,
        name: Option<&str>,
        func: Option<&dyn Callable>,
    ) -> (String, String) {
        let action = kind.rsplit("::").next().map(str::to_ascii_lowercase);
        let mut name = self.requested_name(name, action.as_deref(), func);
        let mut rid = ident::runtime_id(kind, &name);
        while self.runtime_ids.contains(&rid) {
            name = self.requested_name(Some(&name), None, None);
            rid = ident::runtime_id(kind, &name);
        }
        self.runtime_ids.insert(rid.clone());
        (name, rid)
    }

    /// Unique name and runtime id for a new output port of a `kind` operator.
    ///
    /// A name, or the runtime id derived from it, already used by another
    /// port gets the first free `_2`, `_3`, ... suffix.
    fn allocate_port_name(&mut self, kind: &str, name: &str) -> (String, String) {
        let mut candidate = name.to_string();
        let mut n = 2usize;
        loop {
            let rid = ident::runtime_id(kind, &candidate);
            if !self.port_names.contains(&candidate) && !self.port_ids.contains(&rid) {
                if candidate != name {
                    debug!(requested = name, allocated = %candidate, "port name de-duplicated");
                }
                self.port_names.insert(candidate.clone());
                self.port_ids.insert(rid.clone());
                return (candidate, rid);
            }
            candidate = format!("{name}_{n}");
            n += 1;
        }
    }

    fn push_operator(&mut self, kind: &str, name: String, rid: String, model: OperatorModel) -> OperatorId {
        let id = OperatorId(self.operators.len());
        debug!(index = id.0, kind, name = %name, runtime_id = %rid, "operator added");
        self.operators.push(Operator::new(id, kind, name, rid, model));
        id
    }

    /// Add an SPL operator invocation, or a marker when `kind` starts with `$`.
    pub fn add_operator(&mut self, kind: &str, name: Option<&str>) -> OperatorId {
        let model = if kind.starts_with('$') {
            OperatorModel::Virtual
        } else if kind.starts_with(PYTHON_FUNCTIONAL_NAMESPACE) {
            OperatorModel::Functional
        } else {
            OperatorModel::Spl
        };
        let (name, rid) = self.allocate_names(kind, name, None);
        self.push_operator(kind, name, rid, model)
    }

    /// Add a functional operator implemented by a Python callable.
    pub fn add_function_operator(
        &mut self,
        kind: &str,
        function: &dyn Callable,
        arity: Arity,
        name: Option<&str>,
        stateful: Option<bool>,
    ) -> Result<OperatorId> {
        // Bind first so a bad callable leaves the graph untouched.
        let binding = callable::bind(function, arity, stateful)?;
        let (name, rid) = self.allocate_names(kind, name, Some(function));
        let id = self.push_operator(kind, name, rid, OperatorModel::Functional);

        let op = &mut self.operators[id.0];
        op.set_parameters(binding.params);
        if binding.no_checkpoint {
            op.set_no_checkpoint();
        }
        if let Some(source) = binding.include {
            self.add_include(source, MODULES_TARGET);
        }
        Ok(id)
    }

    pub fn add_pass_thru_operator(&mut self, name: Option<&str>) -> OperatorId {
        self.add_operator(PASS_THRU_KIND, name)
    }

    /// Add an output port.
    ///
    /// The schema defaults to the opaque Python schema, which also makes the
    /// operator's streams not viewable. The name defaults to
    /// `<runtime id>_OUT<index>`. Names are unique across all output ports
    /// of the graph.
    pub fn add_output_port(
        &mut self,
        op: OperatorId,
        options: OutputPortOptions,
        input: Option<InputPortId>,
    ) -> Result<OutputPortId> {
        if let Some(Width::Fixed(0)) = options.width {
            return Err(ConfigError::Width.into());
        }
        if let Some(iport) = input {
            self.input_port(iport)?;
        }

        let id = OutputPortId(self.output_ports.len());
        let operator = self.operator(op)?;
        let index = operator.outputs.len();
        let kind = operator.kind.clone();
        let requested = options
            .name
            .unwrap_or_else(|| format!("{}_OUT{}", operator.runtime_id, index));
        let (name, runtime_id) = self.allocate_port_name(&kind, &requested);

        let schema = options.schema.unwrap_or_default();
        let operator = self.operator_mut(op)?;
        if schema.is_python_object() {
            operator.config.stream_viewability = false;
        }
        operator.outputs.push(id);

        debug!(operator = %operator.runtime_id, port = %runtime_id, "output port added");
        self.output_ports.push(OutputPort {
            id,
            operator: op,
            index,
            name,
            runtime_id,
            schema,
            width: options.width,
            partitioned_keys: options.partitioned_keys,
            routing: options.routing.unwrap_or_default(),
            connections: Vec::new(),
            assigns: IndexMap::new(),
        });

        if let Some(iport) = input {
            self.connect(id, iport)?;
        }
        Ok(id)
    }

    /// Add an input port, connected to `output` when given.
    pub fn add_input_port(
        &mut self,
        op: OperatorId,
        output: Option<OutputPortId>,
        window: Option<WindowConfig>,
        alias: Option<&str>,
    ) -> Result<InputPortId> {
        if let Some(oport) = output {
            self.output_port(oport)?;
        }

        let id = InputPortId(self.input_ports.len());
        let operator = self.operator_mut(op)?;
        let index = operator.inputs.len();
        operator.inputs.push(id);

        let name = format!("{GENERATED_PREFIX}iport_{}", self.next_iport);
        self.next_iport += 1;
        self.input_ports.push(InputPort {
            id,
            operator: op,
            index,
            name,
            schema: None,
            window,
            alias: alias.map(str::to_string),
            connections: Vec::new(),
        });

        if let Some(oport) = output {
            self.connect(oport, id)?;
        }
        Ok(id)
    }

    /// Connect an output port to an input port.
    ///
    /// The edge is recorded once on each side however often, and from
    /// whichever side, it is requested. The input port takes the output
    /// port's schema.
    pub fn connect(&mut self, output: OutputPortId, input: InputPortId) -> Result<()> {
        self.input_port(input)?;
        let oport = self.output_port_mut(output)?;
        if !oport.connections.contains(&input) {
            oport.connections.push(input);
        }
        let schema = oport.schema.clone();

        let iport = self.input_port_mut(input)?;
        if !iport.connections.contains(&output) {
            iport.connections.push(output);
        }
        if iport.schema.is_none() {
            iport.schema = Some(schema);
        }
        Ok(())
    }

    /// [`connect`](Self::connect) requested from the input side.
    pub fn connect_input(&mut self, input: InputPortId, output: OutputPortId) -> Result<()> {
        self.connect(output, input)
    }

    /// Register the output clause `attribute = expr` on `stream`, which must
    /// be an output of `op`.
    pub fn assign_output(
        &mut self,
        op: OperatorId,
        stream: OutputPortId,
        attribute: &str,
        expr: Expression,
    ) -> Result<()> {
        let operator = self.operator(op)?;
        let port = self.output_port(stream)?;
        if port.operator != op {
            return Err(ReferenceError::NotAnOutput {
                stream: port.name.clone(),
                operator: operator.runtime_id.clone(),
            }
            .into());
        }
        self.output_port_mut(stream)?
            .assigns
            .insert(attribute.to_string(), expr);
        Ok(())
    }

    /// Colocate `op` with `others` under a fresh `__spl_<why>$<index>` tag.
    ///
    /// Tags accumulate on each operator; an operator carrying several tags
    /// merges their groups. Markers are skipped.
    pub fn colocate(&mut self, op: OperatorId, others: &[OperatorId], why: &str) -> Result<()> {
        for other in others {
            self.operator(*other)?;
        }
        let operator = self.operator(op)?;
        if operator.is_marker() {
            return Ok(());
        }
        let tag = format!("{GENERATED_PREFIX}{why}${}", operator.index());
        self.attach_colocate_tag(op, &tag);
        for other in others {
            if !self.operators[other.0].is_marker() {
                self.attach_colocate_tag(*other, &tag);
            }
        }
        Ok(())
    }

    fn attach_colocate_tag(&mut self, op: OperatorId, tag: &str) {
        self.colocate_tags.insert(tag);
        let operator = &mut self.operators[op.0];
        let existing = operator.config.placement.colocate_tags.first().cloned();
        if operator.push_colocate_tag(tag) {
            if let Some(existing) = existing {
                self.colocate_tags.union(&existing, tag);
            }
        }
    }

    /// Canonical colocation group of `op`, if it has any tag.
    pub fn colocation_group(&self, op: OperatorId) -> Result<Option<String>> {
        let operator = self.operator(op)?;
        Ok(operator
            .config
            .placement
            .colocate_tags
            .first()
            .and_then(|t| self.colocate_tags.resolve(t))
            .map(str::to_string))
    }

    pub fn colocate_tags(&self) -> &ColocateTags {
        &self.colocate_tags
    }

    pub fn add_toolkit(&mut self, toolkit: ToolkitRef) {
        self.toolkits.insert(toolkit);
    }

    pub fn add_include(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.includes.insert(Include {
            source: source.into(),
            target: target.into(),
        });
    }

    /// Declare a submission parameter and return an expression referring to it.
    pub fn create_submission_parameter(
        &mut self,
        name: &str,
        meta_type: &str,
        default: Option<serde_json::Value>,
    ) -> Expression {
        let expr = Expression::submission_parameter(name, meta_type, default);
        self.submission_parameters
            .insert(name.to_string(), expr.clone());
        expr
    }

    /// Periodic checkpointing for the whole application.
    pub fn set_checkpoint_period(&mut self, period: impl Into<Seconds>) -> Result<()> {
        let period = period.into();
        if !period.is_positive() {
            return Err(ConfigError::CheckpointPeriod.into());
        }
        self.checkpoint_period = Some(period);
        Ok(())
    }

    pub fn add_annotation(&mut self, annotation: operator::Annotation) {
        self.annotations.push(annotation);
    }

    /// Invoke a main composite. The graph is emitted as a bare
    /// `mainComposite` reference while it stays the only operator.
    pub fn main_composite(&mut self, kind: &str) -> OperatorId {
        self.main_composite = true;
        self.add_operator(kind, None)
    }

    /// Queue construction to run at the start of the next
    /// [`generate_spl_graph`](Self::generate_spl_graph).
    pub fn defer(&mut self, f: impl FnOnce(&mut Graph) -> Result<()> + 'static) {
        self.deferred.push(Box::new(f));
    }

    /// Runs queued work in order, including work queued while running.
    /// On failure the failed closure is dropped and the ones not yet run stay
    /// queued for the next call.
    fn run_deferred(&mut self) -> Result<()> {
        while !self.deferred.is_empty() {
            let mut batch = std::mem::take(&mut self.deferred).into_iter();
            while let Some(f) = batch.next() {
                if let Err(err) = f(self) {
                    let queued = std::mem::take(&mut self.deferred);
                    self.deferred = batch.chain(queued).collect();
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::callable::PyCallable;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn requested_names_are_deduplicated_without_gaps() {
        let mut g = Graph::new("app", None);
        let names: Vec<String> = (0..4)
            .map(|i| {
                if i == 2 {
                    g.requested_name(Some("Other"), None, None);
                }
                g.requested_name(Some("X"), None, None)
            })
            .collect();
        assert_eq!(names, vec!["X", "X_2", "X_3", "X_4"]);
    }

    #[test]
    fn requested_name_skips_taken_suffixes() {
        let mut g = Graph::new("app", None);
        g.requested_name(Some("X_2"), None, None);
        g.requested_name(Some("X"), None, None);
        assert_eq!(g.requested_name(Some("X"), None, None), "X_3");
    }

    #[test]
    fn default_names() {
        let mut g = Graph::new("app", None);
        let lambda = PyCallable::lambda("m", vec![1]);
        assert_eq!(g.requested_name(None, Some("map"), Some(&lambda)), "map_lambda");
        let f = PyCallable::function("parse", "m");
        assert_eq!(g.requested_name(None, Some("map"), Some(&f)), "parse");
        let c = PyCallable::instance("Counter", "m", vec![1]);
        assert_eq!(g.requested_name(None, None, Some(&c)), "Counter");
        assert_eq!(g.requested_name(None, Some("filter"), None), "filter");
        assert_eq!(g.requested_name(None, None, None), "app");
        assert_eq!(g.requested_name(None, None, None), "app_2");
    }

    #[test]
    fn operator_indexes_follow_creation_order() {
        let mut g = Graph::new("app", None);
        let a = g.add_operator("spl.utility::Beacon", Some("A"));
        let b = g.add_operator("spl.utility::Custom", Some("B"));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(g.last_operator().map(Operator::name), Some("B"));
        assert!(g.operator(OperatorId(7)).unwrap_err().is_reference());
    }

    #[test]
    fn hashed_runtime_ids_are_unique_and_legal() {
        let mut g = Graph::new("app", None);
        let a = g.add_operator("spl.utility::Beacon", Some("my op"));
        let b = g.add_operator("spl.utility::Beacon", Some("my op"));
        let ra = g.operator(a).unwrap().runtime_id().to_string();
        let rb = g.operator(b).unwrap().runtime_id().to_string();
        assert_ne!(ra, rb);
        assert!(ident::is_identifier(&ra));
        assert!(ident::is_identifier(&rb));
        assert_eq!(g.operator(b).unwrap().name(), "my op_2");
    }

    #[test]
    fn marker_kind_creates_virtual_node() {
        let mut g = Graph::new("app", None);
        let m = g.add_operator("$Union$", None);
        assert!(g.operator(m).unwrap().is_marker());
        let p = g.add_pass_thru_operator(None);
        assert_eq!(g.operator(p).unwrap().model(), OperatorModel::Functional);
    }

    #[test]
    fn connection_is_symmetric_and_idempotent() {
        let mut g = Graph::new("app", None);
        let src = g.add_operator("spl.utility::Beacon", Some("Src"));
        let dst = g.add_operator("spl.relational::Filter", Some("Dst"));
        let o = g
            .add_output_port(
                src,
                OutputPortOptions {
                    schema: Some(Schema::parse("tuple<uint64 seq>").unwrap()),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        let i = g.add_input_port(dst, Some(o), None, None).unwrap();
        g.connect(o, i).unwrap();
        g.connect_input(i, o).unwrap();
        g.connect_input(i, o).unwrap();

        assert_eq!(g.output_port(o).unwrap().connections(), &[i]);
        assert_eq!(g.input_port(i).unwrap().connections(), &[o]);
        assert_eq!(
            g.input_port(i).unwrap().schema().map(Schema::spl_type),
            Some("tuple<uint64 seq>")
        );
    }

    #[test]
    fn output_port_defaults() {
        let mut g = Graph::new("app", None);
        let op = g.add_operator("spl.utility::Beacon", Some("B"));
        let o = g.add_output_port(op, OutputPortOptions::default(), None).unwrap();
        let port = g.output_port(o).unwrap();
        assert_eq!(port.name(), "B_OUT0");
        assert!(port.schema().is_python_object());
        assert!(!g.operator(op).unwrap().config().stream_viewability);

        let err = g
            .add_output_port(
                op,
                OutputPortOptions {
                    width: Some(Width::Fixed(0)),
                    ..Default::default()
                },
                None,
            )
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn output_port_names_are_unique_across_the_graph() {
        let mut g = Graph::new("app", None);
        let x = g.add_operator("spl.utility::Beacon", Some("X"));
        let y = g.add_operator("spl.utility::Beacon", Some("X_OUT0"));
        let named = |name: &str| OutputPortOptions {
            name: Some(name.to_string()),
            ..Default::default()
        };

        let default = g.add_output_port(x, OutputPortOptions::default(), None).unwrap();
        let explicit = g.add_output_port(y, named("X_OUT0"), None).unwrap();
        assert_eq!(g.output_port(default).unwrap().runtime_id(), "X_OUT0");
        assert_eq!(g.output_port(explicit).unwrap().name(), "X_OUT0_2");
        assert_eq!(g.output_port(explicit).unwrap().runtime_id(), "X_OUT0_2");

        let a = g.add_output_port(x, named("Lines"), None).unwrap();
        let b = g.add_output_port(y, named("Lines"), None).unwrap();
        let c = g.add_output_port(y, named("Lines"), None).unwrap();
        let ids: Vec<&str> = [a, b, c]
            .iter()
            .map(|p| g.output_port(*p).unwrap().runtime_id())
            .collect();
        assert_eq!(ids, vec!["Lines", "Lines_2", "Lines_3"]);
    }

    #[test]
    fn hashed_port_names_do_not_collide() {
        let mut g = Graph::new("app", None);
        let op = g.add_operator("spl.utility::Beacon", Some("B"));
        let named = |name: &str| OutputPortOptions {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let a = g.add_output_port(op, named("my lines"), None).unwrap();
        let b = g.add_output_port(op, named("my lines"), None).unwrap();
        let ra = g.output_port(a).unwrap().runtime_id();
        let rb = g.output_port(b).unwrap().runtime_id();
        assert_ne!(ra, rb);
        assert!(ident::is_identifier(ra));
        assert_eq!(g.output_port(b).unwrap().name(), "my lines_2");
    }

    #[test]
    fn failed_deferred_work_keeps_the_rest_queued() {
        let mut g = Graph::new("app", None);
        g.defer(|_| Err(ConfigError::CheckpointPeriod.into()));
        g.defer(|g| {
            g.add_operator("spl.utility::Beacon", Some("Later"));
            Ok(())
        });

        assert!(g.generate_spl_graph().unwrap_err().is_config());
        assert!(g.is_empty());

        let doc = g.generate_spl_graph().unwrap();
        assert!(doc.operator("Later").is_some());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn input_port_names_are_internal_and_unique() {
        let mut g = Graph::new("app", None);
        let a = g.add_operator("spl.utility::Custom", Some("A"));
        let b = g.add_operator("spl.utility::Custom", Some("B"));
        let i0 = g.add_input_port(a, None, None, None).unwrap();
        let i1 = g.add_input_port(b, None, None, Some("rhs")).unwrap();
        assert_eq!(g.input_port(i0).unwrap().name(), "__spl_iport_0");
        assert_eq!(g.input_port(i1).unwrap().name(), "__spl_iport_1");
        assert_eq!(g.input_port(i1).unwrap().alias(), Some("rhs"));
    }

    #[test]
    fn colocation_is_transitive() {
        let mut g = Graph::new("app", None);
        let a = g.add_operator("spl.utility::Custom", Some("A"));
        let b = g.add_operator("spl.utility::Custom", Some("B"));
        let c = g.add_operator("spl.utility::Custom", Some("C"));
        let d = g.add_operator("spl.utility::Custom", Some("D"));

        g.colocate(a, &[b], "colocate").unwrap();
        g.colocate(c, &[b], "colocate").unwrap();

        let group = g.colocation_group(a).unwrap();
        assert_eq!(group.as_deref(), Some("__spl_colocate$0"));
        assert_eq!(g.colocation_group(b).unwrap(), group);
        assert_eq!(g.colocation_group(c).unwrap(), group);
        assert_eq!(g.colocation_group(d).unwrap(), None);
        assert_eq!(
            g.operator(b).unwrap().config().placement.colocate_tags,
            vec!["__spl_colocate$0", "__spl_colocate$2"]
        );
    }

    #[test]
    fn colocation_merges_existing_groups() {
        let mut g = Graph::new("app", None);
        let ops: Vec<OperatorId> = ["A", "B", "C", "D"]
            .iter()
            .map(|n| g.add_operator("spl.utility::Custom", Some(n)))
            .collect();
        g.colocate(ops[0], &[ops[1]], "colocate").unwrap();
        g.colocate(ops[2], &[ops[3]], "colocate").unwrap();
        assert_ne!(
            g.colocation_group(ops[0]).unwrap(),
            g.colocation_group(ops[3]).unwrap()
        );

        // Bridge both groups through a third tag.
        g.colocate(ops[1], &[ops[3]], "lowLatency").unwrap();
        let group = g.colocation_group(ops[0]).unwrap();
        for op in &ops {
            assert_eq!(g.colocation_group(*op).unwrap(), group);
        }
    }

    #[test]
    fn markers_are_not_colocated() {
        let mut g = Graph::new("app", None);
        let a = g.add_operator("spl.utility::Custom", Some("A"));
        let m = g.add_operator("$Union$", None);
        g.colocate(m, &[a], "colocate").unwrap();
        assert_eq!(g.colocation_group(a).unwrap(), None);
        g.colocate(a, &[m], "colocate").unwrap();
        assert!(g.operator(m).unwrap().config().placement.is_empty());
    }

    #[test]
    fn checkpoint_period_must_be_positive() {
        let mut g = Graph::new("app", None);
        assert!(g.set_checkpoint_period(0).unwrap_err().is_config());
        assert!(g.set_checkpoint_period(2.5).is_ok());
    }

    #[test]
    fn failed_binding_leaves_graph_untouched() {
        let mut g = Graph::new("app", None);
        let f = PyCallable::function("gen", callable::ENTRY_POINT_MODULE);
        let err = g
            .add_function_operator(
                "com.ibm.streamsx.topology.functional.python::Source",
                &f,
                Arity::Zero,
                None,
                None,
            )
            .unwrap_err();
        assert!(err.is_config());
        assert!(g.is_empty());
    }

    #[test]
    fn sanitized_identity() {
        let g = Graph::new("my app", Some("com.acme!.apps"));
        assert_eq!(g.name(), "myapp");
        assert_eq!(g.namespace(), "com.acme.apps");
        let g = Graph::new("app", None);
        assert_eq!(g.namespace(), "app");
    }
}
