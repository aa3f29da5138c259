//! Invocation of native SPL operators.
//!
//! [`Invoke`] declares an operator with any number of input and output
//! ports. [`Source`], [`Map`] and [`Sink`] cover the single port cases.
//! Output clauses are registered explicitly with [`Invoke::set_output`].

use crate::error::{ReferenceError, Result};
use crate::graph::port::{OperatorId, OutputPortId};
use crate::graph::{Graph, OutputPortOptions};
use crate::spl::expr::{Expression, ParamValue};
use crate::spl::schema::Schema;

/// Operator parameters in declaration order.
pub type Params = Vec<(String, ParamValue)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoke {
    op: OperatorId,
    inputs: Vec<OutputPortId>,
    outputs: Vec<OutputPortId>,
}

impl Invoke {
    /// Declare an invocation of `kind` consuming `inputs` and producing one
    /// stream per schema in `schemas`.
    pub fn new(
        graph: &mut Graph,
        kind: &str,
        inputs: &[OutputPortId],
        schemas: &[Schema],
        params: Params,
        name: Option<&str>,
    ) -> Result<Self> {
        for stream in inputs {
            graph.output_port(*stream)?;
        }

        let op = graph.add_operator(kind, name);
        graph.operator_mut(op)?.set_parameters(params);

        // Attribute references need a qualifier once there are several ports.
        let qualify = inputs.len() > 1;
        for stream in inputs {
            let alias = if qualify {
                Some(graph.output_port(*stream)?.runtime_id().to_string())
            } else {
                None
            };
            graph.add_input_port(op, Some(*stream), None, alias.as_deref())?;
        }

        let mut outputs = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let options = OutputPortOptions {
                schema: Some(schema.clone()),
                ..Default::default()
            };
            outputs.push(graph.add_output_port(op, options, None)?);
        }

        Ok(Self {
            op,
            inputs: inputs.to_vec(),
            outputs,
        })
    }

    pub fn operator(&self) -> OperatorId {
        self.op
    }

    pub fn inputs(&self) -> &[OutputPortId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPortId] {
        &self.outputs
    }

    pub fn params(&self, graph: &mut Graph, params: Params) -> Result<()> {
        graph.operator_mut(self.op)?.set_parameters(params);
        Ok(())
    }

    /// Arbitrary SPL expression.
    pub fn expression(value: impl Into<String>) -> Expression {
        Expression::expression(value)
    }

    /// Reference to attribute `name` of an input stream.
    ///
    /// With several input ports the stream is required and the reference is
    /// qualified by the port alias.
    pub fn attribute(
        &self,
        graph: &Graph,
        stream: Option<OutputPortId>,
        name: &str,
    ) -> Result<Expression> {
        let operator = graph.operator(self.op)?;
        let Some(stream) = stream else {
            if self.inputs.len() == 1 {
                return Ok(Expression::attribute(name));
            }
            return Err(ReferenceError::AmbiguousAttribute {
                attribute: name.to_string(),
                operator: operator.runtime_id().to_string(),
                ports: self.inputs.len(),
            }
            .into());
        };

        let Some(position) = self.inputs.iter().position(|s| *s == stream) else {
            return Err(ReferenceError::NotAnInput {
                stream: graph.output_port(stream)?.name().to_string(),
                operator: operator.runtime_id().to_string(),
            }
            .into());
        };

        if self.inputs.len() == 1 {
            return Ok(Expression::attribute(name));
        }
        let iport = graph.input_port(operator.inputs()[position])?;
        let qualifier = match iport.alias() {
            Some(alias) => alias.to_string(),
            None => graph.output_port(stream)?.runtime_id().to_string(),
        };
        Ok(Expression::attribute(format!("{qualifier}.{name}")))
    }

    /// Output clause expression for `stream`, e.g. `IterationCount()`.
    pub fn output(
        &self,
        graph: &Graph,
        stream: OutputPortId,
        value: impl Into<String>,
    ) -> Result<Expression> {
        self.check_output(graph, stream)?;
        Ok(Expression::expression(value))
    }

    /// Assign `expr` to `attribute` in the output clause of `stream`.
    pub fn set_output(
        &self,
        graph: &mut Graph,
        stream: OutputPortId,
        attribute: &str,
        expr: Expression,
    ) -> Result<()> {
        self.check_output(graph, stream)?;
        graph.assign_output(self.op, stream, attribute, expr)
    }

    fn check_output(&self, graph: &Graph, stream: OutputPortId) -> Result<()> {
        if self.outputs.contains(&stream) {
            return Ok(());
        }
        Err(ReferenceError::NotAnOutput {
            stream: graph.output_port(stream)?.name().to_string(),
            operator: graph.operator(self.op)?.runtime_id().to_string(),
        }
        .into())
    }
}

/// Operator with no inputs and a single output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    invoke: Invoke,
}

impl Source {
    pub fn new(
        graph: &mut Graph,
        kind: &str,
        schema: Schema,
        params: Params,
        name: Option<&str>,
    ) -> Result<Self> {
        let invoke = Invoke::new(graph, kind, &[], &[schema], params, name)?;
        Ok(Self { invoke })
    }

    pub fn stream(&self) -> OutputPortId {
        self.invoke.outputs[0]
    }

    pub fn invoke(&self) -> &Invoke {
        &self.invoke
    }
}

/// Operator with a single input and a single output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    invoke: Invoke,
}

impl Map {
    /// The output schema defaults to the input stream's schema.
    pub fn new(
        graph: &mut Graph,
        kind: &str,
        stream: OutputPortId,
        schema: Option<Schema>,
        params: Params,
        name: Option<&str>,
    ) -> Result<Self> {
        let schema = match schema {
            Some(schema) => schema,
            None => graph.output_port(stream)?.schema().clone(),
        };
        let invoke = Invoke::new(graph, kind, &[stream], &[schema], params, name)?;
        Ok(Self { invoke })
    }

    pub fn stream(&self) -> OutputPortId {
        self.invoke.outputs[0]
    }

    pub fn invoke(&self) -> &Invoke {
        &self.invoke
    }
}

/// Operator with a single input and no outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sink {
    invoke: Invoke,
}

impl Sink {
    pub fn new(
        graph: &mut Graph,
        kind: &str,
        stream: OutputPortId,
        params: Params,
        name: Option<&str>,
    ) -> Result<Self> {
        let invoke = Invoke::new(graph, kind, &[stream], &[], params, name)?;
        Ok(Self { invoke })
    }

    pub fn invoke(&self) -> &Invoke {
        &self.invoke
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema(s: &str) -> Schema {
        Schema::parse(s).unwrap()
    }

    #[test]
    fn beacon_output_assignment() {
        let mut g = Graph::new("app", None);
        let beacon = Source::new(
            &mut g,
            "spl.utility::Beacon",
            schema("tuple<uint64 seq>"),
            vec![("iterations".to_string(), 5i64.into())],
            Some("Beacon"),
        )
        .unwrap();
        let inv = beacon.invoke();
        let seq = inv
            .output(&g, beacon.stream(), "IterationCount()")
            .unwrap();
        inv.set_output(&mut g, beacon.stream(), "seq", seq).unwrap();

        let doc = g.generate_spl_graph().unwrap();
        let out = &doc.operator("Beacon").unwrap()["outputs"][0];
        assert_eq!(
            out["assigns"],
            json!({"seq": {"type": "splexpr", "value": "IterationCount()"}})
        );
    }

    #[test]
    fn output_on_foreign_stream_is_rejected() {
        let mut g = Graph::new("app", None);
        let a = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], None)
            .unwrap();
        let b = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], None)
            .unwrap();
        let err = a.invoke().output(&g, b.stream(), "1").unwrap_err();
        assert!(matches!(
            err,
            GraphError::Reference(ReferenceError::NotAnOutput { .. })
        ));
        assert!(
            a.invoke()
                .set_output(&mut g, b.stream(), "a", Expression::int32(1))
                .is_err()
        );
    }

    #[test]
    fn attributes_single_input() {
        let mut g = Graph::new("app", None);
        let src = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], None)
            .unwrap();
        let other = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], None)
            .unwrap();
        let filter = Map::new(&mut g, "spl.relational::Filter", src.stream(), None, vec![], None)
            .unwrap();
        let inv = filter.invoke();
        assert_eq!(
            inv.attribute(&g, None, "a").unwrap(),
            Expression::attribute("a")
        );
        assert_eq!(
            inv.attribute(&g, Some(src.stream()), "a").unwrap(),
            Expression::attribute("a")
        );
        assert!(inv.attribute(&g, Some(other.stream()), "a").unwrap_err().is_reference());
        assert_eq!(
            g.output_port(filter.stream()).unwrap().schema().spl_type(),
            "tuple<int32 a>"
        );
    }

    #[test]
    fn attributes_multiple_inputs_are_qualified() {
        let mut g = Graph::new("app", None);
        let l = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], Some("L"))
            .unwrap();
        let r = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 b>"), vec![], Some("R"))
            .unwrap();
        let join = Invoke::new(
            &mut g,
            "spl.relational::Join",
            &[l.stream(), r.stream()],
            &[schema("tuple<int32 a, int32 b>")],
            vec![],
            Some("J"),
        )
        .unwrap();

        let err = join.attribute(&g, None, "a").unwrap_err();
        assert!(matches!(
            err,
            GraphError::Reference(ReferenceError::AmbiguousAttribute { ports: 2, .. })
        ));
        assert_eq!(
            join.attribute(&g, Some(r.stream()), "b").unwrap(),
            Expression::attribute("R_OUT0.b")
        );

        let doc = g.generate_spl_graph().unwrap();
        let inputs = &doc.operator("J").unwrap()["inputs"];
        assert_eq!(inputs[0]["alias"], json!("L_OUT0"));
        assert_eq!(inputs[1]["alias"], json!("R_OUT0"));
    }

    #[test]
    fn sink_has_no_outputs_and_null_params() {
        let mut g = Graph::new("app", None);
        let src = Source::new(&mut g, "spl.utility::Beacon", schema("tuple<int32 a>"), vec![], None)
            .unwrap();
        let sink = Sink::new(
            &mut g,
            "spl.utility::Custom",
            src.stream(),
            vec![("x".to_string(), ParamValue::from(None::<Expression>))],
            Some("Out"),
        )
        .unwrap();
        assert!(sink.invoke().outputs().is_empty());
        let doc = g.generate_spl_graph().unwrap();
        assert_eq!(
            doc.operator("Out").unwrap()["parameters"]["x"],
            json!({"type": "splexpr", "value": "null"})
        );
    }
}
