//! Flattening the graph into its JSON document.
//!
//! One pass after deferred construction has run. Names and identifiers are
//! fixed at creation time, so generating twice yields the same document.

use super::model::{CheckpointJson, GraphConfigJson, GraphJson, IncludeJson, SplConfigJson};
use super::operator::{Operator, OperatorModel};
use super::{Graph, ToolkitRef};
use crate::error::Result;
use serde_json::{Value, json};
use tracing::{info, warn};

impl ToolkitRef {
    pub fn spl_json(&self) -> Value {
        match self {
            ToolkitRef::Root(root) => json!({ "root": root }),
            ToolkitRef::Dependency { name, version } => {
                json!({ "name": name, "version": version })
            }
        }
    }
}

impl Graph {
    /// True if no operator other than markers needs the Python runtime.
    pub fn is_pure_spl(&self) -> bool {
        self.operators
            .iter()
            .filter(|op| !op.is_marker())
            .all(|op| op.model() == OperatorModel::Spl)
    }

    /// Produce the graph document.
    pub fn generate_spl_graph(&mut self) -> Result<GraphJson> {
        // 1) Let deferred construction finish.
        self.run_deferred()?;

        // 2) Application level config.
        let (model, language) = if self.is_pure_spl() {
            ("spl", "spl")
        } else {
            ("functional", "python")
        };

        let includes = self
            .includes
            .iter()
            .map(|inc| IncludeJson {
                source: inc.source.clone(),
                target: inc.target.clone(),
            })
            .collect();

        let config = GraphConfigJson {
            model: model.to_string(),
            language: language.to_string(),
            includes,
            spl: SplConfigJson {
                toolkits: self.toolkits.iter().map(ToolkitRef::spl_json).collect(),
            },
            checkpoint: self.checkpoint_period.map(|p| CheckpointJson {
                mode: "periodic".to_string(),
                period: p.as_micros(),
            }),
            colocate_tag_mapping: self.colocate_tags.mapping(),
        };

        // 3) Operators, or the bare main composite.
        let main_composite = match (self.main_composite, self.operators.as_slice()) {
            (true, [only]) => Some(only.kind().to_string()),
            (true, ops) => {
                warn!(
                    operators = ops.len(),
                    "main composite requested with more than one operator, emitting all operators"
                );
                None
            }
            (false, _) => None,
        };
        let operators = if main_composite.is_some() {
            Vec::new()
        } else {
            self.operators.iter().map(|op| self.operator_json(op)).collect()
        };

        let parameters = self
            .submission_parameters
            .iter()
            .map(|(name, expr)| (name.clone(), expr.spl_json()))
            .collect();

        info!(
            name = %self.name,
            namespace = %self.namespace,
            operators = operators.len(),
            model,
            "graph generated"
        );

        Ok(GraphJson {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            public: true,
            annotations: self.annotations.iter().map(|a| a.spl_json()).collect(),
            config,
            parameters,
            operators,
            main_composite,
        })
    }

    fn operator_json(&self, op: &Operator) -> Value {
        let outputs = op
            .outputs()
            .iter()
            .map(|id| {
                let port = &self.output_ports[id.0];
                let connections = port
                    .connections()
                    .iter()
                    .map(|i| self.input_ports[i.0].name().to_string())
                    .collect();
                port.spl_json(connections)
            })
            .collect();

        let inputs = op
            .inputs()
            .iter()
            .map(|id| {
                let port = &self.input_ports[id.0];
                let connections = port
                    .connections()
                    .iter()
                    .map(|o| self.output_ports[o.0].runtime_id().to_string())
                    .collect();
                port.spl_json(connections)
            })
            .collect();

        Value::Object(op.spl_json(outputs, inputs))
    }
}
