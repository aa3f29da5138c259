//! Binding of Python callables to functional operators.
//!
//! The hosting runtime locates a callable by `pyName`/`pyModule`. Callables
//! that cannot be imported by name (class instances, lambdas, anything from
//! the entry point module) travel inline: their serialized form is base64
//! encoded into `pyCallable` alongside `pyCallableFormat`.

use crate::error::ConfigError;
use crate::spl::expr::ParamValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Module name of the program entry point.
pub const ENTRY_POINT_MODULE: &str = "__main__";

/// `__name__` of an anonymous function.
pub const LAMBDA_NAME: &str = "<lambda>";

/// Version of the inline callable wire format.
pub const CALLABLE_FORMAT_VERSION: u32 = 1;

/// Directory inside the application bundle receiving callable sources.
pub const MODULES_TARGET: &str = "opt/python/modules";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableShape {
    /// A plain function (including lambdas).
    Function,
    /// An instance of a callable class, possibly holding state.
    Instance,
}

/// Number of arguments the adapter passes to a plain function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Source style, called without a tuple.
    Zero,
    /// Called once per input tuple.
    One,
}

impl Arity {
    fn adapter(&self) -> &'static str {
        match self {
            Arity::Zero => "_Callable0",
            Arity::One => "_Callable1",
        }
    }
}

/// A Python callable as seen by the graph builder.
pub trait Callable {
    /// `__name__` of a function or the class name of an instance.
    fn name(&self) -> &str;

    /// Declaring module.
    fn module(&self) -> &str;

    fn shape(&self) -> CallableShape;

    /// Source file of the declaring module, shipped with the application.
    fn source_file(&self) -> Option<&str> {
        None
    }

    /// Serialization format name of [`serialize`](Self::serialize).
    fn wire_format(&self) -> &str {
        "dill"
    }

    /// Serialized callable, including any instance state.
    fn serialize(&self) -> Result<Vec<u8>, ConfigError>;

    fn is_lambda(&self) -> bool {
        self.shape() == CallableShape::Function && self.name() == LAMBDA_NAME
    }

    /// True if the callable cannot be imported by name.
    fn is_inline(&self) -> bool {
        self.shape() == CallableShape::Instance
            || self.is_lambda()
            || self.module() == ENTRY_POINT_MODULE
    }
}

/// Callable described by its names and an already serialized payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyCallable {
    name: String,
    module: String,
    shape: CallableShape,
    source_file: Option<String>,
    payload: Option<Vec<u8>>,
}

impl PyCallable {
    pub fn function(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            shape: CallableShape::Function,
            source_file: None,
            payload: None,
        }
    }

    pub fn lambda(module: impl Into<String>, payload: Vec<u8>) -> Self {
        Self::function(LAMBDA_NAME, module).with_payload(payload)
    }

    pub fn instance(
        class_name: impl Into<String>,
        module: impl Into<String>,
        state: Vec<u8>,
    ) -> Self {
        Self {
            name: class_name.into(),
            module: module.into(),
            shape: CallableShape::Instance,
            source_file: None,
            payload: Some(state),
        }
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }
}

impl Callable for PyCallable {
    fn name(&self) -> &str {
        &self.name
    }

    fn module(&self) -> &str {
        &self.module
    }

    fn shape(&self) -> CallableShape {
        self.shape
    }

    fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    fn serialize(&self) -> Result<Vec<u8>, ConfigError> {
        match &self.payload {
            Some(bytes) if !bytes.is_empty() => Ok(bytes.clone()),
            _ => Err(ConfigError::Callable {
                name: self.name.clone(),
                reason: "no serialized form available".to_string(),
            }),
        }
    }
}

/// Parameters and config produced by binding a callable to an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub params: Vec<(String, ParamValue)>,
    pub no_checkpoint: bool,
    pub include: Option<String>,
}

/// Bind `callable` to a node whose adapter has `arity` arguments.
///
/// `stateful` of `Some(false)` marks the node as not needing checkpoints.
pub fn bind(
    callable: &dyn Callable,
    arity: Arity,
    stateful: Option<bool>,
) -> Result<Binding, ConfigError> {
    let mut params: Vec<(String, ParamValue)> = vec![
        ("pyName".to_string(), callable.name().into()),
        ("pyModule".to_string(), callable.module().into()),
    ];

    if callable.shape() == CallableShape::Function {
        params.push(("pyAdapter".to_string(), arity.adapter().into()));
    }

    if callable.is_inline() {
        let bytes = callable.serialize()?;
        params.push(("pyCallable".to_string(), STANDARD.encode(bytes).into()));
        params.push((
            "pyCallableFormat".to_string(),
            format!("{}/{}", callable.wire_format(), CALLABLE_FORMAT_VERSION).into(),
        ));
    }

    if let Some(stateful) = stateful {
        params.push(("pyStateful".to_string(), ParamValue::Raw(Value::Bool(stateful))));
    }

    Ok(Binding {
        params,
        no_checkpoint: stateful == Some(false),
        include: callable.source_file().map(str::to_string),
    })
}
