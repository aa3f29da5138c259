//! SPL expressions and typed literals.
//!
//! Wire form is `{"type": ..., "value": ...}`. Parameters that are not an
//! expression are emitted as `{"value": <raw>}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprType {
    #[serde(rename = "INT8")]
    Int8,
    #[serde(rename = "INT16")]
    Int16,
    #[serde(rename = "INT32")]
    Int32,
    #[serde(rename = "INT64")]
    Int64,
    #[serde(rename = "UINT8")]
    Uint8,
    #[serde(rename = "UINT16")]
    Uint16,
    #[serde(rename = "UINT32")]
    Uint32,
    #[serde(rename = "UINT64")]
    Uint64,
    #[serde(rename = "FLOAT32")]
    Float32,
    #[serde(rename = "FLOAT64")]
    Float64,
    #[serde(rename = "RSTRING")]
    Rstring,
    #[serde(rename = "splexpr")]
    SplExpr,
    #[serde(rename = "attribute")]
    Attribute,
    #[serde(rename = "submissionParameter")]
    SubmissionParameter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    #[serde(rename = "type")]
    pub type_: ExprType,
    pub value: Value,
}

impl Expression {
    pub fn new(type_: ExprType, value: impl Into<Value>) -> Self {
        Self {
            type_,
            value: value.into(),
        }
    }

    /// Arbitrary SPL expression text, e.g. `IterationCount()`.
    pub fn expression(value: impl Into<String>) -> Self {
        Self::new(ExprType::SplExpr, value.into())
    }

    /// The SPL `null` literal.
    pub fn null() -> Self {
        Self::expression("null")
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        Self::new(ExprType::Attribute, name.into())
    }

    pub fn int8(v: i8) -> Self {
        Self::new(ExprType::Int8, v)
    }
    pub fn int16(v: i16) -> Self {
        Self::new(ExprType::Int16, v)
    }
    pub fn int32(v: i32) -> Self {
        Self::new(ExprType::Int32, v)
    }
    pub fn int64(v: i64) -> Self {
        Self::new(ExprType::Int64, v)
    }
    pub fn uint8(v: u8) -> Self {
        Self::new(ExprType::Uint8, v)
    }
    pub fn uint16(v: u16) -> Self {
        Self::new(ExprType::Uint16, v)
    }
    pub fn uint32(v: u32) -> Self {
        Self::new(ExprType::Uint32, v)
    }
    pub fn uint64(v: u64) -> Self {
        Self::new(ExprType::Uint64, v)
    }
    pub fn float32(v: f32) -> Self {
        Self::new(ExprType::Float32, v)
    }
    pub fn float64(v: f64) -> Self {
        Self::new(ExprType::Float64, v)
    }
    pub fn rstring(v: impl Into<String>) -> Self {
        Self::new(ExprType::Rstring, v.into())
    }

    /// Reference to a submission time parameter.
    ///
    /// `meta_type` is the SPL type of the value (e.g. `INT32`, `RSTRING`).
    pub fn submission_parameter(
        name: impl Into<String>,
        meta_type: impl Into<String>,
        default: Option<Value>,
    ) -> Self {
        let mut value = Map::new();
        value.insert("name".to_string(), Value::String(name.into()));
        value.insert("metaType".to_string(), Value::String(meta_type.into()));
        if let Some(default) = default {
            value.insert("defaultValue".to_string(), default);
        }
        Self::new(ExprType::SubmissionParameter, Value::Object(value))
    }

    /// Name of a submission parameter expression.
    pub fn submission_parameter_name(&self) -> Option<&str> {
        match self.type_ {
            ExprType::SubmissionParameter => self.value.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn spl_json(&self) -> Value {
        json!({ "type": self.type_, "value": self.value })
    }
}

/// Value of an operator parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Expr(Expression),
    Raw(Value),
}

impl ParamValue {
    pub fn spl_json(&self) -> Value {
        match self {
            ParamValue::Expr(e) => e.spl_json(),
            ParamValue::Raw(v) => json!({ "value": v }),
        }
    }
}

impl From<Expression> for ParamValue {
    fn from(e: Expression) -> Self {
        ParamValue::Expr(e)
    }
}

/// A JSON `null` is the SPL `null` literal.
impl From<Value> for ParamValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => ParamValue::Expr(Expression::null()),
            v => ParamValue::Raw(v),
        }
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => ParamValue::Expr(Expression::null()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Raw(Value::String(v.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Raw(Value::String(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Raw(Value::Bool(v))
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Raw(Value::from(v))
    }
}
