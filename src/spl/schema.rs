//! Stream schemas.
//!
//! A schema is either one of the common schemas understood by the Python
//! runtime or an SPL tuple type. Raw strings and attribute lists normalize
//! into the canonical form before they reach a port.

use crate::error::ConfigError;
use std::fmt;

/// Schemas with a fixed wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommonSchema {
    /// Opaque pickled Python object. Not viewable.
    Python,
    Json,
    String,
    Binary,
    Xml,
}

impl CommonSchema {
    pub fn spl_type(&self) -> &'static str {
        match self {
            CommonSchema::Python => "tuple<blob __spl_po>",
            CommonSchema::Json => "tuple<rstring jsonString>",
            CommonSchema::String => "tuple<rstring string>",
            CommonSchema::Binary => "tuple<blob binary>",
            CommonSchema::Xml => "tuple<xml document>",
        }
    }

    fn from_spl_type(s: &str) -> Option<Self> {
        [
            CommonSchema::Python,
            CommonSchema::Json,
            CommonSchema::String,
            CommonSchema::Binary,
            CommonSchema::Xml,
        ]
        .into_iter()
        .find(|c| c.spl_type() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Schema {
    Common(CommonSchema),
    /// `tuple<...>` type string or a named SPL tuple type.
    Tuple(String),
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Common(CommonSchema::Python)
    }
}

impl Schema {
    /// Normalize a schema string.
    ///
    /// Accepts the common schema names (`python`, `json`, `string`, `binary`,
    /// `xml`, case insensitive), a `tuple<...>` literal or a named type such as
    /// `com.acme::Reading`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        let bad = |reason: &str| ConfigError::Schema {
            schema: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(bad("empty schema"));
        }

        match s.to_ascii_lowercase().as_str() {
            "python" => return Ok(Schema::Common(CommonSchema::Python)),
            "json" => return Ok(Schema::Common(CommonSchema::Json)),
            "string" => return Ok(Schema::Common(CommonSchema::String)),
            "binary" => return Ok(Schema::Common(CommonSchema::Binary)),
            "xml" => return Ok(Schema::Common(CommonSchema::Xml)),
            _ => {}
        }

        if let Some(common) = CommonSchema::from_spl_type(s) {
            return Ok(Schema::Common(common));
        }

        if let Some(body) = s.strip_prefix("tuple<") {
            if !body.ends_with('>') {
                return Err(bad("unterminated tuple type"));
            }
            if body.len() == 1 {
                return Err(bad("tuple type has no attributes"));
            }
            return Ok(Schema::Tuple(s.to_string()));
        }

        if s.contains(char::is_whitespace) || s.contains(['<', '>', ',']) {
            return Err(bad("not a tuple type or type name"));
        }
        Ok(Schema::Tuple(s.to_string()))
    }

    /// Build `tuple<type name, ...>` from `(name, type)` pairs.
    pub fn from_attributes<N, T>(attributes: &[(N, T)]) -> Result<Self, ConfigError>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if attributes.is_empty() {
            return Err(ConfigError::Schema {
                schema: "tuple<>".to_string(),
                reason: "tuple type has no attributes".to_string(),
            });
        }
        let body = attributes
            .iter()
            .map(|(n, t)| format!("{} {}", t.as_ref(), n.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Schema::Tuple(format!("tuple<{body}>")))
    }

    /// Wire form emitted as a port `type`.
    pub fn spl_type(&self) -> &str {
        match self {
            Schema::Common(c) => c.spl_type(),
            Schema::Tuple(t) => t,
        }
    }

    pub fn is_python_object(&self) -> bool {
        matches!(self, Schema::Common(CommonSchema::Python))
    }
}

impl From<CommonSchema> for Schema {
    fn from(c: CommonSchema) -> Self {
        Schema::Common(c)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spl_type())
    }
}
