//! SPL language level building blocks: identifiers, schemas, expressions,
//! windows and operator invocation helpers.

pub mod expr;
pub mod ident;
pub mod op;
pub mod schema;
pub mod window;

pub use expr::{ExprType, Expression, ParamValue};
pub use op::{Invoke, Map, Params, Sink, Source};
pub use schema::{CommonSchema, Schema};
pub use window::{Policy, WindowConfig, WindowKind};
