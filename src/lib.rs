//! Builder and serializer for IBM Streams application graphs.
//!
//! A [`Graph`] collects operator invocations, their ports and connections,
//! placement and consistent region settings, then flattens into the JSON
//! document (see [`graph::model`]) the Streams compiler turns into an
//! application bundle.

pub mod consistent;
pub mod error;
pub mod graph;
pub mod render;
pub mod spec;
pub mod spl;

pub use consistent::{ConsistentRegionConfig, Seconds, Trigger};
pub use error::{ConfigError, GraphError, ReferenceError, Result};
pub use graph::{Graph, GraphJson, OutputPortOptions, ToolkitRef};
