//! Spec layer: the topology description read by the CLI.
//!
//! Kept separate from the graph builder so the library can be used without
//! any file format. It owns:
//! - the serde shape of topology.json
//! - validation and translation into a `Graph`

pub mod topology;

pub use topology::{OperatorSpec, TopologySpec};
