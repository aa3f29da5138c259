pub mod json;

pub use json::render_graph_json;
