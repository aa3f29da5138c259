use crate::graph::GraphJson;

/// Render a generated graph as JSON text.
///
/// Pretty output ends with a newline so it can be written straight to a
/// terminal or file; compact output is a single line without one.
pub fn render_graph_json(doc: &GraphJson, compact: bool) -> anyhow::Result<String> {
    if compact {
        return Ok(serde_json::to_string(doc)?);
    }
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    Ok(text)
}
