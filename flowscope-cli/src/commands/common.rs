use std::path::Path;

use anyhow::Context;
use flowscope::diagram::Diagram;

/// Read a file as text, naming it in the error.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse a JSON file.
pub fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load and validate a diagram snapshot.
pub fn load_diagram(path: &Path) -> anyhow::Result<Diagram> {
    let text = read_text(path)?;
    let diagram = Diagram::from_json(&text)
        .with_context(|| format!("failed to load diagram: {}", path.display()))?;
    log::debug!(
        "loaded {} nodes and {} edges from {}",
        diagram.nodes().len(),
        diagram.edges().len(),
        path.display()
    );
    Ok(diagram)
}

/// Diagram title used in headers and DOT output: the file stem.
pub fn diagram_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("diagram")
        .to_string()
}
