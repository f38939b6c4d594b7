//! Graphviz DOT output.
//!
//! [`DotWriter`] accumulates node and edge statements and renders a `digraph`.
//! Labels are escaped with [`escape_dot`].

use std::fmt::Write;

/// Escapes a string for use inside a double-quoted DOT label.
///
/// Handles quotes, backslashes, newlines and angle brackets; carriage returns
/// are dropped.
///
/// ```rust
/// use flowscope::utils::escape_dot;
///
/// assert_eq!(escape_dot("x < \"10\""), "x \\< \\\"10\\\"");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '<' => out.push_str("\\<"),
            '>' => out.push_str("\\>"),
            c => out.push(c),
        }
    }
    out
}

/// Incremental builder for a DOT `digraph`.
#[derive(Debug, Clone)]
pub struct DotWriter {
    out: String,
}

impl DotWriter {
    /// Starts a digraph called `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", escape_dot(name));
        let _ = writeln!(out, "    node [shape=box, fontname=\"monospace\"];");
        DotWriter { out }
    }

    /// Adds a node with a label and an optional shape.
    pub fn node(&mut self, id: &str, label: &str, shape: Option<&str>) {
        let _ = write!(
            self.out,
            "    \"{}\" [label=\"{}\"",
            escape_dot(id),
            escape_dot(label)
        );
        if let Some(shape) = shape {
            let _ = write!(self.out, ", shape={shape}");
        }
        self.out.push_str("];\n");
    }

    /// Adds an edge with an optional label and an optional style.
    pub fn edge(&mut self, source: &str, target: &str, label: Option<&str>, style: Option<&str>) {
        let _ = write!(
            self.out,
            "    \"{}\" -> \"{}\"",
            escape_dot(source),
            escape_dot(target)
        );

        let mut attributes = Vec::new();
        if let Some(label) = label {
            attributes.push(format!("label=\"{}\"", escape_dot(label)));
        }
        if let Some(style) = style {
            attributes.push(format!("style={style}"));
        }
        if !attributes.is_empty() {
            let _ = write!(self.out, " [{}]", attributes.join(", "));
        }
        self.out.push_str(";\n");
    }

    /// Closes the graph and returns the DOT text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("plain"), "plain");
        assert_eq!(escape_dot("a\\b"), "a\\\\b");
        assert_eq!(escape_dot("line1\r\nline2"), "line1\\nline2");
        assert_eq!(escape_dot("x >= 1"), "x \\>= 1");
    }

    #[test]
    fn test_writer_output() {
        let mut dot = DotWriter::new("cfg");
        dot.node("n0", "start", Some("ellipse"));
        dot.node("n1", "x = \"a\"", None);
        dot.edge("n0", "n1", None, None);
        dot.edge("n1", "n0", Some("yes"), Some("dashed"));

        let text = dot.finish();
        assert!(text.starts_with("digraph \"cfg\" {\n"));
        assert!(text.contains("\"n0\" [label=\"start\", shape=ellipse];"));
        assert!(text.contains("\"n1\" [label=\"x = \\\"a\\\"\"];"));
        assert!(text.contains("\"n0\" -> \"n1\";"));
        assert!(text.contains("\"n1\" -> \"n0\" [label=\"yes\", style=dashed];"));
        assert!(text.ends_with("}\n"));
    }
}
