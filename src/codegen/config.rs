/// Options for source emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Emit a `# Node: <id>` comment before every statement.
    pub trace_comments: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            indent_width: 2,
            trace_comments: true,
        }
    }
}

impl CodegenConfig {
    /// Sets the indent width.
    #[must_use]
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Enables or disables trace comments.
    #[must_use]
    pub fn with_trace_comments(mut self, trace_comments: bool) -> Self {
        self.trace_comments = trace_comments;
        self
    }
}
