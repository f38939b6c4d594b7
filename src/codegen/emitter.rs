//! Source text rendering of a [`Program`].
//!
//! Output is indentation-delimited: `=` assignment, `while`/`if`/`else`
//! blocks ending in `:`, `print(...)`, `True`/`False`/`None` and the word
//! operators `and`/`or`/`not`. Every binary and unary expression is wrapped in
//! parentheses so the target's own precedence never matters.
//!
//! ```text
//! # Node: c
//! while (x < 10):
//!   # Node: inc
//!   x = (x + 1)
//! ```

use std::fmt::Write;

use crate::{
    codegen::{
        ast::{Expr, Program, Statement, StatementKind},
        CodegenConfig,
    },
    expression::{BinaryOp, UnaryOp, Value},
};

/// Renders programs as source text.
pub struct Emitter<'c> {
    config: &'c CodegenConfig,
    out: String,
}

impl<'c> Emitter<'c> {
    /// Creates an emitter using `config`.
    #[must_use]
    pub fn new(config: &'c CodegenConfig) -> Self {
        Emitter {
            config,
            out: String::new(),
        }
    }

    /// Renders `program`. An empty program renders as an empty string.
    #[must_use]
    pub fn emit(mut self, program: &Program) -> String {
        for statement in &program.body {
            self.statement(statement, 0);
        }
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        let width = depth * self.config.indent_width;
        let _ = writeln!(self.out, "{:width$}{}", "", text);
    }

    fn block(&mut self, body: &[Statement], depth: usize) {
        for statement in body {
            self.statement(statement, depth);
        }
        if !has_code(body) {
            self.line(depth, "pass");
        }
    }

    fn statement(&mut self, statement: &Statement, depth: usize) {
        if let StatementKind::Block(inner) = &statement.kind {
            for nested in inner {
                self.statement(nested, depth);
            }
            return;
        }

        if self.config.trace_comments {
            if let Some(origin) = &statement.origin {
                self.line(depth, &format!("# Node: {origin}"));
            }
        }

        match &statement.kind {
            StatementKind::Assignment { target, value } => {
                self.line(depth, &format!("{target} = {}", render_expr(value)));
            }
            StatementKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.marker(statement, condition, depth);
                self.line(depth, &format!("if {}:", render_expr(condition)));
                self.block(then_body, depth + 1);
                if !else_body.is_empty() {
                    self.line(depth, "else:");
                    self.block(else_body, depth + 1);
                }
            }
            StatementKind::While { condition, body } => {
                self.marker(statement, condition, depth);
                self.line(depth, &format!("while {}:", render_expr(condition)));
                self.block(body, depth + 1);
            }
            StatementKind::Print(Expr::Empty) => self.line(depth, "print()"),
            StatementKind::Print(value) => {
                self.line(depth, &format!("print({})", render_expr(value)));
            }
            StatementKind::Call(call) => self.line(depth, &render_expr(call)),
            StatementKind::Break => self.line(depth, "break"),
            StatementKind::Unsupported { reason } => {
                let origin = statement.origin.as_deref().unwrap_or("program");
                self.line(depth, &format!("# UNSUPPORTED [{origin}]: {reason}"));
            }
            StatementKind::Block(_) => {}
        }
    }

    /// Flags an unsupported condition on the line before its `if` or `while`.
    fn marker(&mut self, statement: &Statement, condition: &Expr, depth: usize) {
        if let Some(reason) = condition.unsupported_reason() {
            let origin = statement.origin.as_deref().unwrap_or("program");
            self.line(depth, &format!("# UNSUPPORTED [{origin}]: {reason}"));
        }
    }
}

fn has_code(body: &[Statement]) -> bool {
    body.iter().any(|statement| match &statement.kind {
        StatementKind::Unsupported { .. } => false,
        StatementKind::Block(inner) => has_code(inner),
        _ => true,
    })
}

/// Renders one expression.
#[must_use]
pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(name) => name.clone(),
        Expr::Literal(value) => render_literal(value),
        Expr::Binary { op, left, right } => {
            format!("({} {} {})", render_expr(left), binary_symbol(*op), render_expr(right))
        }
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => format!("(not {})", render_expr(operand)),
        Expr::Unary {
            op: UnaryOp::Negate,
            operand,
        } => format!("(-{})", render_expr(operand)),
        Expr::Call { name, args } => {
            let args: Vec<String> = args.iter().map(render_expr).collect();
            format!("{name}({})", args.join(", "))
        }
        Expr::Empty | Expr::Unsupported(_) => "None".to_string(),
    }
}

fn binary_symbol(op: BinaryOp) -> String {
    match op {
        BinaryOp::And => "and".to_string(),
        BinaryOp::Or => "or".to_string(),
        other => other.to_string(),
    }
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::Boolean(true) => "True".to_string(),
        Value::Boolean(false) => "False".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) if f.is_nan() => "float(\"nan\")".to_string(),
        Value::Float(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "float(\"inf\")".to_string()
            } else {
                "float(\"-inf\")".to_string()
            }
        }
        // Debug keeps the decimal point on integral floats
        Value::Float(f) => format!("{f:?}"),
        Value::String(s) => quote(s),
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
