//! Arrow-function elimination.
//!
//! The rewriter walks an expression tree depth-first and replaces every
//! arrow node with a call expression that invokes a bound, wrapped closure:
//!
//! ```text
//! x => x + 1
//! ```
//!
//! becomes
//!
//! ```text
//! (function (x) { return ko.unwrap(x + 1); }).bind(this)()
//! ```
//!
//! The arrow's parameter list and body are relocated (moved, not copied)
//! into the replacement. Expression bodies are wrapped in a `return` of the
//! host unwrap call; block bodies are carried over verbatim, since they
//! supply their own returns. After replacing a node the traversal descends
//! into the replacement, so arrows nested inside relocated bodies are
//! eliminated at any depth.

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::error::Error;
use crate::span::{Span, Spanned};

/// Guards programmatically constructed trees that never went through the
/// parser (the parser enforces its own, tighter nesting cap).
const MAX_REWRITE_DEPTH: u32 = 512;

/// Options controlling the rewrite: the dotted path of the host function
/// that unwraps a possibly-reactive value.
#[derive(Clone, Debug)]
pub struct RewriteOptions {
    unwrap: Vec<String>,
}

impl RewriteOptions {
    /// Build options with a custom unwrap path, e.g. `"ko.unwrap"` or
    /// `"viewBridge.utils.peek"`. Every segment must be a plain identifier.
    pub fn new(unwrap_path: &str) -> Result<Self, Error> {
        let mut segments = Vec::new();
        let mut offset = 0u32;
        for segment in unwrap_path.split('.') {
            if !is_identifier(segment) {
                let span = Span::new(offset, offset + segment.len() as u32);
                let diag = Diagnostic::error(
                    format!("'{}' is not a valid identifier in an unwrap path", segment),
                    span,
                )
                .with_help("unwrap paths look like 'ko.unwrap' or 'unwrap'".to_string());
                return Err(Error::parse(unwrap_path, vec![diag]));
            }
            segments.push(segment.to_string());
            offset += segment.len() as u32 + 1;
        }
        Ok(Self { unwrap: segments })
    }

    /// The configured unwrap path, dotted.
    pub fn unwrap_path(&self) -> String {
        self.unwrap.join(".")
    }

    /// Build the callee expression for the unwrap call.
    fn unwrap_callee(&self, span: Span) -> Spanned<Expr> {
        let mut expr = Spanned::new(Expr::Ident(self.unwrap[0].clone()), span);
        for segment in &self.unwrap[1..] {
            expr = Spanned::new(
                Expr::Member {
                    object: Box::new(expr),
                    property: Spanned::new(segment.clone(), span),
                },
                span,
            );
        }
        expr
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            unwrap: vec!["ko".to_string(), "unwrap".to_string()],
        }
    }
}

/// Replace every arrow node in the tree; non-arrow nodes are left
/// structurally untouched aside from containing rewritten descendants.
pub fn rewrite(mut program: Program, options: &RewriteOptions) -> Result<Program, Error> {
    for stmt in &mut program.stmts {
        rewrite_stmt(&mut stmt.node, options, 0)?;
    }
    Ok(program)
}

fn rewrite_stmt(stmt: &mut Stmt, options: &RewriteOptions, depth: u32) -> Result<(), Error> {
    match stmt {
        Stmt::Expr(e) => rewrite_expr(e, options, depth),
        Stmt::Return(Some(e)) => rewrite_expr(e, options, depth),
        Stmt::Return(None) => Ok(()),
    }
}

fn rewrite_block(block: &mut Block, options: &RewriteOptions, depth: u32) -> Result<(), Error> {
    for stmt in &mut block.stmts {
        rewrite_stmt(&mut stmt.node, options, depth)?;
    }
    Ok(())
}

fn rewrite_expr(
    expr: &mut Spanned<Expr>,
    options: &RewriteOptions,
    depth: u32,
) -> Result<(), Error> {
    if depth > MAX_REWRITE_DEPTH {
        return Err(Error::MalformedTree(format!(
            "expression tree exceeds the maximum depth of {}",
            MAX_REWRITE_DEPTH
        )));
    }

    match &mut expr.node {
        Expr::Arrow { params, body } => {
            let span = expr.span;
            let params = std::mem::take(params);
            let body = std::mem::replace(
                body,
                ArrowBody::Expr(Box::new(Spanned::new(Expr::This, span))),
            );
            expr.node = build_replacement(params, body, span, options);
            // Revisit the replacement: the relocated body may itself
            // contain arrows.
            rewrite_expr(expr, options, depth + 1)
        }
        Expr::Literal(_) | Expr::Ident(_) | Expr::This => Ok(()),
        Expr::Array(elements) => {
            for element in elements {
                rewrite_expr(element, options, depth + 1)?;
            }
            Ok(())
        }
        Expr::Object(properties) => {
            for property in properties {
                rewrite_expr(&mut property.value, options, depth + 1)?;
            }
            Ok(())
        }
        Expr::Member { object, .. } => rewrite_expr(object, options, depth + 1),
        Expr::Index { object, index } => {
            rewrite_expr(object, options, depth + 1)?;
            rewrite_expr(index, options, depth + 1)
        }
        Expr::Call { callee, args } => {
            rewrite_expr(callee, options, depth + 1)?;
            for arg in args {
                rewrite_expr(arg, options, depth + 1)?;
            }
            Ok(())
        }
        Expr::Unary { operand, .. } => rewrite_expr(operand, options, depth + 1),
        Expr::Binary { lhs, rhs, .. } => {
            rewrite_expr(lhs, options, depth + 1)?;
            rewrite_expr(rhs, options, depth + 1)
        }
        Expr::Conditional {
            cond,
            then,
            otherwise,
        } => {
            rewrite_expr(cond, options, depth + 1)?;
            rewrite_expr(then, options, depth + 1)?;
            rewrite_expr(otherwise, options, depth + 1)
        }
        Expr::Function { body, .. } => rewrite_block(&mut body.node, options, depth + 1),
    }
}

/// Construct the replacement for an arrow node:
/// a function expression taking the arrow's parameters, a `.bind` member
/// access on it, a call of that member with `this` as sole argument, and an
/// outer call invoking the bound closure.
fn build_replacement(
    params: Vec<Spanned<String>>,
    body: ArrowBody,
    span: Span,
    options: &RewriteOptions,
) -> Expr {
    let fn_body = match body {
        ArrowBody::Expr(value) => {
            let value_span = value.span;
            let unwrap_call = Spanned::new(
                Expr::Call {
                    callee: Box::new(options.unwrap_callee(span)),
                    args: vec![*value],
                },
                value_span,
            );
            let ret = Spanned::new(Stmt::Return(Some(unwrap_call)), value_span);
            Spanned::new(Block { stmts: vec![ret] }, value_span)
        }
        ArrowBody::Block(block) => block,
    };

    let function = Spanned::new(
        Expr::Function {
            name: None,
            params,
            body: fn_body,
        },
        span,
    );
    let bind = Spanned::new(
        Expr::Member {
            object: Box::new(function),
            property: Spanned::new("bind".to_string(), span),
        },
        span,
    );
    let bound = Spanned::new(
        Expr::Call {
            callee: Box::new(bind),
            args: vec![Spanned::new(Expr::This, span)],
        },
        span,
    );
    Expr::Call {
        callee: Box::new(bound),
        args: Vec::new(),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
