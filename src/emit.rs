use crate::ast::*;

// Precedence tiers used to decide parenthesization, mirroring the host
// language's expression grammar.
const PREC_ARROW: u8 = 2;
const PREC_CONDITIONAL: u8 = 4;
const PREC_UNARY: u8 = 15;
const PREC_CALL: u8 = 17;
const PREC_MEMBER: u8 = 18;
const PREC_PRIMARY: u8 = 20;

/// Generate source text for a parsed binding fragment.
///
/// The output is a single line: statements joined with `'; '`, no trailing
/// semicolon, so a plain expression round-trips to itself.
pub fn emit_program(program: &Program) -> String {
    let stmts: Vec<String> = program
        .stmts
        .iter()
        .map(|s| emit_stmt(&s.node))
        .collect();
    stmts.join("; ")
}

fn emit_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expr(e) => emit_expr(&e.node),
        Stmt::Return(Some(e)) => format!("return {}", emit_expr(&e.node)),
        Stmt::Return(None) => "return".to_string(),
    }
}

fn emit_block(block: &Block) -> String {
    if block.stmts.is_empty() {
        return "{ }".to_string();
    }
    let stmts: Vec<String> = block
        .stmts
        .iter()
        .map(|s| format!("{};", emit_stmt(&s.node)))
        .collect();
    format!("{{ {} }}", stmts.join(" "))
}

/// Format a single expression to source text.
pub fn emit_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lit) => emit_literal(lit),
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::Array(elements) => {
            let inner: Vec<String> = elements.iter().map(|e| emit_expr(&e.node)).collect();
            format!("[{}]", inner.join(", "))
        }
        Expr::Object(properties) => {
            if properties.is_empty() {
                return "{}".to_string();
            }
            let inner: Vec<String> = properties
                .iter()
                .map(|p| format!("{}: {}", emit_property_key(&p.key.node), emit_expr(&p.value.node)))
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
        Expr::Member { object, property } => {
            format!(
                "{}.{}",
                emit_operand(&object.node, PREC_CALL),
                property.node
            )
        }
        Expr::Index { object, index } => {
            format!(
                "{}[{}]",
                emit_operand(&object.node, PREC_CALL),
                emit_expr(&index.node)
            )
        }
        Expr::Call { callee, args } => {
            let args_str: Vec<String> = args.iter().map(|a| emit_expr(&a.node)).collect();
            format!(
                "{}({})",
                emit_operand(&callee.node, PREC_CALL),
                args_str.join(", ")
            )
        }
        Expr::Unary { op, operand } => {
            let mut inner = emit_operand(&operand.node, PREC_UNARY);
            if sign_clash(*op, &operand.node) {
                inner = format!("({})", inner);
            }
            match op {
                UnaryOp::TypeOf => format!("typeof {}", inner),
                _ => format!("{}{}", op.as_str(), inner),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let prec = bin_precedence(*op);
            format!(
                "{} {} {}",
                emit_operand(&lhs.node, prec),
                op.as_str(),
                emit_operand(&rhs.node, prec + 1)
            )
        }
        Expr::Conditional {
            cond,
            then,
            otherwise,
        } => {
            format!(
                "{} ? {} : {}",
                emit_operand(&cond.node, PREC_CONDITIONAL + 1),
                emit_expr(&then.node),
                emit_expr(&otherwise.node)
            )
        }
        Expr::Function { name, params, body } => {
            let params_str: Vec<String> = params.iter().map(|p| p.node.clone()).collect();
            match name {
                Some(n) => format!(
                    "function {}({}) {}",
                    n.node,
                    params_str.join(", "),
                    emit_block(&body.node)
                ),
                None => format!(
                    "function ({}) {}",
                    params_str.join(", "),
                    emit_block(&body.node)
                ),
            }
        }
        Expr::Arrow { params, body } => {
            let head = match params.as_slice() {
                [single] => single.node.clone(),
                _ => {
                    let inner: Vec<String> = params.iter().map(|p| p.node.clone()).collect();
                    format!("({})", inner.join(", "))
                }
            };
            let body_str = match body {
                // An object-literal body must be parenthesized to keep it an
                // expression when re-parsed.
                ArrowBody::Expr(e) if matches!(e.node, Expr::Object(_)) => {
                    format!("({})", emit_expr(&e.node))
                }
                ArrowBody::Expr(e) => emit_expr(&e.node),
                ArrowBody::Block(b) => emit_block(&b.node),
            };
            format!("{} => {}", head, body_str)
        }
    }
}

/// Format an operand, parenthesizing when its precedence is too low for the
/// position it appears in. Function expressions are parenthesized in callee
/// and member-object positions, where a leading `function` keyword would
/// otherwise change the parse.
fn emit_operand(expr: &Expr, min_prec: u8) -> String {
    let needs_parens = precedence(expr) < min_prec
        || (min_prec >= PREC_CALL && matches!(expr, Expr::Function { .. }));
    if needs_parens {
        format!("({})", emit_expr(expr))
    } else {
        emit_expr(expr)
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Arrow { .. } => PREC_ARROW,
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::Binary { op, .. } => bin_precedence(*op),
        Expr::Unary { .. } => PREC_UNARY,
        Expr::Call { .. } => PREC_CALL,
        Expr::Member { .. } | Expr::Index { .. } => PREC_MEMBER,
        _ => PREC_PRIMARY,
    }
}

fn bin_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Or => 5,
        BinOp::And => 6,
        BinOp::EqEq | BinOp::EqEqEq | BinOp::NotEq | BinOp::NotEqEq => 9,
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 10,
        BinOp::Add | BinOp::Sub => 12,
        BinOp::Mul | BinOp::Div | BinOp::Rem => 13,
    }
}

/// `- -x` and `+ +x` must not fuse into `--x` / `++x`.
fn sign_clash(op: UnaryOp, operand: &Expr) -> bool {
    match (op, operand) {
        (UnaryOp::Neg | UnaryOp::Pos, Expr::Unary { op: inner, .. }) => {
            matches!(inner, UnaryOp::Neg | UnaryOp::Pos)
        }
        _ => false,
    }
}

fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Number(n) => emit_number(*n),
        Literal::Str(s) => quote_string(s),
        Literal::Bool(b) => b.to_string(),
        Literal::Null => "null".to_string(),
    }
}

fn emit_property_key(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Ident(name) => name.clone(),
        PropertyKey::Str(s) => quote_string(s),
        PropertyKey::Number(n) => emit_number(*n),
    }
}

fn emit_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn roundtrip(source: &str) -> String {
        let (tokens, lex_diags) = Lexer::new(source).tokenize();
        assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
        let program = Parser::new(tokens).parse_program().unwrap();
        emit_program(&program)
    }

    #[test]
    fn test_plain_expression_unchanged() {
        assert_eq!(roundtrip("items().length"), "items().length");
    }

    #[test]
    fn test_operator_spacing() {
        assert_eq!(roundtrip("a+b*c"), "a + b * c");
    }

    #[test]
    fn test_precedence_parens_kept() {
        assert_eq!(roundtrip("(a + b) * c"), "(a + b) * c");
    }

    #[test]
    fn test_redundant_parens_dropped() {
        assert_eq!(roundtrip("(a) + (b)"), "a + b");
    }

    #[test]
    fn test_right_associative_parens() {
        assert_eq!(roundtrip("a - (b - c)"), "a - (b - c)");
    }

    #[test]
    fn test_conditional() {
        assert_eq!(roundtrip("ready?a:b"), "ready ? a : b");
    }

    #[test]
    fn test_unary() {
        assert_eq!(roundtrip("!done"), "!done");
        assert_eq!(roundtrip("typeof x"), "typeof x");
        assert_eq!(roundtrip("!(a && b)"), "!(a && b)");
        assert_eq!(roundtrip("- -x"), "-(-x)");
    }

    #[test]
    fn test_array_and_object() {
        assert_eq!(roundtrip("[1, 2, 3]"), "[1, 2, 3]");
        assert_eq!(roundtrip("{a:1,'b':2}"), "{ a: 1, 'b': 2 }");
        assert_eq!(roundtrip("{}"), "{}");
    }

    #[test]
    fn test_strings_requoted() {
        assert_eq!(roundtrip("\"text\""), "'text'");
        assert_eq!(roundtrip("'it\\'s'"), "'it\\'s'");
        assert_eq!(roundtrip("'a\\nb'"), "'a\\nb'");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(roundtrip("42"), "42");
        assert_eq!(roundtrip("3.25"), "3.25");
        assert_eq!(roundtrip(".5"), "0.5");
    }

    #[test]
    fn test_function_expression() {
        insta::assert_snapshot!(
            roundtrip("function (a, b) { return a + b; }"),
            @"function (a, b) { return a + b; }"
        );
    }

    #[test]
    fn test_function_as_callee_parenthesized() {
        insta::assert_snapshot!(
            roundtrip("(function () { return 1; })()"),
            @"(function () { return 1; })()"
        );
    }

    #[test]
    fn test_arrow_forms() {
        assert_eq!(roundtrip("x => x + 1"), "x => x + 1");
        assert_eq!(roundtrip("() => 0"), "() => 0");
        assert_eq!(roundtrip("(a, b) => a"), "(a, b) => a");
    }

    #[test]
    fn test_statement_sequence() {
        assert_eq!(roundtrip("first(); second();"), "first(); second()");
    }

    #[test]
    fn test_member_of_conditional_parenthesized() {
        assert_eq!(roundtrip("(a ? b : c).name"), "(a ? b : c).name");
    }
}
