use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

const MAX_NESTING_DEPTH: u32 = 256;

pub(crate) struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "flatten the expression; binding fragments should be short",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn parse_program(mut self) -> Result<Program, Vec<Diagnostic>> {
        let mut stmts = Vec::new();
        while !self.at(&Lexeme::Eof) {
            if self.eat(&Lexeme::Semicolon) {
                continue;
            }
            if self.at(&Lexeme::Return) {
                self.error_with_help(
                    "'return' outside of a function body",
                    "a binding fragment is an expression; 'return' is only valid inside a function body",
                );
                self.advance();
                continue;
            }
            stmts.push(self.parse_expr_stmt());
            if !self.eat(&Lexeme::Semicolon) && !self.at(&Lexeme::Eof) {
                self.error_at_current(&format!(
                    "expected ';' or end of input, found {}",
                    self.peek().description()
                ));
                self.advance(); // skip to recover
            }
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(Program { stmts })
    }

    fn parse_expr_stmt(&mut self) -> Spanned<Stmt> {
        let expr = self.parse_expr();
        if self.at(&Lexeme::Assign) {
            self.error_with_help(
                "assignment is not supported in binding expressions",
                "binding fragments are read as values; compute the value instead of assigning it",
            );
            self.advance();
            let _ = self.parse_expr(); // consume the right-hand side to recover
        }
        let span = expr.span;
        Spanned::new(Stmt::Expr(expr), span)
    }

    // --- Blocks (function bodies) ---

    fn parse_block(&mut self) -> Spanned<Block> {
        let start = self.current_span();
        self.expect(&Lexeme::LBrace);

        let mut stmts = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            if self.eat(&Lexeme::Semicolon) {
                continue;
            }
            if self.at(&Lexeme::Return) {
                let rstart = self.current_span();
                self.advance();
                let arg = if self.at(&Lexeme::Semicolon)
                    || self.at(&Lexeme::RBrace)
                    || self.at(&Lexeme::Eof)
                {
                    None
                } else {
                    Some(self.parse_expr())
                };
                let span = rstart.merge(self.prev_span());
                stmts.push(Spanned::new(Stmt::Return(arg), span));
            } else {
                stmts.push(self.parse_expr_stmt());
            }
            if !self.eat(&Lexeme::Semicolon)
                && !self.at(&Lexeme::RBrace)
                && !self.at(&Lexeme::Eof)
            {
                self.error_at_current(&format!(
                    "expected ';' or '}}', found {}",
                    self.peek().description()
                ));
                self.advance();
            }
        }

        self.expect(&Lexeme::RBrace);
        let span = start.merge(self.prev_span());
        Spanned::new(Block { stmts }, span)
    }

    // --- Expression parsing (Pratt / precedence climbing) ---

    fn parse_expr(&mut self) -> Spanned<Expr> {
        if !self.enter_nesting() {
            // Skip to the end to abort parsing entirely — the nesting
            // depth error has already been recorded.
            while !self.at(&Lexeme::Eof) {
                self.advance();
            }
            return Spanned::new(Expr::Literal(Literal::Null), self.current_span());
        }

        let expr = if let Some(arrow) = self.try_parse_arrow() {
            arrow
        } else {
            self.parse_conditional()
        };

        self.exit_nesting();
        expr
    }

    /// Parse an arrow function if one starts here: `x => ...`, `() => ...`,
    /// or `(a, b) => ...`. Returns None without consuming anything otherwise.
    fn try_parse_arrow(&mut self) -> Option<Spanned<Expr>> {
        let start = self.current_span();

        if matches!(self.peek(), Lexeme::Ident(_))
            && matches!(self.peek_ahead(1), Some(Lexeme::FatArrow))
        {
            let param = self.expect_ident();
            self.expect(&Lexeme::FatArrow);
            let body = self.parse_arrow_body();
            let span = start.merge(self.prev_span());
            return Some(Spanned::new(
                Expr::Arrow {
                    params: vec![param],
                    body,
                },
                span,
            ));
        }

        if self.at(&Lexeme::LParen) && self.is_arrow_params_ahead() {
            self.advance(); // consume (
            let params = self.parse_params();
            self.expect(&Lexeme::RParen);
            self.expect(&Lexeme::FatArrow);
            let body = self.parse_arrow_body();
            let span = start.merge(self.prev_span());
            return Some(Spanned::new(Expr::Arrow { params, body }, span));
        }

        None
    }

    /// Check whether the `(` at the current position opens an arrow parameter
    /// list, i.e. its matching `)` is immediately followed by `=>`.
    fn is_arrow_params_ahead(&self) -> bool {
        let mut depth = 0u32;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match &self.tokens[i].node {
                Lexeme::LParen => depth += 1,
                Lexeme::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.node),
                            Some(Lexeme::FatArrow)
                        );
                    }
                }
                Lexeme::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_arrow_body(&mut self) -> ArrowBody {
        if self.at(&Lexeme::LBrace) {
            ArrowBody::Block(self.parse_block())
        } else {
            ArrowBody::Expr(Box::new(self.parse_expr()))
        }
    }

    fn parse_params(&mut self) -> Vec<Spanned<String>> {
        let mut params = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            if let Some(name) = self.try_ident() {
                params.push(name);
            } else {
                self.error_with_help(
                    &format!("expected parameter name, found {}", self.peek().description()),
                    "parameters must be simple identifiers; destructuring, defaults, and rest parameters are not supported",
                );
                self.advance();
            }
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        params
    }

    fn parse_conditional(&mut self) -> Spanned<Expr> {
        let cond = self.parse_expr_bp(0);
        if !self.eat(&Lexeme::Question) {
            return cond;
        }
        let then = self.parse_expr();
        self.expect(&Lexeme::Colon);
        let otherwise = self.parse_expr();
        let span = cond.span.merge(otherwise.span);
        Spanned::new(
            Expr::Conditional {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            span,
        )
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();

        loop {
            let op = match self.peek() {
                Lexeme::OrOr => BinOp::Or,
                Lexeme::AndAnd => BinOp::And,
                Lexeme::EqEq => BinOp::EqEq,
                Lexeme::EqEqEq => BinOp::EqEqEq,
                Lexeme::BangEq => BinOp::NotEq,
                Lexeme::BangEqEq => BinOp::NotEqEq,
                Lexeme::Lt => BinOp::Lt,
                Lexeme::Gt => BinOp::Gt,
                Lexeme::Le => BinOp::Le,
                Lexeme::Ge => BinOp::Ge,
                Lexeme::Plus => BinOp::Add,
                Lexeme::Minus => BinOp::Sub,
                Lexeme::Star => BinOp::Mul,
                Lexeme::Slash => BinOp::Div,
                Lexeme::Percent => BinOp::Rem,
                _ => break,
            };

            let (l_bp, r_bp) = op_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator
            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Lexeme::Bang => UnaryOp::Not,
            Lexeme::Minus => UnaryOp::Neg,
            Lexeme::Plus => UnaryOp::Pos,
            Lexeme::TypeOf => UnaryOp::TypeOf,
            _ => {
                let primary = self.parse_primary();
                return self.parse_postfix(primary);
            }
        };
        self.advance();
        let operand = self.parse_unary();
        let span = start.merge(operand.span);
        Spanned::new(
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Parse postfix operations: `.property`, `[index]`, and call chains.
    fn parse_postfix(&mut self, mut expr: Spanned<Expr>) -> Spanned<Expr> {
        loop {
            if self.eat(&Lexeme::Dot) {
                let property = self.expect_ident();
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Member {
                        object: Box::new(expr),
                        property,
                    },
                    span,
                );
            } else if self.at(&Lexeme::LBracket) {
                self.advance();
                let index = self.parse_expr();
                self.expect(&Lexeme::RBracket);
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.at(&Lexeme::LParen) {
                self.advance();
                let args = self.parse_call_args();
                self.expect(&Lexeme::RParen);
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }
        expr
    }

    fn parse_call_args(&mut self) -> Vec<Spanned<Expr>> {
        let mut args = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            args.push(self.parse_expr());
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        args
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        match self.peek().clone() {
            Lexeme::Number(n) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Number(n)), start)
            }
            Lexeme::Str(s) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Str(s)), start)
            }
            Lexeme::True => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Bool(true)), start)
            }
            Lexeme::False => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Bool(false)), start)
            }
            Lexeme::Null => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Null), start)
            }
            Lexeme::This => {
                self.advance();
                Spanned::new(Expr::This, start)
            }
            Lexeme::Ident(name) => {
                self.advance();
                Spanned::new(Expr::Ident(name), start)
            }
            Lexeme::LParen => {
                // Arrow parameter lists were claimed by try_parse_arrow, so
                // this is plain grouping. Parentheses are not kept as a node;
                // the emitter regenerates them from precedence.
                self.advance();
                let inner = self.parse_expr();
                self.expect(&Lexeme::RParen);
                inner
            }
            Lexeme::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.at(&Lexeme::RBracket) && !self.at(&Lexeme::Eof) {
                    elements.push(self.parse_expr());
                    if !self.eat(&Lexeme::Comma) {
                        break;
                    }
                }
                self.expect(&Lexeme::RBracket);
                let span = start.merge(self.prev_span());
                Spanned::new(Expr::Array(elements), span)
            }
            Lexeme::LBrace => self.parse_object(),
            Lexeme::Function => self.parse_function(),
            _ => {
                self.error_with_help(
                    &format!("expected expression, found {}", self.peek().description()),
                    "expressions include literals (42, 'text'), identifiers, this, arrays, objects, function literals, and calls",
                );
                self.advance();
                Spanned::new(Expr::Literal(Literal::Null), start)
            }
        }
    }

    /// Parse an object literal. A `{` in expression position is always an
    /// object here — fragments have no block statements, so there is no
    /// statement/expression ambiguity to resolve.
    fn parse_object(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        self.expect(&Lexeme::LBrace);

        let mut properties = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let key = self.parse_property_key();
            self.expect(&Lexeme::Colon);
            let value = self.parse_expr();
            properties.push(Property { key, value });
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }

        self.expect(&Lexeme::RBrace);
        let span = start.merge(self.prev_span());
        Spanned::new(Expr::Object(properties), span)
    }

    fn parse_property_key(&mut self) -> Spanned<PropertyKey> {
        let span = self.current_span();
        match self.peek().clone() {
            Lexeme::Ident(name) => {
                self.advance();
                Spanned::new(PropertyKey::Ident(name), span)
            }
            Lexeme::Str(s) => {
                self.advance();
                Spanned::new(PropertyKey::Str(s), span)
            }
            Lexeme::Number(n) => {
                self.advance();
                Spanned::new(PropertyKey::Number(n), span)
            }
            _ => {
                self.error_with_help(
                    &format!("expected property key, found {}", self.peek().description()),
                    "object keys are identifiers, string literals, or numbers",
                );
                self.advance();
                Spanned::new(PropertyKey::Ident("_error_".to_string()), span)
            }
        }
    }

    fn parse_function(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        self.expect(&Lexeme::Function);
        let name = self.try_ident();
        self.expect(&Lexeme::LParen);
        let params = self.parse_params();
        self.expect(&Lexeme::RParen);
        let body = self.parse_block();
        let span = start.merge(self.prev_span());
        Spanned::new(Expr::Function { name, params, body }, span)
    }

    // --- Utility methods ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn peek_ahead(&self, offset: usize) -> Option<&Lexeme> {
        self.tokens.get(self.pos + offset).map(|t| &t.node)
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    fn try_ident(&mut self) -> Option<Spanned<String>> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Some(Spanned::new(name, span))
        } else {
            None
        }
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}

/// Returns (left binding power, right binding power) for a binary operator.
/// Higher binding power = higher precedence; all operators are
/// left-associative.
fn op_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::EqEq | BinOp::EqEqEq | BinOp::NotEq | BinOp::NotEqEq => (5, 6),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => (7, 8),
        BinOp::Add | BinOp::Sub => (9, 10),
        BinOp::Mul | BinOp::Div | BinOp::Rem => (11, 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Program {
        let (tokens, lex_diags) = Lexer::new(source).tokenize();
        assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
        Parser::new(tokens).parse_program().unwrap()
    }

    fn parse_err(source: &str) -> Vec<Diagnostic> {
        let (tokens, lex_diags) = Lexer::new(source).tokenize();
        assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
        Parser::new(tokens)
            .parse_program()
            .expect_err("expected parse failure")
    }

    fn single_expr(program: &Program) -> &Expr {
        assert_eq!(program.stmts.len(), 1, "expected one statement");
        match &program.stmts[0].node {
            Stmt::Expr(e) => &e.node,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_member_chain() {
        let program = parse("items().length");
        let Expr::Member { object, property } = single_expr(&program) else {
            panic!("expected member access");
        };
        assert_eq!(property.node, "length");
        assert!(matches!(object.node, Expr::Call { .. }));
    }

    #[test]
    fn test_index_access() {
        let program = parse("rows[i + 1]");
        let Expr::Index { object, index } = single_expr(&program) else {
            panic!("expected index access");
        };
        assert!(matches!(object.node, Expr::Ident(ref n) if n == "rows"));
        assert!(matches!(index.node, Expr::Binary { .. }));
    }

    #[test]
    fn test_call_args() {
        let program = parse("format(name, 'short', 2)");
        let Expr::Call { args, .. } = single_expr(&program) else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_binary_precedence() {
        // a + b * c parses as a + (b * c)
        let program = parse("a + b * c");
        let Expr::Binary { op, rhs, .. } = single_expr(&program) else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(
            rhs.node,
            Expr::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let program = parse("(a + b) * c");
        let Expr::Binary { op, lhs, .. } = single_expr(&program) else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinOp::Mul);
        assert!(matches!(
            lhs.node,
            Expr::Binary { op: BinOp::Add, .. }
        ));
    }

    #[test]
    fn test_conditional() {
        let program = parse("ready ? done() : pending");
        assert!(matches!(
            single_expr(&program),
            Expr::Conditional { .. }
        ));
    }

    #[test]
    fn test_unary_chain() {
        let program = parse("!!visible");
        let Expr::Unary { op, operand } = single_expr(&program) else {
            panic!("expected unary expression");
        };
        assert_eq!(*op, UnaryOp::Not);
        assert!(matches!(
            operand.node,
            Expr::Unary { op: UnaryOp::Not, .. }
        ));
    }

    #[test]
    fn test_object_literal() {
        let program = parse("{ text: name, 'css-class': style, 2: two }");
        let Expr::Object(props) = single_expr(&program) else {
            panic!("expected object literal");
        };
        assert_eq!(props.len(), 3);
        assert_eq!(props[0].key.node, PropertyKey::Ident("text".into()));
        assert_eq!(props[1].key.node, PropertyKey::Str("css-class".into()));
        assert_eq!(props[2].key.node, PropertyKey::Number(2.0));
    }

    #[test]
    fn test_array_literal() {
        let program = parse("[1, 'two', three()]");
        let Expr::Array(elements) = single_expr(&program) else {
            panic!("expected array literal");
        };
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_arrow_single_param() {
        let program = parse("x => x + 1");
        let Expr::Arrow { params, body } = single_expr(&program) else {
            panic!("expected arrow function");
        };
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].node, "x");
        assert!(matches!(body, ArrowBody::Expr(_)));
    }

    #[test]
    fn test_arrow_empty_params() {
        let program = parse("() => items.length");
        let Expr::Arrow { params, .. } = single_expr(&program) else {
            panic!("expected arrow function");
        };
        assert!(params.is_empty());
    }

    #[test]
    fn test_arrow_multi_params() {
        let program = parse("(a, b) => a + b");
        let Expr::Arrow { params, .. } = single_expr(&program) else {
            panic!("expected arrow function");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].node, "a");
        assert_eq!(params[1].node, "b");
    }

    #[test]
    fn test_arrow_block_body() {
        let program = parse("x => { log(x); return x * 2; }");
        let Expr::Arrow { body, .. } = single_expr(&program) else {
            panic!("expected arrow function");
        };
        let ArrowBody::Block(block) = body else {
            panic!("expected block body");
        };
        assert_eq!(block.node.stmts.len(), 2);
        assert!(matches!(block.node.stmts[1].node, Stmt::Return(Some(_))));
    }

    #[test]
    fn test_nested_arrows() {
        let program = parse("x => y => x + y");
        let Expr::Arrow { body, .. } = single_expr(&program) else {
            panic!("expected arrow function");
        };
        let ArrowBody::Expr(inner) = body else {
            panic!("expected expression body");
        };
        assert!(matches!(inner.node, Expr::Arrow { .. }));
    }

    #[test]
    fn test_parenthesized_call_is_not_arrow() {
        // `(x)` here is grouping, not a parameter list
        let program = parse("(items)().length");
        assert!(matches!(single_expr(&program), Expr::Member { .. }));
    }

    #[test]
    fn test_function_expression() {
        let program = parse("function (a) { return a; }");
        let Expr::Function { name, params, body } = single_expr(&program) else {
            panic!("expected function expression");
        };
        assert!(name.is_none());
        assert_eq!(params.len(), 1);
        assert_eq!(body.node.stmts.len(), 1);
    }

    #[test]
    fn test_named_function_expression() {
        let program = parse("function pick(a, b) { return a; }");
        let Expr::Function { name, .. } = single_expr(&program) else {
            panic!("expected function expression");
        };
        assert_eq!(name.as_ref().unwrap().node, "pick");
    }

    #[test]
    fn test_statement_sequence() {
        let program = parse("first(); second()");
        assert_eq!(program.stmts.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let program = parse("");
        assert!(program.stmts.is_empty());
    }

    // --- Error path tests ---

    #[test]
    fn test_error_missing_arrow_body() {
        let diags = parse_err("x =>");
        assert!(
            diags[0].message.contains("expected expression"),
            "got: {}",
            diags[0].message
        );
    }

    #[test]
    fn test_error_top_level_return() {
        let diags = parse_err("return x");
        assert!(
            diags[0].message.contains("outside of a function body"),
            "got: {}",
            diags[0].message
        );
    }

    #[test]
    fn test_error_assignment() {
        let diags = parse_err("x = 1");
        assert!(
            diags[0].message.contains("assignment is not supported"),
            "got: {}",
            diags[0].message
        );
        assert!(diags[0].help.is_some());
    }

    #[test]
    fn test_error_unclosed_paren() {
        let diags = parse_err("f(a");
        assert!(
            diags.iter().any(|d| d.message.contains("expected ')'")),
            "got: {:?}",
            diags.iter().map(|d| &d.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_error_destructured_param() {
        let diags = parse_err("([a, b]) => a");
        assert!(
            diags[0].message.contains("expected parameter name"),
            "got: {}",
            diags[0].message
        );
    }

    #[test]
    fn test_error_nesting_depth() {
        let source = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        let diags = parse_err(&source);
        assert!(
            diags[0].message.contains("nesting depth exceeded"),
            "got: {}",
            diags[0].message
        );
    }
}
