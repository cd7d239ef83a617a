use serde::Serialize;

use crate::span::Spanned;

/// A parsed binding fragment: one expression, or a short statement sequence.
#[derive(Clone, Debug, Serialize)]
pub struct Program {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// Statements. `Return` is only valid inside function bodies; the parser
/// rejects it at the top level of a fragment.
#[derive(Clone, Debug, Serialize)]
pub enum Stmt {
    Expr(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
}

/// A function body.
#[derive(Clone, Debug, Serialize)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// Expressions.
#[derive(Clone, Debug, Serialize)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    This,
    Array(Vec<Spanned<Expr>>),
    Object(Vec<Property>),
    /// Dot access: `object.property`
    Member {
        object: Box<Spanned<Expr>>,
        property: Spanned<String>,
    },
    /// Bracket access: `object[index]`
    Index {
        object: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Conditional {
        cond: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        otherwise: Box<Spanned<Expr>>,
    },
    /// A pre-arrow function literal: `function (a, b) { ... }`
    Function {
        name: Option<Spanned<String>>,
        params: Vec<Spanned<String>>,
        body: Spanned<Block>,
    },
    /// The shorthand function form eliminated by the rewriter.
    Arrow {
        params: Vec<Spanned<String>>,
        body: ArrowBody,
    },
}

#[derive(Clone, Debug, Serialize)]
pub enum ArrowBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub key: Spanned<PropertyKey>,
    pub value: Spanned<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PropertyKey {
    Ident(String),
    Str(String),
    Number(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,    // !
    Neg,    // -
    Pos,    // +
    TypeOf, // typeof
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::TypeOf => "typeof",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Or,       // ||
    And,      // &&
    EqEq,     // ==
    EqEqEq,   // ===
    NotEq,    // !=
    NotEqEq,  // !==
    Lt,       // <
    Gt,       // >
    Le,       // <=
    Ge,       // >=
    Add,      // +
    Sub,      // -
    Mul,      // *
    Div,      // /
    Rem,      // %
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::EqEq => "==",
            BinOp::EqEqEq => "===",
            BinOp::NotEq => "!=",
            BinOp::NotEqEq => "!==",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        }
    }
}

// ─── Structural equality ───────────────────────────────────────────

// Shape comparisons ignore spans: a relocated subtree keeps its original
// offsets, and a re-parsed tree gets fresh ones.

impl Program {
    pub fn same_shape(&self, other: &Program) -> bool {
        same_stmt_list(&self.stmts, &other.stmts)
    }
}

impl Block {
    pub fn same_shape(&self, other: &Block) -> bool {
        same_stmt_list(&self.stmts, &other.stmts)
    }
}

impl Stmt {
    pub fn same_shape(&self, other: &Stmt) -> bool {
        match (self, other) {
            (Stmt::Expr(a), Stmt::Expr(b)) => a.node.same_shape(&b.node),
            (Stmt::Return(None), Stmt::Return(None)) => true,
            (Stmt::Return(Some(a)), Stmt::Return(Some(b))) => a.node.same_shape(&b.node),
            _ => false,
        }
    }
}

impl Expr {
    pub fn same_shape(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Literal(a), Expr::Literal(b)) => a == b,
            (Expr::Ident(a), Expr::Ident(b)) => a == b,
            (Expr::This, Expr::This) => true,
            (Expr::Array(a), Expr::Array(b)) => same_expr_list(a, b),
            (Expr::Object(a), Expr::Object(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        x.key.node == y.key.node && x.value.node.same_shape(&y.value.node)
                    })
            }
            (
                Expr::Member { object: ao, property: ap },
                Expr::Member { object: bo, property: bp },
            ) => ap.node == bp.node && ao.node.same_shape(&bo.node),
            (
                Expr::Index { object: ao, index: ai },
                Expr::Index { object: bo, index: bi },
            ) => ao.node.same_shape(&bo.node) && ai.node.same_shape(&bi.node),
            (
                Expr::Call { callee: ac, args: aa },
                Expr::Call { callee: bc, args: ba },
            ) => ac.node.same_shape(&bc.node) && same_expr_list(aa, ba),
            (
                Expr::Unary { op: aop, operand: a },
                Expr::Unary { op: bop, operand: b },
            ) => aop == bop && a.node.same_shape(&b.node),
            (
                Expr::Binary { op: aop, lhs: al, rhs: ar },
                Expr::Binary { op: bop, lhs: bl, rhs: br },
            ) => aop == bop && al.node.same_shape(&bl.node) && ar.node.same_shape(&br.node),
            (
                Expr::Conditional { cond: ac, then: at, otherwise: ae },
                Expr::Conditional { cond: bc, then: bt, otherwise: be },
            ) => {
                ac.node.same_shape(&bc.node)
                    && at.node.same_shape(&bt.node)
                    && ae.node.same_shape(&be.node)
            }
            (
                Expr::Function { name: an, params: ap, body: ab },
                Expr::Function { name: bn, params: bp, body: bb },
            ) => {
                an.as_ref().map(|n| &n.node) == bn.as_ref().map(|n| &n.node)
                    && same_param_list(ap, bp)
                    && ab.node.same_shape(&bb.node)
            }
            (
                Expr::Arrow { params: ap, body: ab },
                Expr::Arrow { params: bp, body: bb },
            ) => {
                same_param_list(ap, bp)
                    && match (ab, bb) {
                        (ArrowBody::Expr(a), ArrowBody::Expr(b)) => a.node.same_shape(&b.node),
                        (ArrowBody::Block(a), ArrowBody::Block(b)) => a.node.same_shape(&b.node),
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

fn same_stmt_list(a: &[Spanned<Stmt>], b: &[Spanned<Stmt>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.node.same_shape(&y.node))
}

fn same_expr_list(a: &[Spanned<Expr>], b: &[Spanned<Expr>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.node.same_shape(&y.node))
}

fn same_param_list(a: &[Spanned<String>], b: &[Spanned<String>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.node == y.node)
}
