pub mod ast;
pub mod cache;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod hook;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod rewrite;
pub mod span;

pub use cache::RewriteCache;
pub use error::Error;
pub use hook::{BindingHandler, HandlerRegistry, Preprocessor};
pub use rewrite::{rewrite, RewriteOptions};

use lexer::Lexer;
use parser::Parser;

/// Parse a binding fragment into an expression tree.
pub fn parse_source(source: &str) -> Result<ast::Program, Error> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(Error::parse(source, lex_errors));
    }
    Parser::new(tokens)
        .parse_program()
        .map_err(|diagnostics| Error::parse(source, diagnostics))
}

/// Rewrite a binding fragment with the default options (`ko.unwrap`).
pub fn rewrite_source(source: &str) -> Result<String, Error> {
    rewrite_source_with(source, &RewriteOptions::default())
}

/// Rewrite a binding fragment: parse, eliminate every arrow function, and
/// regenerate source text.
pub fn rewrite_source_with(source: &str, options: &RewriteOptions) -> Result<String, Error> {
    let program = parse_source(source)?;
    let program = rewrite::rewrite(program, options)?;
    Ok(emit::emit_program(&program))
}
