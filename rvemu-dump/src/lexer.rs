//! # Lexer for objdump listings
//!
//! A listing is a sequence of lines of whitespace separated fields. The
//! lexer only splits; the loader decides what each field means.

use crate::error::{DumpError, Result};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token<'s> {
    #[token("\n")]
    Newline,

    /// Any run of non-whitespace characters
    #[regex(r"[^ \t\r\f\n]+", |lex| lex.slice())]
    Field(&'s str),
}

/// Split `text` into `(line number, fields)` pairs, skipping empty lines.
/// Line numbers start at 1.
pub fn lines(text: &str) -> Result<Vec<(usize, Vec<&str>)>> {
    let mut out = Vec::new();
    let mut line = 1;
    let mut fields = Vec::new();
    for token in Token::lexer(text) {
        match token {
            Ok(Token::Field(s)) => fields.push(s),
            Ok(Token::Newline) => {
                if !fields.is_empty() {
                    out.push((line, std::mem::take(&mut fields)));
                }
                line += 1;
            }
            Err(()) => return Err(DumpError::Lex { line }),
        }
    }
    if !fields.is_empty() {
        out.push((line, fields));
    }
    Ok(out)
}
