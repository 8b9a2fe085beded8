use ast::SourceUnit;
use error::SyntaxResult;
use scan::Scanner;

pub mod ast;
pub mod error;
pub mod loc;
pub mod scan;

/// Parses a PHP source file into its top-level declarations.
///
/// Only top-level `function` and `class` declarations are recognized;
/// declaration bodies are captured as raw source blocks so they can be
/// re-emitted losslessly. Everything else in the file (statements,
/// expressions, HTML between PHP tags, nested or conditional declarations)
/// is scanned for bookkeeping but produces no nodes.
pub fn parse(source: &str) -> SyntaxResult<SourceUnit> {
  Scanner::new(source).parse_unit()
}
