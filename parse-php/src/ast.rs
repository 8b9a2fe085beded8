use crate::loc::Loc;

/// One parsed source file: its top-level declarations, in source order.
#[derive(Clone, Debug)]
pub struct SourceUnit {
  pub decls: Vec<Decl>,
}

#[derive(Clone, Debug)]
pub enum Decl {
  Func(FuncDecl),
  Class(ClassDecl),
}

impl Decl {
  pub fn name(&self) -> &str {
    match self {
      Decl::Func(f) => &f.name,
      Decl::Class(c) => &c.name,
    }
  }
}

/// A raw brace-delimited body, exactly as it appeared between the braces.
///
/// Bodies are deliberately opaque: they re-emit byte-for-byte (modulo
/// uniform re-indentation), so no statement-level fidelity can be lost.
#[derive(Clone, Debug)]
pub struct Block {
  pub raw: String,
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct Param {
  /// Raw type hint text, e.g. `?array` or `Foo\Bar`, if present.
  pub type_hint: Option<String>,
  pub by_ref: bool,
  pub variadic: bool,
  /// Variable name without the leading `$`.
  pub name: String,
  /// Raw default value expression, if present.
  pub default: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
  pub name: String,
  /// Whether the function returns by reference (`function &f()`).
  pub by_ref: bool,
  pub params: Vec<Param>,
  /// Raw return type text after `:`, if present.
  pub return_type: Option<String>,
  /// The `/** ... */` docblock immediately preceding the declaration.
  pub doc: Option<String>,
  /// Raw `#[...]` attribute groups immediately preceding the declaration.
  pub attributes: Vec<String>,
  pub body: Block,
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
  pub name: String,
  pub abstract_: bool,
  pub final_: bool,
  /// Base class name exactly as written, e.g. `WP_Widget` or `\Foo\Bar`.
  pub extends: Option<String>,
  pub implements: Vec<String>,
  pub doc: Option<String>,
  pub attributes: Vec<String>,
  pub body: Block,
  pub loc: Loc,
}
