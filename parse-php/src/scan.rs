use crate::ast::Block;
use crate::ast::ClassDecl;
use crate::ast::Decl;
use crate::ast::FuncDecl;
use crate::ast::Param;
use crate::ast::SourceUnit;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;

fn is_ident_start(b: u8) -> bool {
  b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Single-pass scanner over one PHP source file.
///
/// The scanner tracks just enough lexical structure (strings, comments,
/// heredocs, attribute groups, brace depth, PHP open/close tags) to find
/// top-level `function` and `class` declarations and capture their bodies
/// as raw balanced-brace blocks. It is not a full PHP parser and never
/// interprets statements.
pub struct Scanner<'a> {
  source: &'a str,
  bytes: &'a [u8],
  next: usize,
}

impl<'a> Scanner<'a> {
  pub fn new(source: &'a str) -> Self {
    Scanner {
      source,
      bytes: source.as_bytes(),
      next: 0,
    }
  }

  pub fn parse_unit(mut self) -> SyntaxResult<SourceUnit> {
    let mut decls = Vec::new();
    let mut in_php = false;
    // True when the next token begins a statement; `function`/`class`
    // keywords anywhere else are part of an expression (closures,
    // anonymous classes, `::class`, ...) and must not produce nodes.
    let mut stmt_start = true;
    let mut depth = 0usize;
    let mut pending_doc: Option<String> = None;
    let mut pending_attrs: Vec<String> = Vec::new();
    let mut abstract_ = false;
    let mut final_ = false;

    while self.next < self.bytes.len() {
      if !in_php {
        if !self.find_php_open() {
          break;
        }
        in_php = true;
        stmt_start = true;
        continue;
      }
      let b = self.bytes[self.next];
      match b {
        b' ' | b'\t' | b'\r' | b'\n' => self.next += 1,
        b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
        b'/' if self.peek(1) == Some(b'*') => {
          let start = self.next;
          self.skip_block_comment()?;
          if self.source[start..self.next].starts_with("/**") {
            pending_doc = Some(self.source[start..self.next].to_owned());
          }
        }
        b'#' if self.peek(1) == Some(b'[') => {
          let start = self.next;
          self.skip_attribute()?;
          pending_attrs.push(self.source[start..self.next].to_owned());
        }
        b'#' => self.skip_line(),
        b'?' if self.peek(1) == Some(b'>') => {
          self.next += 2;
          in_php = false;
          stmt_start = true;
          pending_doc = None;
          pending_attrs.clear();
          abstract_ = false;
          final_ = false;
        }
        b'\'' | b'"' | b'`' => {
          self.skip_string(b)?;
          stmt_start = false;
          pending_doc = None;
        }
        b'<' if self.starts_with("<<<") => {
          self.skip_heredoc()?;
          stmt_start = false;
          pending_doc = None;
        }
        b'{' => {
          self.next += 1;
          depth += 1;
          stmt_start = true;
          pending_doc = None;
          pending_attrs.clear();
          abstract_ = false;
          final_ = false;
        }
        b'}' => {
          self.next += 1;
          depth = depth.saturating_sub(1);
          stmt_start = true;
          pending_doc = None;
          pending_attrs.clear();
          abstract_ = false;
          final_ = false;
        }
        b';' => {
          self.next += 1;
          stmt_start = true;
          pending_doc = None;
          pending_attrs.clear();
          abstract_ = false;
          final_ = false;
        }
        _ if is_ident_start(b) => {
          let kw_start = self.next;
          let word = self.read_ident();
          if depth == 0 && stmt_start && word.eq_ignore_ascii_case("abstract") {
            abstract_ = true;
          } else if depth == 0 && stmt_start && word.eq_ignore_ascii_case("final") {
            final_ = true;
          } else if depth == 0 && stmt_start && word.eq_ignore_ascii_case("function") {
            let doc = pending_doc.take();
            let attrs = std::mem::take(&mut pending_attrs);
            if let Some(func) = self.parse_function(kw_start, doc, attrs)? {
              decls.push(Decl::Func(func));
            }
            abstract_ = false;
            final_ = false;
          } else if depth == 0 && stmt_start && word.eq_ignore_ascii_case("class") {
            let doc = pending_doc.take();
            let attrs = std::mem::take(&mut pending_attrs);
            let class = self.parse_class(kw_start, doc, attrs, abstract_, final_)?;
            decls.push(Decl::Class(class));
            abstract_ = false;
            final_ = false;
          } else {
            stmt_start = false;
            pending_doc = None;
            pending_attrs.clear();
            abstract_ = false;
            final_ = false;
          }
        }
        _ => {
          self.next += 1;
          stmt_start = false;
          pending_doc = None;
        }
      }
    }
    Ok(SourceUnit { decls })
  }

  fn parse_function(
    &mut self,
    kw_start: usize,
    doc: Option<String>,
    attributes: Vec<String>,
  ) -> SyntaxResult<Option<FuncDecl>> {
    self.skip_trivia()?;
    let by_ref = self.eat(b'&');
    if by_ref {
      self.skip_trivia()?;
    }
    let name = match self.try_read_ident() {
      Some(name) => name.to_owned(),
      // `function (` at statement position is an expression, not a
      // declaration; back off and let the generic scan consume it.
      None => return Ok(None),
    };
    self.skip_trivia()?;
    self.expect(b'(')?;
    let params_loc = self.capture_balanced(b'(', b')')?;
    let params = parse_params(params_loc.extract(self.source))
      .map_err(|typ| SyntaxError::new(typ, params_loc))?;
    self.skip_trivia()?;
    let return_type = if self.eat(b':') {
      Some(self.capture_return_type()?)
    } else {
      None
    };
    self.skip_trivia()?;
    self.expect(b'{')?;
    let body_loc = self.capture_balanced(b'{', b'}')?;
    Ok(Some(FuncDecl {
      name,
      by_ref,
      params,
      return_type,
      doc,
      attributes,
      body: Block {
        raw: body_loc.extract(self.source).to_owned(),
        loc: body_loc,
      },
      loc: Loc(kw_start, self.next),
    }))
  }

  fn parse_class(
    &mut self,
    kw_start: usize,
    doc: Option<String>,
    attributes: Vec<String>,
    abstract_: bool,
    final_: bool,
  ) -> SyntaxResult<ClassDecl> {
    self.skip_trivia()?;
    let name = self
      .try_read_ident()
      .ok_or_else(|| self.err_here(SyntaxErrorType::ExpectedSyntax("class name")))?
      .to_owned();
    self.skip_trivia()?;
    let mut extends = None;
    if self.eat_word_ci("extends") {
      self.skip_trivia()?;
      extends = Some(self.read_qualified_name()?);
      self.skip_trivia()?;
    }
    let mut implements = Vec::new();
    if self.eat_word_ci("implements") {
      loop {
        self.skip_trivia()?;
        implements.push(self.read_qualified_name()?);
        self.skip_trivia()?;
        if !self.eat(b',') {
          break;
        }
      }
    }
    self.expect(b'{')?;
    let body_loc = self.capture_balanced(b'{', b'}')?;
    Ok(ClassDecl {
      name,
      abstract_,
      final_,
      extends,
      implements,
      doc,
      attributes,
      body: Block {
        raw: body_loc.extract(self.source).to_owned(),
        loc: body_loc,
      },
      loc: Loc(kw_start, self.next),
    })
  }

  /// Captures everything after an already-consumed `open` up to its
  /// balanced `close`, skipping strings, comments, heredocs, attribute
  /// groups, and inline `?> ... <?php` excursions. Returns the inner range.
  fn capture_balanced(&mut self, open: u8, close: u8) -> SyntaxResult<Loc> {
    let start = self.next;
    let mut depth = 1usize;
    while self.next < self.bytes.len() {
      let b = self.bytes[self.next];
      match b {
        b'\'' | b'"' | b'`' => self.skip_string(b)?,
        b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
        b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
        b'#' if self.peek(1) == Some(b'[') => self.skip_attribute()?,
        b'#' => self.skip_line(),
        b'<' if self.starts_with("<<<") => self.skip_heredoc()?,
        b'?' if self.peek(1) == Some(b'>') => {
          // A close tag inside a body drops to HTML until the next open tag.
          self.next += 2;
          if !self.find_php_open() {
            return Err(self.err_here(SyntaxErrorType::UnexpectedEnd));
          }
        }
        _ if b == open => {
          depth += 1;
          self.next += 1;
        }
        _ if b == close => {
          depth -= 1;
          self.next += 1;
          if depth == 0 {
            return Ok(Loc(start, self.next - 1));
          }
        }
        _ => self.next += 1,
      }
    }
    Err(self.err_here(SyntaxErrorType::UnexpectedEnd))
  }

  /// Raw return type text between `:` and the body `{`.
  fn capture_return_type(&mut self) -> SyntaxResult<String> {
    let start = self.next;
    while self.next < self.bytes.len() {
      match self.bytes[self.next] {
        b'{' => {
          let text = self.source[start..self.next].trim().to_owned();
          if text.is_empty() {
            return Err(self.err_here(SyntaxErrorType::ExpectedSyntax("return type")));
          }
          return Ok(text);
        }
        b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
        b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
        _ => self.next += 1,
      }
    }
    Err(self.err_here(SyntaxErrorType::UnexpectedEnd))
  }

  /// Whitespace and comments; docblocks here are not declaration metadata.
  fn skip_trivia(&mut self) -> SyntaxResult<()> {
    while self.next < self.bytes.len() {
      match self.bytes[self.next] {
        b' ' | b'\t' | b'\r' | b'\n' => self.next += 1,
        b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
        b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
        _ => break,
      }
    }
    Ok(())
  }

  fn skip_line(&mut self) {
    match memchr(b'\n', &self.bytes[self.next..]) {
      Some(i) => self.next += i + 1,
      None => self.next = self.bytes.len(),
    }
  }

  fn skip_block_comment(&mut self) -> SyntaxResult<()> {
    self.next += 2;
    while let Some(i) = memchr(b'*', &self.bytes[self.next..]) {
      self.next += i + 1;
      if self.peek(0) == Some(b'/') {
        self.next += 1;
        return Ok(());
      }
    }
    Err(self.err_here(SyntaxErrorType::UnexpectedEnd))
  }

  /// `#[...]` attribute group, bracket-balanced and string-aware.
  fn skip_attribute(&mut self) -> SyntaxResult<()> {
    self.next += 2;
    let mut depth = 1usize;
    while self.next < self.bytes.len() {
      match self.bytes[self.next] {
        b'\'' | b'"' => {
          let quote = self.bytes[self.next];
          self.skip_string(quote)?;
        }
        b'[' => {
          depth += 1;
          self.next += 1;
        }
        b']' => {
          depth -= 1;
          self.next += 1;
          if depth == 0 {
            return Ok(());
          }
        }
        _ => self.next += 1,
      }
    }
    Err(self.err_here(SyntaxErrorType::UnexpectedEnd))
  }

  /// Skips a quoted string. For double-quoted and backtick strings,
  /// `{$...}` / `${...}` interpolations are brace-balanced so that quotes
  /// inside an interpolation do not terminate the string early.
  fn skip_string(&mut self, quote: u8) -> SyntaxResult<()> {
    self.next += 1;
    let interpolating = quote != b'\'';
    while self.next < self.bytes.len() {
      let rest = &self.bytes[self.next..];
      let i = if interpolating {
        memchr3(quote, b'\\', b'{', rest)
      } else {
        memchr2(quote, b'\\', rest)
      };
      match i {
        None => break,
        Some(i) => {
          self.next += i;
          match self.bytes[self.next] {
            b'\\' => self.next += 2,
            b'{' => {
              if self.peek(1) == Some(b'$') || self.source[..self.next].ends_with('$') {
                self.skip_interpolation()?;
              } else {
                self.next += 1;
              }
            }
            _ => {
              self.next += 1;
              return Ok(());
            }
          }
        }
      }
    }
    Err(self.err_here(SyntaxErrorType::RequiredTokenNotFound(quote as char)))
  }

  /// Balanced-brace interpolation inside a double-quoted string; nested
  /// strings are themselves skipped.
  fn skip_interpolation(&mut self) -> SyntaxResult<()> {
    self.next += 1;
    let mut depth = 1usize;
    while self.next < self.bytes.len() {
      match self.bytes[self.next] {
        b'\'' | b'"' | b'`' => {
          let quote = self.bytes[self.next];
          self.skip_string(quote)?;
        }
        b'{' => {
          depth += 1;
          self.next += 1;
        }
        b'}' => {
          depth -= 1;
          self.next += 1;
          if depth == 0 {
            return Ok(());
          }
        }
        _ => self.next += 1,
      }
    }
    Err(self.err_here(SyntaxErrorType::RequiredTokenNotFound('}')))
  }

  /// `<<<LABEL` / `<<<'LABEL'` heredoc or nowdoc; ends at the first line
  /// whose first non-blank token is the label.
  fn skip_heredoc(&mut self) -> SyntaxResult<()> {
    self.next += 3;
    while matches!(self.peek(0), Some(b' ') | Some(b'\t')) {
      self.next += 1;
    }
    let quote = match self.peek(0) {
      Some(q @ (b'\'' | b'"')) => {
        self.next += 1;
        Some(q)
      }
      _ => None,
    };
    let label_start = self.next;
    while self.peek(0).map(is_ident_continue).unwrap_or(false) {
      self.next += 1;
    }
    if self.next == label_start {
      return Err(self.err_here(SyntaxErrorType::ExpectedSyntax("heredoc label")));
    }
    let label = self.source[label_start..self.next].to_owned();
    if let Some(q) = quote {
      if self.peek(0) != Some(q) {
        return Err(self.err_here(SyntaxErrorType::RequiredTokenNotFound(q as char)));
      }
      self.next += 1;
    }
    self.skip_line();
    while self.next < self.bytes.len() {
      let line_start = self.next;
      let mut at = line_start;
      while at < self.bytes.len() && matches!(self.bytes[at], b' ' | b'\t') {
        at += 1;
      }
      let end = at + label.len();
      if end <= self.bytes.len()
        && &self.source[at..end] == label
        && !self.bytes.get(end).copied().map(is_ident_continue).unwrap_or(false)
      {
        self.next = end;
        return Ok(());
      }
      self.skip_line();
    }
    Err(self.err_here(SyntaxErrorType::UnexpectedEnd))
  }

  /// Advances past the next PHP open tag, returning false at end of input.
  fn find_php_open(&mut self) -> bool {
    while let Some(i) = memchr(b'<', &self.bytes[self.next..]) {
      self.next += i;
      if self.starts_with("<?") {
        self.next += 2;
        if self.starts_with("php") {
          self.next += 3;
        } else if self.starts_with("=") {
          self.next += 1;
        }
        return true;
      }
      self.next += 1;
    }
    self.next = self.bytes.len();
    false
  }

  fn read_ident(&mut self) -> &'a str {
    let source = self.source;
    let start = self.next;
    while self.peek(0).map(is_ident_continue).unwrap_or(false) {
      self.next += 1;
    }
    &source[start..self.next]
  }

  fn try_read_ident(&mut self) -> Option<&'a str> {
    if self.peek(0).map(is_ident_start).unwrap_or(false) {
      Some(self.read_ident())
    } else {
      None
    }
  }

  /// `Name`, `Ns\Name`, or `\Ns\Name`, as written.
  fn read_qualified_name(&mut self) -> SyntaxResult<String> {
    let start = self.next;
    if self.peek(0) == Some(b'\\') {
      self.next += 1;
    }
    loop {
      if self.try_read_ident().is_none() {
        return Err(self.err_here(SyntaxErrorType::ExpectedSyntax("class name")));
      }
      if self.peek(0) == Some(b'\\') {
        self.next += 1;
      } else {
        break;
      }
    }
    Ok(self.source[start..self.next].to_owned())
  }

  fn eat(&mut self, b: u8) -> bool {
    if self.peek(0) == Some(b) {
      self.next += 1;
      true
    } else {
      false
    }
  }

  fn eat_word_ci(&mut self, word: &str) -> bool {
    let end = self.next + word.len();
    if end <= self.bytes.len()
      && self.source[self.next..end].eq_ignore_ascii_case(word)
      && !self.bytes.get(end).copied().map(is_ident_continue).unwrap_or(false)
    {
      self.next = end;
      true
    } else {
      false
    }
  }

  fn expect(&mut self, b: u8) -> SyntaxResult<()> {
    if self.eat(b) {
      Ok(())
    } else {
      Err(self.err_here(SyntaxErrorType::RequiredTokenNotFound(b as char)))
    }
  }

  fn peek(&self, offset: usize) -> Option<u8> {
    self.bytes.get(self.next + offset).copied()
  }

  fn starts_with(&self, s: &str) -> bool {
    self.source[self.next..].starts_with(s)
  }

  fn err_here(&self, typ: SyntaxErrorType) -> SyntaxError {
    SyntaxError::new(typ, Loc(self.next, self.next.min(self.bytes.len())))
  }
}

/// Splits a parameter list on top-level commas and parses each entry.
fn parse_params(raw: &str) -> Result<Vec<Param>, SyntaxErrorType> {
  let mut params = Vec::new();
  for piece in split_top_level(raw, b',') {
    let piece = piece.trim();
    if piece.is_empty() {
      // Trailing comma.
      continue;
    }
    params.push(parse_param(piece)?);
  }
  Ok(params)
}

fn parse_param(text: &str) -> Result<Param, SyntaxErrorType> {
  let (head, default) = match split_once_top_level(text, b'=') {
    Some((head, default)) => (head, Some(default.trim().to_owned())),
    None => (text, None),
  };
  let dollar = head
    .rfind('$')
    .ok_or(SyntaxErrorType::ExpectedSyntax("parameter variable"))?;
  let name: String = head[dollar + 1..]
    .chars()
    .take_while(|c| is_ident_continue(*c as u8) || !c.is_ascii())
    .collect();
  if name.is_empty() {
    return Err(SyntaxErrorType::ExpectedSyntax("parameter name"));
  }
  let mut marker = head[..dollar].trim_end();
  let variadic = marker.ends_with("...");
  if variadic {
    marker = marker[..marker.len() - 3].trim_end();
  }
  let by_ref = marker.ends_with('&');
  if by_ref {
    marker = marker[..marker.len() - 1].trim_end();
  }
  let type_hint = if marker.trim().is_empty() {
    None
  } else {
    Some(marker.trim().to_owned())
  };
  Ok(Param {
    type_hint,
    by_ref,
    variadic,
    name,
    default,
  })
}

/// Splits on `sep` at zero bracket depth, outside strings.
fn split_top_level(raw: &str, sep: u8) -> Vec<&str> {
  let bytes = raw.as_bytes();
  let mut pieces = Vec::new();
  let mut start = 0;
  let mut depth = 0usize;
  let mut i = 0;
  while i < bytes.len() {
    match bytes[i] {
      b'(' | b'[' | b'{' => depth += 1,
      b')' | b']' | b'}' => depth = depth.saturating_sub(1),
      b'\'' | b'"' => {
        let quote = bytes[i];
        i += 1;
        while i < bytes.len() {
          if bytes[i] == b'\\' {
            i += 1;
          } else if bytes[i] == quote {
            break;
          }
          i += 1;
        }
      }
      b if b == sep && depth == 0 => {
        pieces.push(&raw[start..i]);
        start = i + 1;
      }
      _ => {}
    }
    i += 1;
  }
  pieces.push(&raw[start..]);
  pieces
}

fn split_once_top_level(raw: &str, sep: u8) -> Option<(&str, &str)> {
  let mut pieces = split_top_level(raw, sep);
  if pieces.len() < 2 {
    return None;
  }
  let first = pieces.remove(0);
  let rest_start = first.len() + 1;
  Some((first, &raw[rest_start..]))
}
