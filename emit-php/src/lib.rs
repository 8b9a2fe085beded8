use emitter::Emitter;
use itertools::Itertools;
use parse_php::ast::ClassDecl;
use parse_php::ast::FuncDecl;
use parse_php::ast::Param;

pub mod emitter;

/// A class synthesized from free functions: its members are transmuted
/// `public static` methods.
pub struct MethodClassUnit<'a> {
  pub namespace: &'a str,
  pub class: &'a str,
  pub methods: Vec<Method<'a>>,
}

pub struct Method<'a> {
  /// Target method name (may differ from the original function name).
  pub name: &'a str,
  pub func: &'a FuncDecl,
}

/// A standalone class carried over under a new identity.
pub struct ClassUnit<'a> {
  pub namespace: &'a str,
  /// Target class name, emitted in place of the declared one.
  pub name: &'a str,
  /// Base-class reference to emit, already rewritten if it had a mapping.
  pub extends: Option<String>,
  pub decl: &'a ClassDecl,
}

/// Renders one synthesized method class as a complete PHP file.
pub fn emit_method_class(unit: &MethodClassUnit) -> String {
  let mut em = file_header(unit.namespace);
  em.line(&format!("class {}", unit.class));
  em.open();
  for (i, method) in unit.methods.iter().enumerate() {
    if i > 0 {
      em.blank();
    }
    emit_method(&mut em, method);
  }
  em.close();
  em.finish()
}

/// Renders one carried-over class as a complete PHP file.
pub fn emit_class(unit: &ClassUnit) -> String {
  let mut em = file_header(unit.namespace);
  emit_metadata(&mut em, &unit.decl.doc, &unit.decl.attributes);
  let mut head = String::new();
  if unit.decl.abstract_ {
    head.push_str("abstract ");
  }
  if unit.decl.final_ {
    head.push_str("final ");
  }
  head.push_str("class ");
  head.push_str(unit.name);
  if let Some(base) = &unit.extends {
    head.push_str(" extends ");
    head.push_str(base);
  }
  if !unit.decl.implements.is_empty() {
    head.push_str(" implements ");
    head.push_str(&unit.decl.implements.iter().join(", "));
  }
  em.line(&head);
  em.open();
  emit_body(&mut em, &unit.decl.body.raw);
  em.close();
  em.finish()
}

fn file_header(namespace: &str) -> Emitter {
  let mut em = Emitter::new();
  em.line("<?php");
  em.blank();
  em.line(&format!("namespace {};", namespace));
  em.blank();
  em
}

fn emit_method(em: &mut Emitter, method: &Method) {
  emit_metadata(em, &method.func.doc, &method.func.attributes);
  let amp = if method.func.by_ref { "&" } else { "" };
  let ret = match &method.func.return_type {
    Some(t) => format!(": {}", t),
    None => String::new(),
  };
  em.line(&format!(
    "public static function {}{}({}){}",
    amp,
    method.name,
    render_params(&method.func.params),
    ret
  ));
  em.open();
  emit_body(em, &method.func.body.raw);
  em.close();
}

fn emit_metadata(em: &mut Emitter, doc: &Option<String>, attributes: &[String]) {
  if let Some(doc) = doc {
    for line in doc.lines() {
      let line = line.trim_start().trim_end_matches('\r');
      // Keep the conventional one-space alignment of continuation lines.
      if line.starts_with('*') {
        em.line(&format!(" {}", line));
      } else {
        em.line(line);
      }
    }
  }
  for attr in attributes {
    for line in attr.lines() {
      em.line(line.trim_start().trim_end_matches('\r'));
    }
  }
}

pub fn render_params(params: &[Param]) -> String {
  params.iter().map(render_param).join(", ")
}

fn render_param(param: &Param) -> String {
  let mut out = String::new();
  if let Some(hint) = &param.type_hint {
    out.push_str(hint);
    out.push(' ');
  }
  if param.by_ref {
    out.push('&');
  }
  if param.variadic {
    out.push_str("...");
  }
  out.push('$');
  out.push_str(&param.name);
  if let Some(default) = &param.default {
    out.push_str(" = ");
    out.push_str(default);
  }
  out
}

/// Re-emits a raw body at the current indent level: surrounding blank lines
/// are dropped, the common leading indentation is stripped, and each line is
/// re-indented uniformly.
fn emit_body(em: &mut Emitter, raw: &str) {
  let lines: Vec<&str> = raw
    .lines()
    .map(|line| line.trim_end_matches('\r'))
    .collect();
  let first = lines.iter().position(|l| !l.trim().is_empty());
  let Some(first) = first else {
    return;
  };
  let last = lines.iter().rposition(|l| !l.trim().is_empty()).unwrap_or(first);
  let lines = &lines[first..=last];
  if raw.contains("<<<") {
    // Heredoc contents are indentation-sensitive; emit the block untouched.
    for line in lines {
      em.raw_line(line);
    }
    return;
  }
  let strip = lines
    .iter()
    .filter(|l| !l.trim().is_empty())
    .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
    .min()
    .unwrap_or(0);
  for line in lines {
    if line.trim().is_empty() {
      em.line("");
    } else {
      em.line(&line[strip..]);
    }
  }
}
