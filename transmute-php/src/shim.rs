//! Backward-compatibility shims: a global forwarder per live function
//! mapping and a `class_alias` per live class mapping, so unmigrated call
//! sites keep working against the consolidated API.

use crate::builtins;
use crate::store::MappingDocument;
use std::fmt::Write;
use tracing::debug;

/// Renders the complete `bindings.php`: all function forwarders (ordered
/// like the persisted document), then all class aliases (by original name).
pub fn emit_bindings(doc: &MappingDocument) -> String {
  let mut out = String::from("<?php\n\n");
  for (name, target) in doc.sorted_functions() {
    if builtins::is_builtin_function(name) {
      // Shadowing an interpreter built-in would break host semantics.
      debug!(function = %name, "built-in name skipped in bindings");
      continue;
    }
    let _ = write!(
      out,
      "function {}(...$args) {{\n    return {}::{}(...$args);\n}}\n\n",
      name,
      target.qualified_class(),
      target.method
    );
  }
  for (name, target) in doc.sorted_classes() {
    let _ = writeln!(out, "class_alias('{}', '{}');", target.qualified(), name);
  }
  out
}
