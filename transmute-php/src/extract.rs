use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use parse_php::ast::Decl;
use parse_php::ast::SourceUnit;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
  Function,
  Class,
}

/// One top-level declaration found during the scan, tagged with the file it
/// came from.
#[derive(Clone, Debug)]
pub struct SourceDeclaration {
  pub name: String,
  pub kind: DeclKind,
  pub origin: PathBuf,
  pub decl: Decl,
}

/// Yields the unit's declarations in source order. A name repeated within
/// the unit keeps its first occurrence only; functions and classes are
/// tracked separately, so a function and a class may share a name.
pub fn extract(unit: SourceUnit, origin: &Path) -> Vec<SourceDeclaration> {
  let mut seen: HashSet<(DeclKind, String)> = HashSet::new();
  let mut out = Vec::new();
  for decl in unit.decls {
    let kind = match &decl {
      Decl::Func(_) => DeclKind::Function,
      Decl::Class(_) => DeclKind::Class,
    };
    let name = decl.name().to_owned();
    if !seen.insert((kind, name.clone())) {
      debug!(
        name = %name,
        file = %origin.display(),
        "duplicate declaration in file ignored"
      );
      continue;
    }
    out.push(SourceDeclaration {
      name,
      kind,
      origin: origin.to_owned(),
      decl,
    });
  }
  out
}

/// Every name discovered during one run, with the file that first declared
/// it. Drives cross-file first-seen-wins dedup and, after the scan, the
/// lifecycle reconciliation.
#[derive(Debug, Default)]
pub struct Discovery {
  pub functions: HashMap<String, PathBuf>,
  pub classes: HashMap<String, PathBuf>,
}

impl Discovery {
  pub fn new() -> Self {
    Discovery {
      functions: HashMap::new(),
      classes: HashMap::new(),
    }
  }

  /// Records a function name; false if some earlier file already owns it.
  pub fn record_function(&mut self, name: &str, origin: &Path) -> bool {
    record(&mut self.functions, name, origin)
  }

  /// Records a class name; false if some earlier file already owns it.
  pub fn record_class(&mut self, name: &str, origin: &Path) -> bool {
    record(&mut self.classes, name, origin)
  }
}

fn record(table: &mut HashMap<String, PathBuf>, name: &str, origin: &Path) -> bool {
  if table.contains_key(name) {
    return false;
  }
  table.insert(name.to_owned(), origin.to_owned());
  true
}
