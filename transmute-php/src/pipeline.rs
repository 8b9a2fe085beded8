//! The one-shot batch pipeline: walk → prefilter → parse → extract →
//! resolve → consolidate, then reconcile, persist the mapping document, and
//! write the generated class units and bindings.

use crate::consolidate::Consolidator;
use crate::err::TransmuteError;
use crate::err::TransmuteResult;
use crate::extract;
use crate::extract::DeclKind;
use crate::extract::Discovery;
use crate::reconcile::human_date;
use crate::reconcile::reconcile;
use crate::resolve::resolve_class;
use crate::resolve::resolve_function;
use crate::resolve::Defaults;
use crate::rewrite::Prefilter;
use crate::shim::emit_bindings;
use crate::store::MappingDocument;
use parse_php::ast::Decl;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

pub const DEFAULT_NAMESPACE: &str = "App";
pub const DEFAULT_FUNCTION_CLASS: &str = "Misc";

#[derive(Clone, Debug)]
pub struct Options {
  /// Root directory of the legacy source tree.
  pub root: PathBuf,
  /// Path of the persisted mapping document, rewritten in full each run.
  pub mappings_path: PathBuf,
  /// Directory receiving generated artifacts.
  pub out_dir: PathBuf,
  /// Subdirectory of `out_dir` that receives the generated class units.
  pub unit_dir: String,
  /// Files whose path contains any of these substrings are skipped.
  pub excludes: Vec<String>,
  pub default_namespace: String,
  pub default_function_class: String,
  pub prefilter: Prefilter,
}

impl Options {
  pub fn new(root: impl Into<PathBuf>, mappings_path: impl Into<PathBuf>) -> Self {
    Options {
      root: root.into(),
      mappings_path: mappings_path.into(),
      out_dir: PathBuf::from("build"),
      unit_dir: "app".to_owned(),
      excludes: Vec::new(),
      default_namespace: DEFAULT_NAMESPACE.to_owned(),
      default_function_class: DEFAULT_FUNCTION_CLASS.to_owned(),
      prefilter: Prefilter::default(),
    }
  }

  pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
    self.out_dir = out_dir.into();
    self
  }

  pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
    self.excludes = excludes;
    self
  }

  pub fn with_defaults(
    mut self,
    namespace: impl Into<String>,
    function_class: impl Into<String>,
  ) -> Self {
    self.default_namespace = namespace.into();
    self.default_function_class = function_class.into();
    self
  }

  pub fn with_prefilter(mut self, prefilter: Prefilter) -> Self {
    self.prefilter = prefilter;
    self
  }
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct Report {
  pub scanned_files: usize,
  pub parse_failures: Vec<ParseFailure>,
  pub generated: Vec<PathBuf>,
  pub live_functions: usize,
  pub live_classes: usize,
  pub outdated_functions: usize,
  pub outdated_classes: usize,
}

/// A file skipped this run. Its symbols are absent from the scan, so any
/// that are mapped nowhere else will be reconciled into the outdated
/// archive — a sharp edge worth surfacing, not masking.
#[derive(Debug)]
pub struct ParseFailure {
  pub path: PathBuf,
  pub message: String,
}

pub fn run(options: &Options) -> TransmuteResult<Report> {
  let mut doc = MappingDocument::load(&options.mappings_path)?;
  let defaults = Defaults {
    namespace: options.default_namespace.clone(),
    function_class: options.default_function_class.clone(),
  };
  let mut report = Report::default();
  let mut discovery = Discovery::new();
  let mut consolidator = Consolidator::new();

  for path in source_files(&options.root, &options.excludes) {
    report.scanned_files += 1;
    let code = match fs::read_to_string(&path) {
      Ok(code) => code,
      Err(err) => {
        warn!(file = %path.display(), %err, "unreadable file skipped");
        report.parse_failures.push(ParseFailure {
          message: err.to_string(),
          path,
        });
        continue;
      }
    };
    let code = options.prefilter.apply(&path, &code);
    let unit = match parse_php::parse(&code) {
      Ok(unit) => unit,
      Err(err) => {
        warn!(file = %path.display(), %err, "parse error, file skipped");
        report.parse_failures.push(ParseFailure {
          message: err.to_string(),
          path,
        });
        continue;
      }
    };
    for declaration in extract::extract(unit, &path) {
      match (declaration.kind, declaration.decl) {
        (DeclKind::Function, Decl::Func(func)) => {
          if !discovery.record_function(&declaration.name, &path) {
            debug!(
              name = %declaration.name,
              file = %path.display(),
              "function already declared in an earlier file, ignored"
            );
            continue;
          }
          let target = resolve_function(&mut doc, &declaration.name, &defaults).clone();
          consolidator.add_function(&target, func);
        }
        (DeclKind::Class, Decl::Class(decl)) => {
          if !discovery.record_class(&declaration.name, &path) {
            debug!(
              name = %declaration.name,
              file = %path.display(),
              "class already declared in an earlier file, ignored"
            );
            continue;
          }
          let target = resolve_class(&mut doc, &declaration.name, &defaults).clone();
          consolidator.add_class(&target, decl);
        }
        _ => {}
      }
    }
  }

  let removed_date = human_date(chrono::Local::now().date_naive());
  reconcile(&mut doc, &discovery, &removed_date);
  doc.save(&options.mappings_path)?;

  let unit_root = options.out_dir.join(&options.unit_dir);
  for unit in consolidator.finish(&doc) {
    let path = unit_root.join(&unit.path);
    write_artifact(&path, &unit.source)?;
    info!(file = %path.display(), namespace = %unit.namespace, "generated class unit");
    report.generated.push(path);
  }

  let bindings_path = options.out_dir.join("bindings.php");
  write_artifact(&bindings_path, &emit_bindings(&doc))?;
  info!(file = %bindings_path.display(), "generated bindings");
  report.generated.push(bindings_path);

  report.live_functions = doc.functions.len();
  report.live_classes = doc.classes.len();
  report.outdated_functions = doc.outdated.functions.len();
  report.outdated_classes = doc.outdated.classes.len();
  Ok(report)
}

fn write_artifact(path: &Path, source: &str) -> TransmuteResult<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|err| TransmuteError::write(parent, err))?;
  }
  fs::write(path, source).map_err(|err| TransmuteError::write(path, err))
}

/// Candidate `.php` files under the root, exclusion-filtered and sorted so
/// that first-seen-wins decisions are reproducible across filesystems.
fn source_files(root: &Path, excludes: &[String]) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(root)
    .into_iter()
    .filter_map(|entry| match entry {
      Ok(entry) => Some(entry),
      Err(err) => {
        warn!(%err, "unreadable directory entry skipped");
        None
      }
    })
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| entry.into_path())
    .filter(|path| {
      path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("php"))
        .unwrap_or(false)
    })
    .filter(|path| {
      let text = path.to_string_lossy();
      !excludes.iter().any(|exclude| text.contains(exclude.as_str()))
    })
    .collect();
  files.sort();
  files
}
