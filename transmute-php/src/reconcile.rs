//! Post-scan lifecycle reconciliation: mappings whose source names were not
//! discovered this run move into the dated outdated archive. Discovered
//! names are never touched — absence is the only trigger.

use crate::extract::Discovery;
use crate::store::MappingDocument;
use crate::store::OutdatedClass;
use crate::store::OutdatedFunction;
use chrono::Datelike;
use chrono::NaiveDate;
use tracing::info;

pub fn reconcile(doc: &mut MappingDocument, discovery: &Discovery, removed_date: &str) {
  let gone: Vec<String> = doc
    .functions
    .keys()
    .filter(|name| !discovery.functions.contains_key(name.as_str()))
    .cloned()
    .collect();
  for name in gone {
    if let Some(target) = doc.functions.remove(&name) {
      info!(function = %name, "mapping moved to outdated archive");
      // Keyed insert: a newer removal supersedes an archived one.
      doc.outdated.functions.insert(name, OutdatedFunction {
        namespace: target.namespace,
        class: target.class,
        method: target.method,
        removed: removed_date.to_owned(),
      });
    }
  }

  let gone: Vec<String> = doc
    .classes
    .keys()
    .filter(|name| !discovery.classes.contains_key(name.as_str()))
    .cloned()
    .collect();
  for name in gone {
    if let Some(target) = doc.classes.remove(&name) {
      info!(class = %name, "mapping moved to outdated archive");
      doc.outdated.classes.insert(name, OutdatedClass {
        namespace: target.namespace,
        class: target.class,
        removed: removed_date.to_owned(),
      });
    }
  }
}

/// Removal-date text, e.g. `Oct 4th 2024`.
pub fn human_date(date: NaiveDate) -> String {
  let day = date.day();
  let suffix = match day {
    11..=13 => "th",
    _ => match day % 10 {
      1 => "st",
      2 => "nd",
      3 => "rd",
      _ => "th",
    },
  };
  format!("{} {}{} {}", date.format("%b"), day, suffix, date.format("%Y"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::FunctionTarget;
  use std::path::Path;

  fn live(doc: &mut MappingDocument, name: &str) {
    doc.functions.insert(name.to_owned(), FunctionTarget {
      namespace: "App".into(),
      class: "Misc".into(),
      method: name.to_owned(),
    });
  }

  #[test]
  fn vanished_function_moves_to_archive_with_date() {
    let mut doc = MappingDocument::default();
    live(&mut doc, "legacy");
    live(&mut doc, "kept");
    let mut discovery = Discovery::new();
    discovery.record_function("kept", Path::new("a.php"));
    reconcile(&mut doc, &discovery, "Aug 7th 2026");
    assert!(!doc.functions.contains_key("legacy"));
    assert!(doc.functions.contains_key("kept"));
    let archived = &doc.outdated.functions["legacy"];
    assert_eq!(archived.removed, "Aug 7th 2026");
    assert_eq!(archived.method, "legacy");
  }

  #[test]
  fn newer_removal_date_wins_in_archive() {
    let mut doc = MappingDocument::default();
    doc.outdated.functions.insert("legacy".into(), OutdatedFunction {
      namespace: "App".into(),
      class: "Misc".into(),
      method: "legacy".into(),
      removed: "Oct 4th 2024".into(),
    });
    live(&mut doc, "legacy");
    reconcile(&mut doc, &Discovery::new(), "Aug 7th 2026");
    assert_eq!(doc.outdated.functions["legacy"].removed, "Aug 7th 2026");
  }

  #[test]
  fn discovered_names_are_untouched() {
    let mut doc = MappingDocument::default();
    live(&mut doc, "kept");
    let before = doc.functions["kept"].clone();
    let mut discovery = Discovery::new();
    discovery.record_function("kept", Path::new("a.php"));
    reconcile(&mut doc, &discovery, "Aug 7th 2026");
    assert_eq!(doc.functions["kept"], before);
    assert!(doc.outdated.functions.is_empty());
  }

  #[test]
  fn archive_entries_are_not_revived_by_rediscovery() {
    // A name in the archive that shows up again is a fresh mapping
    // decision; the archived entry stays put as history.
    let mut doc = MappingDocument::default();
    doc.outdated.functions.insert("ghost".into(), OutdatedFunction {
      namespace: "App\\Old".into(),
      class: "Haunt".into(),
      method: "ghost".into(),
      removed: "Oct 4th 2024".into(),
    });
    let mut discovery = Discovery::new();
    discovery.record_function("ghost", Path::new("a.php"));
    reconcile(&mut doc, &discovery, "Aug 7th 2026");
    assert!(doc.outdated.functions.contains_key("ghost"));
    assert!(!doc.functions.contains_key("ghost"));
  }

  #[test]
  fn formats_ordinal_dates() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(human_date(date(2024, 10, 4)), "Oct 4th 2024");
    assert_eq!(human_date(date(2026, 8, 1)), "Aug 1st 2026");
    assert_eq!(human_date(date(2026, 8, 22)), "Aug 22nd 2026");
    assert_eq!(human_date(date(2026, 8, 13)), "Aug 13th 2026");
    assert_eq!(human_date(date(2026, 8, 23)), "Aug 23rd 2026");
  }
}
