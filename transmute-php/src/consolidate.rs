//! Groups transmuted declarations into output units: one synthesized class
//! per (namespace, class) pair of function mappings, one unit per carried
//! class. Member order is first-encountered-first-emitted, which together
//! with the pipeline's sorted file walk makes output deterministic.

use crate::store::ClassTarget;
use crate::store::FunctionTarget;
use crate::store::MappingDocument;
use ahash::HashMap;
use emit_php::ClassUnit;
use emit_php::Method;
use emit_php::MethodClassUnit;
use parse_php::ast::ClassDecl;
use parse_php::ast::FuncDecl;
use std::path::PathBuf;

/// One generated PHP file, addressed relative to the output root.
#[derive(Debug)]
pub struct GeneratedUnit {
  pub namespace: String,
  pub class: String,
  pub path: PathBuf,
  pub source: String,
}

#[derive(Default)]
pub struct Consolidator {
  groups: Vec<MethodGroup>,
  group_index: HashMap<(String, String), usize>,
  classes: Vec<PendingClass>,
}

struct MethodGroup {
  namespace: String,
  class: String,
  methods: Vec<(String, FuncDecl)>,
}

struct PendingClass {
  namespace: String,
  name: String,
  decl: ClassDecl,
}

impl Consolidator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Files a transmuted function under its target class.
  pub fn add_function(&mut self, target: &FunctionTarget, func: FuncDecl) {
    let key = (target.namespace.clone(), target.class.clone());
    let index = match self.group_index.get(&key) {
      Some(&index) => index,
      None => {
        self.groups.push(MethodGroup {
          namespace: key.0.clone(),
          class: key.1.clone(),
          methods: Vec::new(),
        });
        let index = self.groups.len() - 1;
        self.group_index.insert(key, index);
        index
      }
    };
    self.groups[index].methods.push((target.method.clone(), func));
  }

  /// Files a carried-over class under its target identity.
  pub fn add_class(&mut self, target: &ClassTarget, decl: ClassDecl) {
    self.classes.push(PendingClass {
      namespace: target.namespace.clone(),
      name: target.class.clone(),
      decl,
    });
  }

  /// Materializes every output unit. Base-class references are rewritten
  /// here, after the whole tree has been scanned, so forward references
  /// across files resolve regardless of scan order.
  pub fn finish(self, doc: &MappingDocument) -> Vec<GeneratedUnit> {
    let mut units = Vec::new();
    for group in &self.groups {
      let unit = MethodClassUnit {
        namespace: &group.namespace,
        class: &group.class,
        methods: group
          .methods
          .iter()
          .map(|(name, func)| Method { name, func })
          .collect(),
      };
      units.push(GeneratedUnit {
        namespace: group.namespace.clone(),
        class: group.class.clone(),
        path: unit_path(&group.namespace, &group.class),
        source: emit_php::emit_method_class(&unit),
      });
    }
    for pending in &self.classes {
      let extends = pending.decl.extends.as_ref().map(|base| {
        match doc.classes.get(base) {
          Some(target) => format!("\\{}", target.qualified()),
          // Unmapped base: leave the reference exactly as written.
          None => base.clone(),
        }
      });
      let unit = ClassUnit {
        namespace: &pending.namespace,
        name: &pending.name,
        extends,
        decl: &pending.decl,
      };
      units.push(GeneratedUnit {
        namespace: pending.namespace.clone(),
        class: pending.name.clone(),
        path: unit_path(&pending.namespace, &pending.name),
        source: emit_php::emit_class(&unit),
      });
    }
    units
  }
}

/// Splits the namespace into path segments, dropping the leading (root)
/// segment: `App\Data\Query` lands at `Data/Query.php`, a root-namespace
/// class at `Query.php`.
pub fn unit_path(namespace: &str, class: &str) -> PathBuf {
  let mut path = PathBuf::new();
  for segment in namespace.split('\\').skip(1) {
    path.push(segment);
  }
  path.push(format!("{}.php", class));
  path
}

#[cfg(test)]
mod tests {
  use super::*;
  use parse_php::ast::Decl;

  fn func(source: &str) -> FuncDecl {
    match parse_php::parse(source).unwrap().decls.remove(0) {
      Decl::Func(f) => f,
      Decl::Class(_) => panic!("expected function"),
    }
  }

  fn class(source: &str) -> ClassDecl {
    match parse_php::parse(source).unwrap().decls.remove(0) {
      Decl::Class(c) => c,
      Decl::Func(_) => panic!("expected class"),
    }
  }

  fn target(namespace: &str, class: &str, method: &str) -> FunctionTarget {
    FunctionTarget {
      namespace: namespace.to_owned(),
      class: class.to_owned(),
      method: method.to_owned(),
    }
  }

  #[test]
  fn groups_functions_in_first_encounter_order() {
    let mut consolidator = Consolidator::new();
    consolidator.add_function(&target("App", "Cache", "set"), func("<?php function cache_set() {}"));
    consolidator.add_function(&target("App", "Misc", "other"), func("<?php function other() {}"));
    consolidator.add_function(&target("App", "Cache", "get"), func("<?php function cache_get() {}"));
    let units = consolidator.finish(&MappingDocument::default());
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].class, "Cache");
    let set = units[0].source.find("function set").unwrap();
    let get = units[0].source.find("function get").unwrap();
    assert!(set < get, "first-encountered member must be emitted first");
    assert_eq!(units[1].class, "Misc");
  }

  #[test]
  fn rewrites_mapped_base_class() {
    let mut consolidator = Consolidator::new();
    let mut doc = MappingDocument::default();
    doc.classes.insert("WP_Widget".into(), ClassTarget {
      namespace: "App\\Widgets".into(),
      class: "Widget".into(),
    });
    consolidator.add_class(
      &ClassTarget {
        namespace: "App\\Widgets".into(),
        class: "FancyWidget".into(),
      },
      class("<?php class WP_Fancy_Widget extends WP_Widget {}"),
    );
    let units = consolidator.finish(&doc);
    assert!(units[0]
      .source
      .contains("class FancyWidget extends \\App\\Widgets\\Widget"));
  }

  #[test]
  fn leaves_unmapped_base_class_as_written() {
    let mut consolidator = Consolidator::new();
    consolidator.add_class(
      &ClassTarget {
        namespace: "App".into(),
        class: "Child".into(),
      },
      class("<?php class Child extends Vendor_Base {}"),
    );
    let units = consolidator.finish(&MappingDocument::default());
    assert!(units[0].source.contains("class Child extends Vendor_Base"));
  }

  #[test]
  fn derives_paths_from_namespaces() {
    assert_eq!(unit_path("App", "Misc"), PathBuf::from("Misc.php"));
    assert_eq!(
      unit_path("App\\Data\\Meta", "Query"),
      PathBuf::from("Data/Meta/Query.php")
    );
  }
}
