//! The persistent mapping document: which global name maps to which
//! namespace/class/method, plus the archive of mappings whose symbols have
//! disappeared from the codebase.
//!
//! Entries already present in the document are authoritative — they may have
//! been hand-edited between runs — so discovery only ever adds entries (see
//! [`crate::resolve`]) and absence is the only thing that moves one (see
//! [`crate::reconcile`]).

use crate::err::TransmuteError;
use crate::err::TransmuteResult;
use ahash::HashMap;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use serde_yaml::value::Value;
use serde_yaml::Mapping;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTarget {
  pub namespace: String,
  pub class: String,
  pub method: String,
}

impl FunctionTarget {
  /// `Namespace\Class`, the class that hosts the transmuted method.
  pub fn qualified_class(&self) -> String {
    format!("{}\\{}", self.namespace, self.class)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTarget {
  pub namespace: String,
  pub class: String,
}

impl ClassTarget {
  pub fn qualified(&self) -> String {
    format!("{}\\{}", self.namespace, self.class)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedFunction {
  pub namespace: String,
  pub class: String,
  pub method: String,
  /// Human-readable removal date, e.g. `Aug 7th 2026`.
  pub removed: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedClass {
  pub namespace: String,
  pub class: String,
  pub removed: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OutdatedTables {
  #[serde(default)]
  pub functions: HashMap<String, OutdatedFunction>,
  #[serde(default)]
  pub classes: HashMap<String, OutdatedClass>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MappingDocument {
  #[serde(default)]
  pub functions: HashMap<String, FunctionTarget>,
  #[serde(default)]
  pub classes: HashMap<String, ClassTarget>,
  #[serde(default)]
  pub outdated: OutdatedTables,
}

impl MappingDocument {
  /// Loads the document, treating a missing or empty file as empty tables.
  pub fn load(path: &Path) -> TransmuteResult<Self> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(err) => return Err(TransmuteError::read(path, err)),
    };
    if text.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(&text).map_err(|source| TransmuteError::document(path, source))
  }

  /// Persists the full document. Serialization order is fixed so repeated
  /// runs over an unchanged tree produce byte-identical files: function
  /// mappings by (namespace, class, method), everything else by source name.
  pub fn save(&self, path: &Path) -> TransmuteResult<()> {
    let text = self
      .to_yaml_string()
      .map_err(|source| TransmuteError::document(path, source))?;
    fs::write(path, text).map_err(|source| TransmuteError::write(path, source))
  }

  pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
    let mut root = Mapping::new();
    root.insert(
      "functions".into(),
      entries_to_yaml(self.sorted_functions())?,
    );
    root.insert("classes".into(), entries_to_yaml(self.sorted_classes())?);
    let mut outdated = Mapping::new();
    outdated.insert(
      "functions".into(),
      entries_to_yaml(sorted_by_name(&self.outdated.functions))?,
    );
    outdated.insert(
      "classes".into(),
      entries_to_yaml(sorted_by_name(&self.outdated.classes))?,
    );
    root.insert("outdated".into(), Value::Mapping(outdated));
    serde_yaml::to_string(&Value::Mapping(root))
  }

  /// Live function mappings ordered by (namespace, class, method), with the
  /// source name as a tiebreak for deliberate many-to-one merges.
  pub fn sorted_functions(&self) -> Vec<(&str, &FunctionTarget)> {
    self
      .functions
      .iter()
      .map(|(name, target)| (name.as_str(), target))
      .sorted_by(|(a_name, a), (b_name, b)| {
        (&a.namespace, &a.class, &a.method, a_name).cmp(&(&b.namespace, &b.class, &b.method, b_name))
      })
      .collect()
  }

  /// Live class mappings ordered by source name.
  pub fn sorted_classes(&self) -> Vec<(&str, &ClassTarget)> {
    self
      .classes
      .iter()
      .map(|(name, target)| (name.as_str(), target))
      .sorted_by(|(a, _), (b, _)| a.cmp(b))
      .collect()
  }
}

fn sorted_by_name<T>(table: &HashMap<String, T>) -> Vec<(&str, &T)> {
  table
    .iter()
    .map(|(name, entry)| (name.as_str(), entry))
    .sorted_by(|(a, _), (b, _)| a.cmp(b))
    .collect()
}

fn entries_to_yaml<T: Serialize>(entries: Vec<(&str, &T)>) -> Result<Value, serde_yaml::Error> {
  let mut map = Mapping::new();
  for (name, entry) in entries {
    map.insert(Value::String(name.to_owned()), serde_yaml::to_value(entry)?);
  }
  Ok(Value::Mapping(map))
}
