//! Target identity resolution. Assignment is monotonic: once a name has an
//! entry in the mapping document, the tool never reassigns it — only a human
//! editing the persisted document between runs changes an identity.

use crate::store::ClassTarget;
use crate::store::FunctionTarget;
use crate::store::MappingDocument;

/// Identities minted for symbols seen for the first time.
#[derive(Clone, Debug)]
pub struct Defaults {
  pub namespace: String,
  /// Single class that collects every not-yet-curated function.
  pub function_class: String,
}

/// Returns the function's target, minting and inserting the default identity
/// if the name has never been mapped.
pub fn resolve_function<'a>(
  doc: &'a mut MappingDocument,
  name: &str,
  defaults: &Defaults,
) -> &'a FunctionTarget {
  doc
    .functions
    .entry(name.to_owned())
    .or_insert_with(|| FunctionTarget {
      namespace: defaults.namespace.clone(),
      class: defaults.function_class.clone(),
      method: name.to_owned(),
    })
}

/// Returns the class's target, minting the default identity if unmapped.
/// Unlike functions, an unmapped class keeps its own name.
pub fn resolve_class<'a>(
  doc: &'a mut MappingDocument,
  name: &str,
  defaults: &Defaults,
) -> &'a ClassTarget {
  doc
    .classes
    .entry(name.to_owned())
    .or_insert_with(|| ClassTarget {
      namespace: defaults.namespace.clone(),
      class: name.to_owned(),
    })
}
