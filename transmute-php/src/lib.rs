//! Migrates a legacy PHP codebase of global functions and classes into a
//! namespaced, class-based API.
//!
//! The engine discovers every top-level declaration under a source root,
//! assigns each a stable target identity through a persistent mapping
//! document, consolidates declarations sharing a target class into
//! synthesized class files, archives mappings whose symbols have vanished,
//! and emits global forwarders plus class aliases so unmigrated call sites
//! keep working. Runs are idempotent over an unchanged tree, and an
//! identity, once assigned, is never reassigned by the tool itself.

pub mod builtins;
pub mod consolidate;
pub mod err;
pub mod extract;
pub mod pipeline;
pub mod reconcile;
pub mod resolve;
pub mod rewrite;
pub mod shim;
pub mod store;

pub use err::TransmuteError;
pub use err::TransmuteResult;
pub use pipeline::run;
pub use pipeline::Options;
pub use pipeline::Report;
