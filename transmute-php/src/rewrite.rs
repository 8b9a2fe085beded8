//! Environment-specific text rewrites applied to a file before parsing.
//! These are deliberately dumb string operations — they exist to neutralize
//! host-environment constructs (absolute-path requires, branding strings)
//! and are not part of the remapping logic.

use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum Rule {
  /// Replace every occurrence of a literal substring.
  Replace { from: String, to: String },
  /// Replace, but only in files whose path contains the given substring.
  ReplaceIn {
    path_contains: String,
    from: String,
    to: String,
  },
  /// Prefix every regex match with `// `, commenting it out.
  CommentOut { pattern: Regex },
}

impl Rule {
  pub fn replace(from: impl Into<String>, to: impl Into<String>) -> Self {
    Rule::Replace {
      from: from.into(),
      to: to.into(),
    }
  }

  pub fn replace_in(
    path_contains: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
  ) -> Self {
    Rule::ReplaceIn {
      path_contains: path_contains.into(),
      from: from.into(),
      to: to.into(),
    }
  }

  pub fn comment_out(pattern: &str) -> Result<Self, regex::Error> {
    Ok(Rule::CommentOut {
      pattern: Regex::new(pattern)?,
    })
  }
}

/// An ordered list of prefilter rules.
#[derive(Debug, Clone, Default)]
pub struct Prefilter {
  rules: Vec<Rule>,
}

impl Prefilter {
  pub fn new(rules: Vec<Rule>) -> Self {
    Prefilter { rules }
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn apply(&self, path: &Path, code: &str) -> String {
    let path_text = path.to_string_lossy();
    let mut code = code.to_owned();
    for rule in &self.rules {
      match rule {
        Rule::Replace { from, to } => code = code.replace(from.as_str(), to),
        Rule::ReplaceIn {
          path_contains,
          from,
          to,
        } => {
          if path_text.contains(path_contains.as_str()) {
            code = code.replace(from.as_str(), to);
          }
        }
        Rule::CommentOut { pattern } => {
          code = pattern.replace_all(&code, "// $0").into_owned();
        }
      }
    }
    code
  }
}
