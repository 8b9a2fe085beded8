/// A half-open byte range within a single source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn is_empty(&self) -> bool {
    self.1 <= self.0
  }

  /// The source text covered by this range.
  pub fn extract<'a>(&self, source: &'a str) -> &'a str {
    &source[self.0..self.1]
  }
}
