use crate::store::Values;

/// ConfigSource is the read side shared by a single [`Store`](crate::Store)
/// and the layered [`Config`](crate::Config).
///
/// Keys are compared case-sensitively after trimming surrounding whitespace.
/// An empty key never matches.
pub trait ConfigSource {
    /// Value of the last occurrence of `key`, or None if the key is absent.
    fn last(&self, key: &str) -> Option<&str>;

    /// Every value of `key` in file order. Empty if the key is absent.
    fn values(&self, key: &str) -> Values<'_>;

    /// Distinct keys in order of first appearance.
    fn keys(&self) -> Vec<&str>;

    fn contains(&self, key: &str) -> bool {
        self.last(key).is_some()
    }
}
