//! Small sequence helpers used by the search combinators.

/// Wraps one item into a one-element sequence.
pub fn singleton<T>(item: T) -> Vec<T> {
    vec![item]
}

/// Concatenates groups in order. An empty input yields an empty sequence.
pub fn flatten<T>(groups: impl IntoIterator<Item = Vec<T>>) -> Vec<T> {
    groups.into_iter().flatten().collect()
}
