//! Aggregators for the synchronous two-track algebra.
//!
//! `Result` already provides `Ok`/`Err`, `map`, `and_then` and `map_err`, and
//! `match` is the only way to take both branches. Reading the wrong track goes
//! through `unwrap`/`unwrap_err`, which panic. This module adds the pieces
//! `std` does not have: ordered aggregation and optional-value bridging.

/// Collects a sequence of results into one.
///
/// Succeeds with the unwrapped values in their original order iff every
/// element succeeds. Otherwise returns the error of the first failing element,
/// scanning left to right. Elements after the first failure are not evaluated
/// when the input is a lazy iterator.
pub fn collect<T, E, I>(results: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    results.into_iter().collect()
}

/// Named-field variant of [`collect`].
///
/// Fields are enumerated in the order they are given (declaration order). The
/// first failing field's error is returned unchanged.
pub fn collect_fields<K, V, E, I>(named: I) -> Result<Fields<V>, E>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Result<V, E>)>,
{
    let entries = named
        .into_iter()
        .map(|(name, result)| result.map(|value| (name.into(), value)))
        .collect::<Result<Vec<_>, E>>()?;
    Ok(Fields { entries })
}

/// Bridges an optional value into the algebra.
pub fn from_nullable<T, E>(value: Option<T>, error_if_absent: E) -> Result<T, E> {
    value.ok_or(error_if_absent)
}

/// Joins two results into a pair.
///
/// If both fail, the error of `a` wins.
pub fn combine_two<A, B, E>(a: Result<A, E>, b: Result<B, E>) -> Result<(A, B), E> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(err), _) => Err(err),
        (Ok(_), Err(err)) => Err(err),
    }
}

/// Ordered name-to-value mapping produced by [`collect_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<V> {
    entries: Vec<(String, V)>,
}

impl<V> Fields<V> {
    /// Value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the first field named `name`.
    pub fn take(&mut self, name: &str) -> Option<V> {
        let index = self.entries.iter().position(|(field, _)| field == name)?;
        Some(self.entries.remove(index).1)
    }
}

impl<V> IntoIterator for Fields<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
