//! Aggregation over collections of outcomes.
//!
//! Two disciplines: [`combine`] short-circuits on the first failure,
//! [`partition`] always walks every element. Both preserve input order.

/// Successes and failures of a batch, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitioned<T, E> {
    /// Values of the successful elements.
    pub successes: Vec<T>,
    /// Errors of the failed elements.
    pub errors: Vec<E>,
}

impl<T, E> Partitioned<T, E> {
    /// True when no element failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Collapse a batch into `Ok` of all values iff every element succeeded.
///
/// Returns the first failure in iteration order immediately; elements after
/// it are not visited.
pub fn combine<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Result<Vec<T>, E> {
    let iter = results.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    for result in iter {
        values.push(result?);
    }
    Ok(values)
}

/// Bucket a batch by variant without short-circuiting.
pub fn partition<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Partitioned<T, E> {
    let mut partitioned = Partitioned {
        successes: Vec::new(),
        errors: Vec::new(),
    };
    for result in results {
        match result {
            Ok(value) => partitioned.successes.push(value),
            Err(err) => partitioned.errors.push(err),
        }
    }
    partitioned
}

/// The success bucket of [`partition`], discarding errors.
pub fn filter_successes<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Vec<T> {
    results.into_iter().filter_map(Result::ok).collect()
}

/// The error bucket of [`partition`], discarding values.
pub fn filter_failures<T, E>(results: impl IntoIterator<Item = Result<T, E>>) -> Vec<E> {
    results
        .into_iter()
        .filter_map(|result| result.err())
        .collect()
}
