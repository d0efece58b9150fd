use std::future::{Future, IntoFuture};

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::outcome;

/// A deferred computation that resolves exactly once to a `Result`.
///
/// Nothing runs until the operation is awaited (or consumed with
/// [`Operation::fold`]). Chained steps run strictly in sequence; only
/// [`Operation::combine_two`] polls two operations concurrently. There is no
/// cancellation and no retry.
#[must_use = "operations do nothing unless awaited"]
pub struct Operation<'a, T, E> {
    future: BoxFuture<'a, Result<T, E>>,
}

impl<'a, T, E> Operation<'a, T, E>
where
    T: Send + 'a,
    E: Send + 'a,
{
    /// Runs a raw fallible future, mapping its failure reason into `E`.
    pub fn from_raw_async<F, R, M>(raw: F, reason_to_error: M) -> Self
    where
        F: Future<Output = Result<T, R>> + Send + 'a,
        M: FnOnce(R) -> E + Send + 'a,
    {
        Self {
            future: raw.map(|result| result.map_err(reason_to_error)).boxed(),
        }
    }

    pub fn from_result(result: Result<T, E>) -> Self {
        Self {
            future: future::ready(result).boxed(),
        }
    }

    pub fn from_value(value: T) -> Self {
        Self::from_result(Ok(value))
    }

    pub fn from_error(error: E) -> Self {
        Self::from_result(Err(error))
    }

    pub fn map<U, F>(self, map: F) -> Operation<'a, U, E>
    where
        U: Send + 'a,
        F: FnOnce(T) -> U + Send + 'a,
    {
        Operation {
            future: self.future.map(|result| result.map(map)).boxed(),
        }
    }

    pub fn map_err<G, F>(self, map: F) -> Operation<'a, T, G>
    where
        G: Send + 'a,
        F: FnOnce(E) -> G + Send + 'a,
    {
        Operation {
            future: self.future.map(|result| result.map_err(map)).boxed(),
        }
    }

    /// Chains a synchronous fallible step. `bind` is only called on success.
    pub fn bind<U, F>(self, bind: F) -> Operation<'a, U, E>
    where
        U: Send + 'a,
        F: FnOnce(T) -> Result<U, E> + Send + 'a,
    {
        Operation {
            future: self.future.map(|result| result.and_then(bind)).boxed(),
        }
    }

    /// Chains another asynchronous step.
    ///
    /// `bind` is not called, so its operation is not even built, until this
    /// operation has resolved successfully.
    pub fn bind_async<U, F>(self, bind: F) -> Operation<'a, U, E>
    where
        U: Send + 'a,
        F: FnOnce(T) -> Operation<'a, U, E> + Send + 'a,
    {
        Operation {
            future: async move {
                match self.future.await {
                    Ok(value) => bind(value).future.await,
                    Err(err) => Err(err),
                }
            }
            .boxed(),
        }
    }

    /// Polls `a` and `b` concurrently and joins their values.
    ///
    /// Both operands always run to completion. When both fail, `a`'s error is
    /// returned no matter which one resolved first.
    pub fn combine_two<U>(a: Self, b: Operation<'a, U, E>) -> Operation<'a, (T, U), E>
    where
        U: Send + 'a,
    {
        Operation {
            future: future::join(a.future, b.future)
                .map(|(a, b)| outcome::combine_two(a, b))
                .boxed(),
        }
    }

    /// Terminal consumer: resolves the operation and hands the outcome to
    /// exactly one of the two callbacks.
    pub async fn fold<R>(self, on_ok: impl FnOnce(T) -> R, on_err: impl FnOnce(E) -> R) -> R {
        match self.future.await {
            Ok(value) => on_ok(value),
            Err(err) => on_err(err),
        }
    }
}

impl<'a, T, E> IntoFuture for Operation<'a, T, E> {
    type Output = Result<T, E>;
    type IntoFuture = BoxFuture<'a, Result<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}
