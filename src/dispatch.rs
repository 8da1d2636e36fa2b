//! Callback-or-return dispatch at the edge of the pipeline.
//!
//! The pipeline itself only produces a value or an error. [`CallOptions`]
//! then decides whether a caller-supplied callback consumes the result
//! ([`Outcome::Handled`]) or whether it is handed back to the caller.

use crate::{metadata::Bypass, Error, Result};
use bytes::Bytes;
use std::fmt;

type Callback<T> = Box<dyn FnOnce(T) + Send>;

/// What a call resolved to after dispatch.
#[derive(Debug)]
pub enum Outcome<T> {
    /// A callback consumed the result.
    Handled,
    /// No callback matched; the value is returned.
    Value(T),
    /// No callback matched; the error is returned.
    Failed(Error),
}

impl<T> Outcome<T> {
    /// `Handled` becomes `Ok(None)`, `Value` becomes `Ok(Some(_))` and
    /// `Failed` becomes `Err`.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Outcome::Handled => Ok(None),
            Outcome::Value(value) => Ok(Some(value)),
            Outcome::Failed(error) => Err(error),
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled)
    }
}

/// Per-call behavior: interceptor bypass flags and optional callbacks.
///
/// # Examples
///
/// ```
/// use bshengine::{CallOptions, Envelope, Outcome};
/// use std::sync::mpsc;
///
/// let (tx, rx) = mpsc::channel();
/// let call = CallOptions::<Envelope>::new().on_success(move |envelope| {
///     tx.send(envelope.code).unwrap();
/// });
///
/// let outcome = call.dispatch(Ok(Envelope::default()));
/// assert!(outcome.is_handled());
/// assert_eq!(rx.recv().unwrap(), 200);
/// ```
pub struct CallOptions<T> {
    pub bypass: Bypass,
    on_success: Option<Callback<T>>,
    on_error: Option<Callback<Error>>,
}

impl<T> CallOptions<T> {
    pub fn new() -> Self {
        Self {
            bypass: Bypass::default(),
            on_success: None,
            on_error: None,
        }
    }

    /// Invoked with the value instead of returning it.
    pub fn on_success(mut self, callback: impl FnOnce(T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Invoked with a status error instead of returning it.
    pub fn on_error(mut self, callback: impl FnOnce(Error) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn bypass(mut self, bypass: Bypass) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn bypass_pre(mut self) -> Self {
        self.bypass.pre = true;
        self
    }

    pub fn bypass_post(mut self) -> Self {
        self.bypass.post = true;
        self
    }

    pub fn bypass_error(mut self) -> Self {
        self.bypass.error = true;
        self
    }

    pub fn has_on_success(&self) -> bool {
        self.on_success.is_some()
    }

    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }

    /// Routes `result` to the matching callback, if there is one.
    pub fn dispatch(self, result: Result<T>) -> Outcome<T> {
        match (result, self.on_success, self.on_error) {
            (Ok(value), Some(callback), _) => {
                callback(value);
                Outcome::Handled
            }
            (Ok(value), None, _) => Outcome::Value(value),
            (Err(error), _, Some(callback)) => {
                callback(error);
                Outcome::Handled
            }
            (Err(error), _, None) => Outcome::Failed(error),
        }
    }
}

impl CallOptions<Bytes> {
    /// Invoked with the downloaded body instead of returning it.
    pub fn on_download(self, callback: impl FnOnce(Bytes) + Send + 'static) -> Self {
        self.on_success(callback)
    }
}

impl<T> Default for CallOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Bypass> for CallOptions<T> {
    fn from(bypass: Bypass) -> Self {
        Self::new().bypass(bypass)
    }
}

impl<T> fmt::Debug for CallOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("bypass", &self.bypass)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
