// src/engine/common.rs
//
// Panic containment for calls into codec and resampling libraries.

use crate::error::{ResizeError, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Run `f`, turning a panic into `ResizeError::InternalPanic`.
///
/// `label` names the operation in the error message and the log event.
pub fn run_with_panic_policy<T, F>(label: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            error!(operation = label, detail = %detail, "panic contained");
            Err(ResizeError::internal_panic(format!("{label}: {detail}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
