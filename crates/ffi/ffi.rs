//! C ABI over the EVM tracer.
//!
//! Every string handed out by this library is owned by the caller and must be
//! released with [`FreeString`], never with the host allocator's `free`.

use std::ffi::{CStr, c_char};

use tracing::{debug, warn};

mod bridge;
mod owned;
mod status;

pub use bridge::{BridgeError, create_trace, create_trace_with};
pub use owned::OwnedTraceString;
pub use status::TraceStatus;

/// Traces the JSON configuration behind `config` and returns either the
/// pretty-printed execution results or an error message.
///
/// The returned pointer is never null and must be released with
/// [`FreeString`].
///
/// # Safety
///
/// `config` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CreateTrace(config: *const c_char) -> *mut c_char {
    // SAFETY: forwarded from the caller's contract.
    let (_, output) = unsafe { trace_c_config(config) };
    output.into_raw()
}

/// Like [`CreateTrace`], reporting the outcome as a [`TraceStatus`]. On
/// every status except [`TraceStatus::NullOutput`], `*out` receives a string
/// that must be released with [`FreeString`].
///
/// # Safety
///
/// `config` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call. `out` must be null or valid for a
/// pointer-sized write.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CreateTraceWithStatus(
    config: *const c_char,
    out: *mut *mut c_char,
) -> TraceStatus {
    if out.is_null() {
        warn!("CreateTraceWithStatus called with a null output pointer");
        return TraceStatus::NullOutput;
    }
    // SAFETY: forwarded from the caller's contract.
    let (status, output) = unsafe { trace_c_config(config) };
    // SAFETY: `out` is non-null and the caller guarantees it is writable.
    unsafe { out.write(output.into_raw()) };
    status
}

/// Releases a string returned by [`CreateTrace`] or [`CreateTraceWithStatus`].
/// A null pointer is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by this library that has not
/// been freed yet. Passing any other pointer, or freeing twice, is undefined
/// behavior.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn FreeString(ptr: *mut c_char) {
    // SAFETY: forwarded from the caller's contract.
    drop(unsafe { OwnedTraceString::from_raw(ptr) });
}

/// # Safety
///
/// Same contract on `config` as [`CreateTrace`].
unsafe fn trace_c_config(config: *const c_char) -> (TraceStatus, OwnedTraceString) {
    // SAFETY: forwarded from the caller's contract.
    let result = unsafe { read_config(config) }.and_then(create_trace);
    match result {
        Ok(json) => {
            debug!(bytes = json.len(), "Trace completed");
            (TraceStatus::Ok, json.into())
        }
        Err(err) => {
            warn!(%err, "Trace request failed");
            (err.status(), err.to_string().into())
        }
    }
}

/// # Safety
///
/// Same contract on `config` as [`CreateTrace`].
unsafe fn read_config<'a>(config: *const c_char) -> Result<&'a str, BridgeError> {
    if config.is_null() {
        return Err(BridgeError::InvalidInput("config pointer is null".to_string()));
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(config) }
        .to_str()
        .map_err(|err| BridgeError::InvalidInput(err.to_string()))
}
