//! C-ABI wrapper around the request executor and the transform sandbox.
//!
//! # Overview
//! Exposes request execution, transform validation and transform execution
//! through `extern "C"` functions, so a host UI written in any language with
//! a C FFI can drive the tool. Schemas, data and responses cross the boundary
//! as JSON C strings.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `apiprobe_execute` is blocking: it runs the async executor on a
//!   current-thread runtime owned by the call.
//! - A single `FfiExecuteResult` envelope conveys the response JSON or an
//!   error code and message.
//! - The C caller owns all returned pointers and must call the matching
//!   `apiprobe_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use apiprobe_client::Executor;
use apiprobe_core::RequestSchema;
use serde_json::Value;
use tracing::warn;

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point at a NUL-terminated string that outlives the
/// returned borrow.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Request execution
// ---------------------------------------------------------------------------

/// Execute the request described by `schema_json` and wait for the response.
///
/// `transport` is one of the `APIPROBE_TRANSPORT_*` selectors. Always returns
/// a non-null result; free it with `apiprobe_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_execute(
    schema_json: *const c_char,
    transport: i32,
) -> *mut FfiExecuteResult {
    catch_unwind(|| {
        if schema_json.is_null() {
            return FfiExecuteResult::null_arg("schema_json");
        }
        let Some(json) = (unsafe { borrow_str(schema_json) }) else {
            return FfiExecuteResult::invalid_schema("schema is not valid UTF-8".to_string());
        };
        let schema: RequestSchema = match serde_json::from_str(json) {
            Ok(schema) => schema,
            Err(e) => return FfiExecuteResult::invalid_schema(e.to_string()),
        };

        let executor = match Executor::from_env() {
            Ok(executor) => executor,
            Err(e) => return FfiExecuteResult::from_error(e),
        };
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "failed to start runtime");
                return FfiExecuteResult::panic("failed to start runtime");
            }
        };

        let kind = transport_from_c(transport).unwrap_or(executor.default_transport());
        match runtime.block_on(executor.execute_with(&schema, kind)) {
            Ok(response) => FfiExecuteResult::ok(&response),
            Err(e) => FfiExecuteResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiExecuteResult::panic("internal panic"))
}

/// The default request schema as JSON. Free with `apiprobe_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_default_schema() -> *mut c_char {
    catch_unwind(|| match serde_json::to_string(&RequestSchema::default()) {
        Ok(json) => into_c_string(json),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// `true` if `source` is a non-empty transform that compiles. Null is
/// invalid.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_transform_validate(source: *const c_char) -> bool {
    catch_unwind(|| match unsafe { borrow_str(source) } {
        Some(source) => apiprobe_sandbox::validate(source),
        None => false,
    })
    .unwrap_or(false)
}

/// Run the transform `source` against `data_json` and return the result as
/// JSON.
///
/// A null `source` counts as empty. If `data_json` does not parse, or the
/// transform fails, a copy of `data_json` is returned. Returns null only when
/// `data_json` is null. Free with `apiprobe_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_transform_execute(
    source: *const c_char,
    data_json: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        if data_json.is_null() {
            return std::ptr::null_mut();
        }
        let raw = unsafe { CStr::from_ptr(data_json) };
        let Some(data) = raw.to_str().ok().and_then(|s| serde_json::from_str::<Value>(s).ok())
        else {
            return CString::from(raw).into_raw();
        };
        let source = unsafe { borrow_str(source) }.unwrap_or("");

        let result = apiprobe_sandbox::execute(source, data);
        match serde_json::to_string(&result) {
            Ok(json) => into_c_string(json),
            Err(_) => CString::from(raw).into_raw(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiExecuteResult` and its strings. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_free_result(result: *mut FfiExecuteResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.response_json.is_null() {
            drop(unsafe { CString::from_raw(result.response_json) });
        }
    });
}

/// Free a string returned by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn apiprobe_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
