//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Schemas and responses cross the boundary as JSON C strings in the same
//! shape the UI layer already uses, so only the result envelope needs a C
//! layout. Conversion helpers live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use apiprobe_client::TransportKind;
use apiprobe_core::{ExecuteError, ResponseData};

/// Transport selectors accepted by `apiprobe_execute`. Any other value
/// means the configured default transport.
pub const APIPROBE_TRANSPORT_DEFAULT: i32 = -1;
pub const APIPROBE_TRANSPORT_FETCH: i32 = 0;
pub const APIPROBE_TRANSPORT_XHR: i32 = 1;

pub(crate) fn transport_from_c(transport: i32) -> Option<TransportKind> {
    match transport {
        APIPROBE_TRANSPORT_FETCH => Some(TransportKind::Fetch),
        APIPROBE_TRANSPORT_XHR => Some(TransportKind::Xhr),
        _ => None,
    }
}

/// Error codes returned in `FfiExecuteResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    RequestFailed = 1,
    InvalidSchema = 2,
    Config = 3,
    NullArg = 4,
    Panic = 5,
}

/// Result envelope for `apiprobe_execute`.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `response_json` holds the serialized `ResponseData`. On failure
/// `response_json` is null and `error_message` says what went wrong.
#[repr(C)]
pub struct FfiExecuteResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub response_json: *mut c_char,
}

/// Convert to an owned C string, or null if `s` contains a NUL byte.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

impl FfiExecuteResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: String,
        response_json: *mut c_char,
    ) -> *mut Self {
        let error_message = if error_message.is_empty() {
            std::ptr::null_mut()
        } else {
            into_c_string(error_message)
        };
        Box::into_raw(Box::new(FfiExecuteResult {
            error_code,
            error_message,
            response_json,
        }))
    }

    pub(crate) fn ok(response: &ResponseData) -> *mut Self {
        match serde_json::to_string(response) {
            Ok(json) => Self::boxed(FfiErrorCode::Ok, String::new(), into_c_string(json)),
            Err(e) => Self::boxed(FfiErrorCode::Panic, e.to_string(), std::ptr::null_mut()),
        }
    }

    pub(crate) fn from_error(err: ExecuteError) -> *mut Self {
        let code = match err {
            ExecuteError::RequestFailed => FfiErrorCode::RequestFailed,
            ExecuteError::Config(_) => FfiErrorCode::Config,
        };
        Self::boxed(code, err.to_string(), std::ptr::null_mut())
    }

    pub(crate) fn invalid_schema(msg: String) -> *mut Self {
        Self::boxed(FfiErrorCode::InvalidSchema, msg, std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            format!("null argument: {name}"),
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, msg.to_string(), std::ptr::null_mut())
    }
}
