//! Unwrapping of the `function transformData(data) { ... }` form.

pub const FUNCTION_PREFIX: &str = "function transformData(data) {";
pub const FUNCTION_SUFFIX: &str = "}";

/// The function body to compile.
///
/// Input that starts with `FUNCTION_PREFIX` and ends with `FUNCTION_SUFFIX`
/// has both sliced off and the remainder trimmed. Braces in between are not
/// matched. Anything else is already a body and is returned unchanged.
pub fn extract_body(source: &str) -> &str {
    match source
        .strip_prefix(FUNCTION_PREFIX)
        .and_then(|rest| rest.strip_suffix(FUNCTION_SUFFIX))
    {
        Some(body) => body.trim(),
        None => source,
    }
}
