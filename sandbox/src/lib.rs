//! Fail-safe execution of user-authored transform functions.
//!
//! # Overview
//! A transform is JavaScript source, either a bare statement list or the
//! wrapped form `function transformData(data) { ... }`. `validate` reports
//! whether it compiles; `execute` runs it against JSON data and returns the
//! result, or the input unchanged if anything goes wrong.
//!
//! # Design
//! - The body is compiled by the engine's own `Function` constructor with a
//!   single parameter named `data`, so parameter and body are parsed
//!   separately and the body cannot close the function early.
//! - Every call gets a fresh engine `Context`: nothing compiled or assigned
//!   by one transform is visible to the next, and no host bindings are
//!   exposed beyond the engine's standard globals. This is still arbitrary
//!   code execution; only accept transforms from trusted input.
//! - Loop iterations and recursion depth are capped by `SandboxLimits`.
//!   Hitting a cap is a runtime error like any other.
//! - Errors are values (`TransformError`) internally. The public `execute`
//!   and `validate` never fail; they log and degrade.

mod extract;

use std::panic::{catch_unwind, AssertUnwindSafe};

use boa_engine::{js_string, Context, JsObject, JsString, JsValue};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

pub use extract::{extract_body, FUNCTION_PREFIX, FUNCTION_SUFFIX};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("transform source is empty")]
    Empty,

    #[error("transform failed to compile: {0}")]
    Syntax(String),

    #[error("transform threw: {0}")]
    Runtime(String),

    #[error("transform input is not representable: {0}")]
    Input(String),

    #[error("transform result is not representable as JSON: {0}")]
    Output(String),

    #[error("transform engine panicked")]
    Panic,
}

/// Engine limits applied to every transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxLimits {
    pub loop_iteration_limit: u64,
    pub recursion_limit: usize,
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            loop_iteration_limit: 10_000_000,
            recursion_limit: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sandbox {
    limits: SandboxLimits,
}

impl Sandbox {
    pub fn new(limits: SandboxLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SandboxLimits {
        self.limits
    }

    /// `true` when `source` is non-empty and its body compiles. Nothing is
    /// executed.
    pub fn validate(&self, source: &str) -> bool {
        match self.check(source) {
            Ok(()) => true,
            Err(TransformError::Empty) => false,
            Err(e) => {
                error!(error = %e, "invalid transform function");
                false
            }
        }
    }

    /// Compile `source` without running it.
    pub fn check(&self, source: &str) -> Result<(), TransformError> {
        if source.is_empty() {
            return Err(TransformError::Empty);
        }
        guarded(|| {
            let mut context = self.context();
            compile(extract_body(source), &mut context).map(|_| ())
        })
    }

    /// Run `source` against `data`. Empty source, compile errors, thrown
    /// exceptions and unrepresentable results all return `data` unchanged.
    pub fn execute(&self, source: &str, data: Value) -> Value {
        if source.is_empty() {
            return data;
        }
        match self.try_execute(source, &data) {
            Ok(transformed) => transformed,
            Err(e) => {
                error!(error = %e, "transform execution failed, returning input unchanged");
                data
            }
        }
    }

    /// Like `execute` but reports why a transform did not produce a value.
    ///
    /// A transform that returns nothing (`undefined`) yields `Value::Null`.
    pub fn try_execute(&self, source: &str, data: &Value) -> Result<Value, TransformError> {
        if source.is_empty() {
            return Err(TransformError::Empty);
        }
        guarded(|| {
            let mut context = self.context();
            let function = compile(extract_body(source), &mut context)?;

            let argument = JsValue::from_json(data, &mut context)
                .map_err(|e| TransformError::Input(e.to_string()))?;
            let result = function
                .call(&JsValue::undefined(), &[argument], &mut context)
                .map_err(|e| TransformError::Runtime(e.to_string()))?;

            if result.is_undefined() {
                return Ok(Value::Null);
            }
            result
                .to_json(&mut context)
                .map_err(|e| TransformError::Output(e.to_string()))
        })
    }

    fn context(&self) -> Context {
        let mut context = Context::default();
        let limits = context.runtime_limits_mut();
        limits.set_loop_iteration_limit(self.limits.loop_iteration_limit);
        limits.set_recursion_limit(self.limits.recursion_limit);
        context
    }
}

/// `new Function("data", body)` in `context`.
fn compile(body: &str, context: &mut Context) -> Result<JsObject, TransformError> {
    let constructor = context.intrinsics().constructors().function().constructor();
    constructor
        .construct(
            &[
                JsValue::from(js_string!("data")),
                JsValue::from(JsString::from(body)),
            ],
            None,
            context,
        )
        .map_err(|e| TransformError::Syntax(e.to_string()))
}

fn guarded<T>(f: impl FnOnce() -> Result<T, TransformError>) -> Result<T, TransformError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or(Err(TransformError::Panic))
}

/// `validate` with default limits.
pub fn validate(source: &str) -> bool {
    Sandbox::default().validate(source)
}

/// `execute` with default limits.
pub fn execute(source: &str, data: Value) -> Value {
    Sandbox::default().execute(source, data)
}
