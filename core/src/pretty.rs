//! Two-space JSON pretty-printing with JavaScript number output.
//!
//! # Design
//! `serde_json`'s own formatter writes floats in Rust form (`1.0`, `100.0`,
//! `1e21` as digits). Response bodies are shown the way a browser's
//! `JSON.stringify(value, null, 2)` shows them, so numbers go through
//! `ecma_number`, the ECMAScript Number-to-String algorithm. Layout is left
//! to `PrettyFormatter`.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use serde_json::Value;

/// Largest integer an IEEE double represents exactly (2^53).
const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_992;

/// Render `value` with two-space indentation and JavaScript numbers.
pub fn to_pretty_string(value: &Value) -> Option<String> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut out, EcmaFormatter::default());
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(out).ok()
}

/// Format `value` as ECMAScript `Number.prototype.toString()` does.
pub fn ecma_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return "null".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.5e2`.
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.push_str(&"0".repeat((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat((-n) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let e = n - 1;
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.unsigned_abs().to_string());
    }
    out
}

#[derive(Default)]
struct EcmaFormatter {
    pretty: PrettyFormatter<'static>,
}

impl Formatter for EcmaFormatter {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(ecma_number(value).as_bytes())
    }

    fn write_u64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: u64) -> io::Result<()> {
        if value <= MAX_SAFE_INTEGER {
            write!(writer, "{value}")
        } else {
            writer.write_all(ecma_number(value as f64).as_bytes())
        }
    }

    fn write_i64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: i64) -> io::Result<()> {
        if value.unsigned_abs() <= MAX_SAFE_INTEGER {
            write!(writer, "{value}")
        } else {
            writer.write_all(ecma_number(value as f64).as_bytes())
        }
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(raw: &str) -> String {
        to_pretty_string(&serde_json::from_str(raw).unwrap()).unwrap()
    }

    #[test]
    fn whole_floats_drop_the_fraction() {
        assert_eq!(ecma_number(1.0), "1");
        assert_eq!(ecma_number(100.0), "100");
        assert_eq!(ecma_number(-42.0), "-42");
    }

    #[test]
    fn fractions_use_shortest_digits() {
        assert_eq!(ecma_number(1.5), "1.5");
        assert_eq!(ecma_number(0.1), "0.1");
        assert_eq!(ecma_number(-2.25), "-2.25");
        assert_eq!(ecma_number(123.456), "123.456");
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(ecma_number(-0.0), "0");
    }

    #[test]
    fn exponent_thresholds() {
        assert_eq!(ecma_number(1e20), "100000000000000000000");
        assert_eq!(ecma_number(1e21), "1e+21");
        assert_eq!(ecma_number(1.5e300), "1.5e+300");
        assert_eq!(ecma_number(0.000001), "0.000001");
        assert_eq!(ecma_number(1e-7), "1e-7");
        assert_eq!(ecma_number(1.23e-18), "1.23e-18");
    }

    #[test]
    fn pretty_output_matches_stringify() {
        assert_eq!(
            pretty(r#"{"a":1.0,"b":1e2,"c":[1.5,-0.0],"d":{},"e":[]}"#),
            "{\n  \"a\": 1,\n  \"b\": 100,\n  \"c\": [\n    1.5,\n    0\n  ],\n  \"d\": {},\n  \"e\": []\n}"
        );
    }

    #[test]
    fn unsafe_integers_lose_precision_like_doubles() {
        assert_eq!(pretty("9007199254740992"), "9007199254740992");
        assert_eq!(pretty("9007199254740993"), "9007199254740992");
        assert_eq!(pretty("18446744073709551615"), "18446744073709552000");
        assert_eq!(pretty("-9223372036854775808"), "-9223372036854776000");
        assert_eq!(pretty("100000000000000000000000"), "1e+23");
    }
}
