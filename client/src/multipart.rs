//! `multipart/form-data` encoding for the xhr transport.
//!
//! The fetch transport delegates to reqwest's form support; the blocking
//! client has none, so the body is assembled here with a random boundary.

use uuid::Uuid;

/// An encoded form body and the `Content-Type` that describes it.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn encode(fields: &[(String, String)]) -> MultipartBody {
    let boundary = format!("----apiprobe{}", Uuid::new_v4().simple());

    let mut bytes = Vec::new();
    for (name, value) in fields {
        bytes.extend_from_slice(b"--");
        bytes.extend_from_slice(boundary.as_bytes());
        bytes.extend_from_slice(b"\r\nContent-Disposition: form-data; name=\"");
        bytes.extend_from_slice(escape_name(name).as_bytes());
        bytes.extend_from_slice(b"\"\r\n\r\n");
        bytes.extend_from_slice(value.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(b"--");
    bytes.extend_from_slice(boundary.as_bytes());
    bytes.extend_from_slice(b"--\r\n");

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={boundary}"),
        bytes,
    }
}

// Field names are quoted; quotes and line breaks are percent-escaped the way
// browsers do it.
fn escape_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn encodes_fields_in_order() {
        let body = encode(&fields(&[("a", "1"), ("b", "two words")]));
        let boundary = body
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
            .to_string();
        let text = String::from_utf8(body.bytes).unwrap();
        assert_eq!(
            text,
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
                 --{boundary}\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\ntwo words\r\n\
                 --{boundary}--\r\n"
            )
        );
    }

    #[test]
    fn empty_form_is_just_the_closing_boundary() {
        let body = encode(&[]);
        let boundary = body
            .content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
            .to_string();
        assert!(boundary.starts_with("----apiprobe"));
        let text = String::from_utf8(body.bytes).unwrap();
        assert_eq!(text, format!("--{boundary}--\r\n"));
    }

    #[test]
    fn boundaries_differ_between_calls() {
        assert_ne!(encode(&[]).content_type, encode(&[]).content_type);
    }

    #[test]
    fn names_are_escaped() {
        let body = encode(&fields(&[("a\"b\r\nc", "v")]));
        let text = String::from_utf8(body.bytes).unwrap();
        assert!(text.contains("name=\"a%22b%0D%0Ac\""));
    }
}
