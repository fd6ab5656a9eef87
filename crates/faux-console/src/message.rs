//! Message payloads accepted by the console

use serde::Serialize;

/// Text shown for values that cannot be serialized
pub const UNSERIALIZABLE_PLACEHOLDER: &str = "[-object-]";

/// A value handed to `log`, `warn` or `error`
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Number(f64),
    Boolean(bool),
    Structured(serde_json::Value),
    /// A value whose serialization failed
    Unserializable,
}

impl Message {
    /// Capture any serializable value; failures become [`Message::Unserializable`]
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Message::Structured(value),
            Err(e) => {
                log::debug!("Message serialization failed: {}", e);
                Message::Unserializable
            }
        }
    }

    /// Coerce the payload to the text that gets rendered
    pub fn to_text(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Number(number) => format_number(*number),
            Message::Boolean(true) => "true".to_string(),
            Message::Boolean(false) => "false".to_string(),
            Message::Structured(value) => {
                pretty_json(value).unwrap_or_else(|| UNSERIALIZABLE_PLACEHOLDER.to_string())
            }
            Message::Unserializable => UNSERIALIZABLE_PLACEHOLDER.to_string(),
        }
    }
}

/// Format a number the way a JavaScript host would print it
///
/// Magnitudes below `1e-6` or from `1e21` up use exponent notation with an
/// explicit sign (`1e+21`, `1.5e-7`); everything else is plain decimal.
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number == f64::INFINITY {
        "Infinity".to_string()
    } else if number == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if number == 0.0 {
        "0".to_string()
    } else if number.abs() >= 1e21 || number.abs() < 1e-6 {
        let exponent_form = format!("{:e}", number);
        match exponent_form.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exponent_form,
        }
    } else {
        number.to_string()
    }
}

/// Rewrite integral floats as integers so `1.0` prints as `1`
fn integral_numbers(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    // Integers above 2^53 are not exact in an f64
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    match value {
        Value::Number(number) => match number.as_f64() {
            Some(f) if number.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), integral_numbers(item)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn pretty_json(value: &serde_json::Value) -> Option<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    integral_numbers(value).serialize(&mut serializer).ok()?;
    String::from_utf8(out).ok()
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Text(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Text(value.to_string())
    }
}

impl From<&String> for Message {
    fn from(value: &String) -> Self {
        Message::Text(value.clone())
    }
}

impl From<bool> for Message {
    fn from(value: bool) -> Self {
        Message::Boolean(value)
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Message::Structured(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Message {
                fn from(value: $ty) -> Self {
                    Message::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f64);

impl From<f32> for Message {
    /// Goes through the shortest decimal form, so `0.1f32` stays `0.1`
    fn from(value: f32) -> Self {
        Message::Number(value.to_string().parse().unwrap_or(value as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use serde_json::json;

    struct Circular;

    impl Serialize for Circular {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cyclic structure"))
        }
    }

    #[test]
    fn test_text_passthrough() {
        assert_eq!(Message::from("a").to_text(), "a");
        assert_eq!(Message::from(String::from("")).to_text(), "");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Message::from(42).to_text(), "42");
        assert_eq!(Message::from(-7i64).to_text(), "-7");
        assert_eq!(Message::from(1.5).to_text(), "1.5");
        assert_eq!(Message::from(2.0f64).to_text(), "2");
        assert_eq!(Message::from(-0.0f64).to_text(), "0");
        assert_eq!(Message::from(f64::NAN).to_text(), "NaN");
        assert_eq!(Message::from(f64::INFINITY).to_text(), "Infinity");
        assert_eq!(Message::from(f64::NEG_INFINITY).to_text(), "-Infinity");
    }

    #[test]
    fn test_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_f32_keeps_its_short_form() {
        assert_eq!(Message::from(0.1f32).to_text(), "0.1");
        assert_eq!(Message::from(3.0f32).to_text(), "3");
    }

    #[test]
    fn test_structured_integral_floats() {
        assert_eq!(Message::from(json!(1.0)).to_text(), "1");

        let text = Message::from(json!([2.0, 2.5])).to_text();
        assert_eq!(text, "[\n\t2,\n\t2.5\n]");

        let text = Message::from(json!({"x": -4.0})).to_text();
        assert_eq!(text, "{\n\t\"x\": -4\n}");
    }

    #[test]
    fn test_booleans() {
        assert_eq!(Message::from(true).to_text(), "true");
        assert_eq!(Message::from(false).to_text(), "false");
    }

    #[test]
    fn test_structured_uses_tab_indent() {
        let text = Message::from(json!({"a": 1})).to_text();
        assert_eq!(text, "{\n\t\"a\": 1\n}");

        let text = Message::structured(&vec![1, 2]).to_text();
        assert_eq!(text, "[\n\t1,\n\t2\n]");
    }

    #[test]
    fn test_unserializable_gets_placeholder() {
        let message = Message::structured(&Circular);
        assert_eq!(message, Message::Unserializable);
        assert_eq!(message.to_text(), UNSERIALIZABLE_PLACEHOLDER);
    }

    #[test]
    fn test_every_kind_produces_text() {
        let messages = [
            Message::from("text"),
            Message::from(3),
            Message::from(false),
            Message::from(json!({"nested": {"list": [1, "two", null]}})),
            Message::from(json!([])),
            Message::structured(&Circular),
        ];

        for message in messages {
            assert!(!message.to_text().is_empty(), "{:?}", message);
        }
    }
}
