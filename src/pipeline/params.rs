//! Operator parameter values.
//!
//! Parameter bags are heterogeneous per operator, but the values themselves
//! form a closed set of shapes. Modeling them as a tagged union (rather than
//! raw JSON) gives exhaustive matching when a new value kind is added, while
//! the untagged serde representation keeps the persisted form identical to
//! what the config forms produce: scalars, `[min, max]` arrays, string
//! arrays, and `{filename, data}` image objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An uploaded image: original filename plus base64-encoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub filename: String,
    pub data: String,
}

/// One configured parameter value.
///
/// Deserialization tries the variants in declaration order, so `Range`
/// (a two-element array of optional integers) must come before `List`
/// to claim `[1880, 1900]` and `[null, 1900]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Range(Option<i64>, Option<i64>),
    List(Vec<String>),
    Image(ImageUpload),
}

/// A named bag of parameter values, as stored on an operator instance.
pub type ParamBag = BTreeMap<String, ParamValue>;

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value as f64; integers coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Non-negative count; whole floats coerce, as config sliders
    /// routinely hand back `15.0` for `15`.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Integer(i) if *i >= 0 => Some(*i as usize),
            Self::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as usize),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(Option<i64>, Option<i64>)> {
        match self {
            Self::Range(from, to) => Some((*from, *to)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageUpload> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Whether the value counts as "not filled in" for readiness checks:
    /// blank text, an empty list, a fully open range, or an image without
    /// data.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Range(None, None) => true,
            Self::Image(image) => image.data.is_empty(),
            _ => false,
        }
    }
}

/// Trimmed text parameter, empty string when absent or non-text.
pub fn text_param<'a>(bag: &'a ParamBag, name: &str) -> &'a str {
    bag.get(name)
        .and_then(ParamValue::as_str)
        .map(str::trim)
        .unwrap_or("")
}

/// Count parameter with a default for absent or malformed values.
pub fn count_param(bag: &ParamBag, name: &str, default: usize) -> usize {
    bag.get(name)
        .and_then(ParamValue::as_usize)
        .unwrap_or(default)
}

/// Float parameter with a default for absent or malformed values.
pub fn float_param(bag: &ParamBag, name: &str, default: f64) -> f64 {
    bag.get(name).and_then(ParamValue::as_f64).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_round_trip() {
        for (value, json) in [
            (ParamValue::Integer(15), "15"),
            (ParamValue::Float(0.7), "0.7"),
            (ParamValue::Text("portrait".to_string()), "\"portrait\""),
        ] {
            assert_eq!(serde_json::to_string(&value).unwrap(), json);
            assert_eq!(serde_json::from_str::<ParamValue>(json).unwrap(), value);
        }
    }

    #[test]
    fn range_round_trips_with_open_ends() {
        let value = ParamValue::Range(None, Some(1900));
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "[null,1900]");
        assert_eq!(serde_json::from_str::<ParamValue>(&json).unwrap(), value);
    }

    #[test]
    fn integer_pair_parses_as_range_not_list() {
        let value: ParamValue = serde_json::from_str("[1880,1900]").unwrap();
        assert_eq!(value, ParamValue::Range(Some(1880), Some(1900)));
    }

    #[test]
    fn string_array_parses_as_list() {
        let value: ParamValue = serde_json::from_str("[\"KMSKA\",\"Other\"]").unwrap();
        assert_eq!(
            value,
            ParamValue::List(vec!["KMSKA".to_string(), "Other".to_string()])
        );
    }

    #[test]
    fn empty_array_parses_as_empty_list() {
        let value: ParamValue = serde_json::from_str("[]").unwrap();
        assert_eq!(value, ParamValue::List(vec![]));
    }

    #[test]
    fn image_object_round_trips() {
        let json = "{\"filename\":\"query.jpg\",\"data\":\"QUJD\"}";
        let value: ParamValue = serde_json::from_str(json).unwrap();
        let image = value.as_image().unwrap();
        assert_eq!(image.filename, "query.jpg");
        assert_eq!(serde_json::to_value(&value).unwrap()["data"], "QUJD");
    }

    #[test]
    fn whole_floats_coerce_to_counts() {
        assert_eq!(ParamValue::Float(15.0).as_usize(), Some(15));
        assert_eq!(ParamValue::Float(15.5).as_usize(), None);
        assert_eq!(ParamValue::Integer(-3).as_usize(), None);
    }

    #[test]
    fn blankness_matches_readiness_semantics() {
        assert!(ParamValue::Text("  ".to_string()).is_blank());
        assert!(ParamValue::List(vec![]).is_blank());
        assert!(ParamValue::Range(None, None).is_blank());
        assert!(!ParamValue::Range(Some(1880), None).is_blank());
        assert!(!ParamValue::Integer(0).is_blank());
    }

    #[test]
    fn bag_helpers_apply_defaults() {
        let mut bag = ParamBag::new();
        bag.insert(
            "query_text".to_string(),
            ParamValue::Text("  dark dramatic painting ".to_string()),
        );
        assert_eq!(text_param(&bag, "query_text"), "dark dramatic painting");
        assert_eq!(text_param(&bag, "missing"), "");
        assert_eq!(count_param(&bag, "n_results", 100), 100);
        assert_eq!(float_param(&bag, "similarity_min", 0.0), 0.0);
    }
}
