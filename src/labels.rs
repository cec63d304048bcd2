//! Label encoding: gesture class names to stable integer codes.

use serde::{Deserialize, Serialize};

/// Bidirectional mapping between class names and zero-based codes.
///
/// Codes are assigned by sorting the distinct label strings, so the mapping
/// is a function of the label set alone and stable across builds that saw
/// the same classes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build an encoder from observed labels (duplicates welcome).
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Code for a class name, if the encoder has seen it.
    pub fn encode(&self, label: &str) -> Option<i32> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
            .map(|idx| idx as i32)
    }

    /// Class name for a code, if in range.
    pub fn decode(&self, code: i32) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }

    /// Sorted class names, index = code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_sorts_and_dedups() {
        let enc = LabelEncoder::fit(["thanks", "hello", "thanks", "hello", "yes"]);
        assert_eq!(enc.classes(), &["hello", "thanks", "yes"]);
        assert_eq!(enc.len(), 3);
    }

    #[test]
    fn encode_decode_round_trip() {
        let enc = LabelEncoder::fit(["b", "a", "c"]);
        for label in ["a", "b", "c"] {
            let code = enc.encode(label).unwrap();
            assert_eq!(enc.decode(code), Some(label));
        }
    }

    #[test]
    fn sorted_order_assignment() {
        let enc = LabelEncoder::fit(["thanks", "hello"]);
        assert_eq!(enc.encode("hello"), Some(0));
        assert_eq!(enc.encode("thanks"), Some(1));
    }

    #[test]
    fn unknown_label_and_out_of_range_code() {
        let enc = LabelEncoder::fit(["hello"]);
        assert_eq!(enc.encode("nope"), None);
        assert_eq!(enc.decode(1), None);
        assert_eq!(enc.decode(-1), None);
    }
}
