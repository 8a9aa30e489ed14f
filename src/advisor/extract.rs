use serde::de::DeserializeOwned;

/// How to cut a JSON object out of surrounding prose.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum ObjectSpan {
    /// First `{` up to the next `}`; suits flat objects.
    Shortest,
    /// First `{` up to the last `}`; suits nested objects and arrays.
    Widest,
}

/// Parses model output as `T`, tolerating markdown fences and chatter.
pub(super) fn parse_lenient<T: DeserializeOwned>(text: &str, span: ObjectSpan) -> Option<T> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = match span {
        ObjectSpan::Shortest => start + text[start..].find('}')?,
        ObjectSpan::Widest => text.rfind('}')?,
    };
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: f64,
        b: f64,
    }

    #[test]
    fn parses_bare_json() {
        let pair: Pair = parse_lenient(r#" {"a": 1, "b": 2} "#, ObjectSpan::Shortest).expect("json");
        assert_eq!(pair, Pair { a: 1.0, b: 2.0 });
    }

    #[test]
    fn parses_json_inside_markdown_fence() {
        let text = "Here you go:\n```json\n{\"a\": 3, \"b\": 4}\n```\nEnjoy.";
        let pair: Pair = parse_lenient(text, ObjectSpan::Widest).expect("json");
        assert_eq!(pair, Pair { a: 3.0, b: 4.0 });
    }

    #[test]
    fn shortest_span_ignores_trailing_objects() {
        let text = r#"{"a": 1, "b": 2} and also {"a": 9}"#;
        let pair: Option<Pair> = parse_lenient(text, ObjectSpan::Shortest);
        assert_eq!(pair, Some(Pair { a: 1.0, b: 2.0 }));

        let pair: Option<Pair> = parse_lenient(text, ObjectSpan::Widest);
        assert_eq!(pair, None);
    }

    #[test]
    fn rejects_missing_fields_and_garbage() {
        let pair: Option<Pair> = parse_lenient(r#"{"a": 1}"#, ObjectSpan::Widest);
        assert_eq!(pair, None);
        let pair: Option<Pair> = parse_lenient("no json here", ObjectSpan::Widest);
        assert_eq!(pair, None);
        let pair: Option<Pair> = parse_lenient("} backwards {", ObjectSpan::Widest);
        assert_eq!(pair, None);
    }

    #[test]
    fn rejects_string_typed_numbers() {
        let pair: Option<Pair> = parse_lenient(r#"{"a": "1", "b": 2}"#, ObjectSpan::Shortest);
        assert_eq!(pair, None);
    }
}
