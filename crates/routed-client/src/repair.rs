//! Best-effort JSON repair for model output.
//!
//! Generative completions frequently wrap JSON in markdown fences, leave a
//! trailing comma, or get truncated mid-structure. `repair_json` fixes the
//! common cases; anything it cannot fix still fails the subsequent parse.

/// Remove markdown code fences around a completion.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Repair common JSON defects: leading/trailing prose, trailing commas,
/// unterminated strings, and unclosed braces/brackets.
///
/// The result is not guaranteed to parse; callers should attempt a strict
/// parse first and treat this as a fallback.
#[must_use]
pub fn repair_json(text: &str) -> String {
    let Some(start) = text.find(['{', '[']) else {
        return text.trim().to_string();
    };

    let mut out = String::with_capacity(text.len() - start);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text[start..].chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                stack.push('}');
                out.push(c);
            }
            '[' => {
                stack.push(']');
                out.push(c);
            }
            '}' | ']' => {
                trim_trailing_comma(&mut out);
                if stack.last() == Some(&c) {
                    stack.pop();
                    out.push(c);
                }
                if stack.is_empty() {
                    // End of the outermost value; drop trailing prose.
                    break;
                }
            }
            _ => out.push(c),
        }
    }

    if in_string {
        out.push('"');
    }
    trim_trailing_comma(&mut out);
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}

/// Drop a trailing comma (and any whitespace after it) from `out`.
fn trim_trailing_comma(out: &mut String) {
    out.truncate(out.trim_end().len());
    if out.ends_with(',') {
        out.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parses(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn strips_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn valid_json_passes_through() {
        let text = r#"{"stops": ["a", "b"], "keyword": "pizza"}"#;
        assert_eq!(parses(&repair_json(text)), parses(text));
    }

    #[test]
    fn removes_trailing_commas() {
        let repaired = repair_json(r#"{"stops": ["a", "b",], "n": 1,}"#);
        assert_eq!(parses(&repaired)["stops"][1], "b");
    }

    #[test]
    fn closes_truncated_structures() {
        let repaired = repair_json(r#"{"stops": ["a", "b""#);
        let value = parses(&repaired);
        assert_eq!(value["stops"][0], "a");
        assert_eq!(value["stops"][1], "b");
    }

    #[test]
    fn closes_unterminated_string() {
        let repaired = repair_json(r#"{"keyword": "piz"#);
        assert_eq!(parses(&repaired)["keyword"], "piz");
    }

    #[test]
    fn drops_surrounding_prose() {
        let repaired = repair_json("Here you go: {\"a\": 1} - enjoy!");
        assert_eq!(parses(&repaired)["a"], 1);
    }

    #[test]
    fn ignores_brackets_inside_strings() {
        let text = r#"{"note": "a } in a string"}"#;
        assert_eq!(parses(&repair_json(text)), parses(text));
    }
}
