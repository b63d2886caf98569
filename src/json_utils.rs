use serde::de::DeserializeOwned;
use tracing::debug;

/// Extract the first deserializable JSON object embedded in free-form text.
///
/// Generative models rarely return bare JSON: the object is usually wrapped in
/// prose or a markdown code fence. This scans for balanced `{...}` structures
/// (string- and escape-aware, so braces inside string literals don't confuse
/// the bracket matching) and tries to deserialize each top-level candidate in
/// discovery order.
pub fn extract_embedded<T: DeserializeOwned>(text: &str) -> Option<T> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
            } else {
                match b {
                    b'\\' => escape = true,
                    b'"' => in_string = false,
                    _ => {}
                }
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start.take() {
                            let candidate = &text[s..=i];
                            if let Ok(parsed) = serde_json::from_str::<T>(candidate) {
                                debug!(target = "learning_pal::json", start = s, end = i, "extracted embedded object");
                                return Some(parsed);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}
