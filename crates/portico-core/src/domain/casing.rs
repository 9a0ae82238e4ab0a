//! String case conversion used to derive Go identifiers, environment
//! variable names and template placeholders.
//!
//! ## Word boundaries
//!
//! 1. **Explicit separators:** `_`, `-`, `.`, whitespace → always split
//! 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
//! 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
//!
//! | Input            | camel           | pascal          | screaming         |
//! |------------------|-----------------|-----------------|-------------------|
//! | `billing`        | `billing`       | `Billing`       | `BILLING`         |
//! | `user-profiles`  | `userProfiles`  | `UserProfiles`  | `USER_PROFILES`   |
//! | `HTTPServer`     | `httpServer`    | `HttpServer`    | `HTTP_SERVER`     |

/// Convert to snake_case.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert to SCREAMING_SNAKE_CASE.
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Convert to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words based on casing and separators.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
