//! String field rules.

/// Trims and collapses runs of whitespace to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first letter of each word and lower-cases the rest.
///
/// An apostrophe does not start a new word (`o'brien` → `O'brien`).
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && c == '\'';
        }
    }
    out
}

/// Identifiers are only trimmed; their content is validated during coercion.
pub fn normalize_identifier(value: &str) -> String {
    value.trim().to_string()
}

/// Free text such as titles: whitespace collapsed, case preserved.
pub fn normalize_text(value: &str) -> String {
    collapse_whitespace(value)
}

pub fn normalize_person_name(value: &str) -> String {
    title_case(&collapse_whitespace(value))
}

/// Emails lose all whitespace and are lower-cased.
pub fn normalize_email(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(collapse_whitespace("  The   Long\tShelf "), "The Long Shelf");
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("jANE doe-smith"), "Jane Doe-Smith");
        assert_eq!(title_case("o'brien"), "O'brien");
    }

    #[test]
    fn titles_keep_case() {
        assert_eq!(normalize_text(" the  HOBBIT "), "the HOBBIT");
    }

    #[test]
    fn emails_are_lowercased() {
        assert_eq!(normalize_email(" Ann@Example.COM "), "ann@example.com");
    }
}
