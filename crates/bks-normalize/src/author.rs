//! Author list rule.
//!
//! Names are split on `;`, `&`, `,` and the word `and`. A comma segment made
//! of exactly two single words is an inverted name (`Doe, Jane` → `Jane Doe`).
//! The result is title-cased and deduplicated in first-seen order.

use crate::text::{collapse_whitespace, title_case};

/// Split an author field into distinct names.
pub fn split_authors(value: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in segments(value) {
        for name in names_in_segment(&segment) {
            let name = title_case(&collapse_whitespace(&name));
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Pieces between `;`, `&` and standalone `and`.
fn segments(value: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for chunk in value.split([';', '&']) {
        let mut current: Vec<&str> = Vec::new();
        for word in chunk.split_whitespace() {
            if word.eq_ignore_ascii_case("and") {
                segments.push(current.join(" "));
                current.clear();
            } else {
                current.push(word);
            }
        }
        segments.push(current.join(" "));
    }
    segments
}

fn names_in_segment(segment: &str) -> Vec<String> {
    let parts: Vec<&str> = segment
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [last, first] if is_single_word(last) && is_single_word(first) => {
            vec![format!("{first} {last}")]
        }
        _ => parts.into_iter().map(str::to_string).collect(),
    }
}

fn is_single_word(value: &str) -> bool {
    !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_duplicates_collapse() {
        assert_eq!(split_authors("Doe, Jane and Doe, Jane"), vec!["Jane Doe"]);
    }

    #[test]
    fn splits_on_every_delimiter() {
        assert_eq!(
            split_authors("jane doe & John Roe; ann lee AND bo chen"),
            vec!["Jane Doe", "John Roe", "Ann Lee", "Bo Chen"]
        );
    }

    #[test]
    fn full_names_separated_by_comma() {
        assert_eq!(
            split_authors("Jane Doe, John Roe"),
            vec!["Jane Doe", "John Roe"]
        );
    }

    #[test]
    fn order_is_first_seen() {
        assert_eq!(
            split_authors("Bo Chen; Ann Lee; bo chen"),
            vec!["Bo Chen", "Ann Lee"]
        );
    }

    #[test]
    fn empty_tokens_are_dropped() {
        assert!(split_authors(" ; & and , ").is_empty());
    }
}
