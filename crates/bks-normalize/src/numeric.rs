//! Money and integer rules.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Result, ValueError};

const CURRENCY_WORDS: &[&str] = &["usd", "eur", "us$"];

/// Normalize a price to a plain non-negative decimal string in USD.
///
/// Accepted shapes include `$1,234.5`, `12,5 €`, `USD 50 75` (split
/// groups, read as `50.75`) and `50¢50` (cents notation). Amounts quoted in
/// euros are converted with `eur_to_usd`.
pub fn normalize_money(value: &str, eur_to_usd: Decimal) -> Result<String> {
    let original = value.trim();
    let number_error = || ValueError::Number(original.to_string());
    if original.is_empty() {
        return Err(number_error());
    }

    let lower = original.to_lowercase();
    let is_eur = lower.contains('€') || lower.contains("eur");
    let mut text = lower.clone();
    for word in CURRENCY_WORDS {
        text = text.replace(word, " ");
    }
    let text = text.replace(['$', '€'], " ");

    if text.contains('-') || text.contains('(') {
        return Err(ValueError::Negative(original.to_string()));
    }

    let amount = if text.contains('¢') {
        parse_cents(&text).ok_or_else(number_error)?
    } else {
        let joined = join_groups(&text).ok_or_else(number_error)?;
        let plain = resolve_separators(&joined).ok_or_else(number_error)?;
        Decimal::from_str(&plain).map_err(|_| number_error())?
    };

    let amount = if is_eur {
        amount.checked_mul(eur_to_usd).ok_or_else(number_error)?
    } else {
        amount
    };
    Ok(amount.normalize().to_string())
}

/// `50¢50` → 50.50, `75¢` → 0.75.
fn parse_cents(text: &str) -> Option<Decimal> {
    let groups: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .collect();
    match groups.as_slice() {
        [major, minor] => Decimal::from_str(&format!("{major}.{minor}")).ok(),
        [cents] => Some(Decimal::new(cents.parse().ok()?, 2)),
        _ => None,
    }
}

/// Merge whitespace-separated digit groups into a single token.
///
/// Two groups with a short tail are major/minor units (`50 75` → `50.75`);
/// longer runs of three-digit groups are thousands (`1 234 567`).
fn join_groups(text: &str) -> Option<String> {
    let groups: Vec<&str> = text.split_whitespace().collect();
    match groups.as_slice() {
        [] => None,
        [single] => Some((*single).to_string()),
        [major, minor] if all_digits(major) && all_digits(minor) && minor.len() <= 2 => {
            Some(format!("{major}.{minor}"))
        }
        [first, rest @ ..]
            if all_digits(first) && rest.iter().all(|g| all_digits(g) && g.len() == 3) =>
        {
            Some(groups.concat())
        }
        _ => None,
    }
}

/// Decide which of `,` and `.` is the decimal separator and drop the other.
fn resolve_separators(token: &str) -> Option<String> {
    if !token
        .chars()
        .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return None;
    }
    let token = token.trim_end_matches('.');
    let commas = token.matches(',').count();
    let dots = token.matches('.').count();

    let plain = match (commas, dots) {
        (0, 0) => token.to_string(),
        (0, 1) => token.to_string(),
        (1, 0) if !is_thousands(token, ',') => token.replace(',', "."),
        (_, 0) if is_thousands(token, ',') => token.replace(',', ""),
        (0, _) if is_thousands(token, '.') => token.replace('.', ""),
        (_, _) if commas > 0 && dots > 0 => {
            let last_comma = token.rfind(',')?;
            let last_dot = token.rfind('.')?;
            let (decimal, grouping) = if last_dot > last_comma {
                ('.', ',')
            } else {
                (',', '.')
            };
            let stripped = token.replace(grouping, "");
            if stripped.matches(decimal).count() != 1 {
                return None;
            }
            stripped.replace(decimal, ".")
        }
        _ => return None,
    };

    if plain.is_empty() || plain == "." {
        return None;
    }
    if plain.starts_with('.') {
        Some(format!("0{plain}"))
    } else {
        Some(plain)
    }
}

/// `1,234` or `1,234,567`: leading group of 1-3 digits, then 3-digit groups.
fn is_thousands(token: &str, separator: char) -> bool {
    let mut groups = token.split(separator);
    let Some(head) = groups.next() else {
        return false;
    };
    (1..=3).contains(&head.len())
        && all_digits(head)
        && groups.all(|group| group.len() == 3 && all_digits(group))
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Normalize an integral count such as a quantity or year.
///
/// Integral decimals (`3.0`) are accepted; fractional values are not.
pub fn normalize_integer(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n.to_string());
    }
    match Decimal::from_str(trimmed) {
        Ok(d) if d.fract().is_zero() => Ok(d.trunc().normalize().to_string()),
        _ => Err(ValueError::Integer(trimmed.to_string())),
    }
}
