// src/utils.rs

/// Normalize an employer name into the key used for deduplication.
///
/// Uppercases, drops everything that is neither a word character nor
/// whitespace, and collapses whitespace runs to a single space.
pub fn normalize_employer_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case a city name: a letter is uppercased when it follows a
/// non-letter, lowercased otherwise ("o'fallon" -> "O'Fallon").
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.trim().chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

/// Normalize a state or territory code
pub fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}

/// Build the "City, ST" label used by the city filter
pub fn city_state_label(city: &str, state: &str) -> String {
    format!("{}, {}", title_case(city), normalize_state(state))
}

/// Split a "City, ST" label at its last separator
pub fn split_city_state(label: &str) -> Option<(String, String)> {
    let (city, state) = label.rsplit_once(", ")?;
    Some((title_case(city), normalize_state(state)))
}

pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Parse a loosely formatted boolean cell
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "t" | "1.0" => Some(true),
        "false" | "0" | "no" | "n" | "f" | "0.0" => Some(false),
        _ => None,
    }
}

pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Petition counts sometimes arrive as floats ("12.0")
pub fn parse_count(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Some(count);
    }
    parse_number(trimmed)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Format a count with thousands separators (12345 -> "12,345")
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
