//! Segmentation of raw text into candidate single-item lines.

use super::patterns::DECIMAL_DIGIT;

/// Separator for comma-joined items.
const COMMA_SEPARATOR: &str = ", ";

/// Digit characters a line needs before a comma split is attempted.
const MIN_DIGITS_FOR_COMMA_SPLIT: usize = 2;

/// Split raw text into candidate lines.
///
/// Semicolons always separate items. A `", "` separates items only when the
/// line carries at least two digits and more than one part contains a letter;
/// otherwise the line is kept whole so names with commas survive.
pub fn split_candidate_lines(content: &str) -> Vec<String> {
    let normalized = content.replace('\r', "\n");
    let mut result = Vec::new();

    for line in normalized.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains(';') {
            result.extend(non_empty_parts(line, ";"));
            continue;
        }

        if line.contains(COMMA_SEPARATOR) && digit_count(line) >= MIN_DIGITS_FOR_COMMA_SPLIT {
            let product_like: Vec<String> = non_empty_parts(line, COMMA_SEPARATOR)
                .filter(|part| part.chars().any(char::is_alphabetic))
                .collect();
            if product_like.len() > 1 {
                result.extend(product_like);
                continue;
            }
        }

        result.push(line.to_string());
    }

    result
}

fn non_empty_parts<'a>(line: &'a str, separator: &'a str) -> impl Iterator<Item = String> + 'a {
    line.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
}

fn digit_count(line: &str) -> usize {
    DECIMAL_DIGIT.find_iter(line).count()
}
