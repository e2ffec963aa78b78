/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use comment_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert!((percentage(1.0, 3.0, 2) - 33.33).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Percentage of two counts, unrounded.
///
/// Display precision is left to the formatter so values are rounded once.
pub fn count_percentage(part: u64, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

/// Capitalise the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"uae"` becomes
/// `"Uae"` and `"account activation"` becomes `"Account Activation"`.
///
/// # Examples
///
/// ```
/// use comment_core::formatting::title_case;
///
/// assert_eq!(title_case("customer service"), "Customer Service");
/// assert_eq!(title_case("SAUDI arabia"), "Saudi Arabia");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Shorten `text` to at most `max_chars` characters, replacing the tail with
/// `...` when it is cut. Counts characters, not bytes.
///
/// # Examples
///
/// ```
/// use comment_core::formatting::truncate_chars;
///
/// assert_eq!(truncate_chars("short", 10), "short");
/// assert_eq!(truncate_chars("abcdefghij", 8), "abcde...");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Collapse line breaks into spaces so a comment fits on one report line.
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Flatten and truncate a comment body for list output.
pub fn preview(text: &str, max_chars: usize) -> String {
    truncate_chars(&single_line(text), max_chars)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        assert!((percentage(1.0, 4.0, 2) - 25.0).abs() < 1e-9);
        assert!((percentage(2.0, 3.0, 2) - 66.67).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(5.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_count_percentage() {
        assert!((count_percentage(3, 8) - 37.5).abs() < 1e-9);
        assert_eq!(count_percentage(3, 0), 0.0);
    }

    #[test]
    fn test_count_percentage_is_not_pre_rounded() {
        assert_eq!(count_percentage(1, 800), 0.125);
        assert_eq!(format!("{:.2}", count_percentage(1, 800)), "0.12");
    }

    // ── title_case ───────────────────────────────────────────────────────────

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("integration apps"), "Integration Apps");
        assert_eq!(title_case("fees"), "Fees");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_leaves_non_latin_alone() {
        assert_eq!(title_case("غزة"), "غزة");
    }

    // ── truncate_chars ───────────────────────────────────────────────────────

    #[test]
    fn test_truncate_exact_limit_untouched() {
        let s = "x".repeat(200);
        assert_eq!(truncate_chars(&s, 200), s);
    }

    #[test]
    fn test_truncate_over_limit() {
        let s = "y".repeat(201);
        let t = truncate_chars(&s, 200);
        assert_eq!(t.chars().count(), 200);
        assert!(t.ends_with("..."));
        assert_eq!(&t[..197], "y".repeat(197));
    }

    #[test]
    fn test_truncate_multibyte_is_char_based() {
        let s = "سحب".repeat(100); // 300 chars, 600 bytes
        let t = truncate_chars(&s, 200);
        assert_eq!(t.chars().count(), 200);
    }

    // ── single_line / preview ────────────────────────────────────────────────

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\nb\r\nc"), "a b c");
    }

    #[test]
    fn test_preview_flattens_then_truncates() {
        let text = format!("line one\n{}", "z".repeat(300));
        let p = preview(&text, 200);
        assert!(!p.contains('\n'));
        assert_eq!(p.chars().count(), 200);
    }
}
