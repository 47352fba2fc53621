use chrono::Utc;

/// Current unix time in seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Extracts the year from a Spotify `release_date`.
///
/// Spotify reports dates as `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on the
/// album's `release_date_precision`; only the first four characters are used.
pub fn release_year(release_date: &str) -> Option<i32> {
    let year = release_date.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quotes a CSV field when it contains a delimiter, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
