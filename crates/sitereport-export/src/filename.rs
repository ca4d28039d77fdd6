// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output filename construction.

use chrono::NaiveDate;

/// Fallback stem used when sanitizing leaves nothing.
pub const DEFAULT_STEM: &str = "protokoll";

/// Replace every character outside `[A-Za-z0-9-_. ]` with `_` and trim
/// surrounding whitespace. An empty result becomes [`DEFAULT_STEM`].
pub fn sanitize(input: &str) -> String {
    sanitize_with_fallback(input, DEFAULT_STEM)
}

/// [`sanitize`] with a caller-chosen fallback. The fallback is sanitized
/// too; if that also comes out empty, [`DEFAULT_STEM`] is used.
pub fn sanitize_with_fallback(input: &str, fallback: &str) -> String {
    let cleaned = clean(input);
    if !cleaned.is_empty() {
        return cleaned;
    }
    let fallback = clean(fallback);
    if fallback.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        fallback
    }
}

fn clean(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `{project}_{date}.{extension}` with both parts sanitized. A blank date
/// falls back to `today` in ISO form.
pub fn build_filename(
    project_name: &str,
    date: &str,
    today: NaiveDate,
    extension: &str,
    fallback: &str,
) -> String {
    let stem = sanitize_with_fallback(project_name, fallback);
    let date = if date.trim().is_empty() {
        today.format("%Y-%m-%d").to_string()
    } else {
        sanitize_with_fallback(date, &today.format("%Y-%m-%d").to_string())
    };
    format!("{}_{}.{}", stem, date, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    #[test]
    fn disallowed_characters_become_underscores() {
        assert_eq!(sanitize("Neubau/Nord: Haus 3"), "Neubau_Nord_ Haus 3");
        assert_eq!(sanitize("Müller"), "M_ller");
        assert_eq!(sanitize("a.b-c_d"), "a.b-c_d");
    }

    #[test]
    fn output_is_never_empty() {
        assert_eq!(sanitize(""), "protokoll");
        assert_eq!(sanitize("   "), "protokoll");
        assert_eq!(sanitize_with_fallback("", "///"), "___");
        assert_eq!(sanitize_with_fallback("", "  "), "protokoll");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for input in ["Neubau Nord", "ä/ö\\ü", "  x  ", "", "a\tb\nc", "日本"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn filename_uses_project_and_date() {
        assert_eq!(
            build_filename("Neubau Nord", "2026-03-14", today(), "xlsx", DEFAULT_STEM),
            "Neubau Nord_2026-03-14.xlsx"
        );
    }

    #[test]
    fn blank_project_and_date_fall_back() {
        assert_eq!(
            build_filename("", "", today(), "xlsx", DEFAULT_STEM),
            "protokoll_2026-05-01.xlsx"
        );
    }

    #[test]
    fn date_with_slashes_is_sanitized() {
        assert_eq!(
            build_filename("Hof", "14/03/2026", today(), "pdf", DEFAULT_STEM),
            "Hof_14_03_2026.pdf"
        );
    }
}
