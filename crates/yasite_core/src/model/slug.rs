//! Note slug rules.
//!
//! # Invariants
//! - A valid slug matches `^[-a-zA-Z0-9_]+$` and has at most `SLUG_MAX_CHARS`
//!   characters.
//! - `slugify` output is either empty or a valid slug.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum slug length in characters.
pub const SLUG_MAX_CHARS: usize = 100;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));
static DASH_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid dash regex"));

/// Returns whether `value` is an acceptable user-supplied slug.
pub fn is_valid_slug(value: &str) -> bool {
    value.chars().count() <= SLUG_MAX_CHARS && SLUG_RE.is_match(value)
}

/// Derives a URL-safe slug from free text (usually a note title).
///
/// Cyrillic letters are transliterated, everything is lowercased, whitespace
/// becomes `-`, other punctuation is dropped. Returns an empty string when
/// nothing usable remains.
pub fn slugify(source: &str) -> String {
    let mut raw = String::with_capacity(source.len());
    for ch in source.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            raw.push(ch);
        } else if ch == '-' || ch.is_whitespace() {
            raw.push('-');
        } else if let Some(latin) = transliterate(ch) {
            raw.push_str(latin);
        }
    }

    let collapsed = DASH_RUN_RE.replace_all(&raw, "-");
    let trimmed = collapsed.trim_matches(|ch| ch == '-' || ch == '_');
    let truncated: String = trimmed.chars().take(SLUG_MAX_CHARS).collect();
    truncated.trim_end_matches('-').to_string()
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}
