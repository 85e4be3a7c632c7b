use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Maximum length of a generated directory key.
const MAX_LEN: usize = 50;

/// Normalize a display name into a directory key: lowercase, hyphenated,
/// ASCII-alphanumeric only, capped at 50 characters.
///
/// The mapping is pure and stable but not injective: "In Progress" and
/// "in progress" both map to `in-progress`.
pub fn slugify(s: &str) -> String {
    let lower = s.to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lower, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&replaced, "-");
    let mut slug = collapsed.trim_matches('-').to_string();

    if slug.is_empty() {
        return "untitled".to_string();
    }

    if slug.len() > MAX_LEN {
        // The slug is pure ASCII at this point, so byte truncation is safe.
        slug.truncate(MAX_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }

    slug
}
