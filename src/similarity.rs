//! Title similarity scoring
//!
//! Series titles are compared with a token-set ratio: both titles are reduced
//! to sets of lowercase words, and the score reflects how well the shared
//! words plus the remaining words of each side line up. The score ranges
//! from 0 (nothing in common) to 100 (same word set), independent of word
//! order, letter case and repeated words.

use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

/// Computes the token-set similarity of two titles (0 to 100).
///
/// Returns 0 if either title contains no alphanumeric characters.
///
/// # Examples
///
/// ```
/// use series_scout::token_set_ratio;
///
/// assert_eq!(token_set_ratio("Solo Leveling", "leveling SOLO"), 100);
/// assert!(token_set_ratio("Solo Leveling", "Sword Art Online") < 70);
/// ```
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{} {}", shared, only_a).trim().to_string();
    let combined_b = format!("{} {}", shared, only_b).trim().to_string();

    [
        ratio(&shared, &combined_a),
        ratio(&shared, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Finds the title scoring highest against `query`.
///
/// Returns the index of the winning title and its score, or `None` if
/// `titles` is empty. On ties the first title in iteration order wins.
/// No threshold is applied here; callers decide what score is good enough.
pub fn best_match<'a, I>(query: &str, titles: I) -> Option<(usize, u8)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, u8)> = None;

    for (index, title) in titles.into_iter().enumerate() {
        let score = token_set_ratio(title, query);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    best
}

/// Lowercases, replaces everything that is not alphanumeric by whitespace
/// and collects the distinct words in sorted order.
fn tokenize(title: &str) -> BTreeSet<String> {
    let normalized: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    normalized.split_whitespace().map(str::to_string).collect()
}

fn join<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Normalized Indel similarity scaled to 0..=100, 0 if either side is empty.
fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let similarity = indel::normalized_similarity(a.chars(), b.chars());
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
