//! Profanity filter for chirp bodies.

/// Words masked out of every chirp
pub const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replacement for a banned word
pub const MASK: &str = "****";

/// Mask banned words. Only whole space-separated words are matched, ignoring
/// case; a banned word with punctuation attached (`"Sharbert!"`) is kept.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BANNED_WORDS.iter().any(|bad| word.eq_ignore_ascii_case(bad)) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
