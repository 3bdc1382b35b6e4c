//! Main keyword extraction.
//!
//! Cuts a claim down to its subject so that image and video searches get a
//! short query ("The Eiffel Tower is in Berlin" -> "The Eiffel Tower").

/// Phrases that usually separate the subject of a claim from its predicate.
///
/// Order matters: the first phrase in this list that occurs anywhere in the
/// claim wins, even when another phrase occurs earlier in the text.
pub const SPLITTERS: [&str; 10] = [
    " who ", " that ", " which ", " is ", " has ", " was ", " were ", " won ", " scored ", " can ",
];

/// Extract the main keyword from a claim.
///
/// # Examples
/// ```
/// use truthtrace::keyword::extract_main_keyword;
///
/// assert_eq!(extract_main_keyword("The Eiffel Tower is in Berlin"), "The Eiffel Tower");
/// assert_eq!(extract_main_keyword("  Moon landing  "), "Moon landing");
/// ```
#[must_use]
pub fn extract_main_keyword(claim: &str) -> String {
    let lowered = claim.to_lowercase();

    for splitter in SPLITTERS {
        if let Some(pos) = lowered.find(splitter) {
            // Lower-casing can change byte lengths, so map the cut back by
            // character count instead of reusing the byte offset.
            let chars_before = lowered[..pos].chars().count();
            let cut = claim
                .char_indices()
                .nth(chars_before)
                .map_or(claim.len(), |(idx, _)| idx);
            return claim[..cut].trim().to_string();
        }
    }

    claim.trim().to_string()
}
