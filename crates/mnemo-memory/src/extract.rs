use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use mnemo_core::Amendment;

/// Diff-fenced amendment block:
///
/// ```text
/// <<<<<<< SEARCH
/// literal text to find
/// =======
/// literal replacement text
/// >>>>>>> REPLACE
/// ```
///
/// Non-greedy so adjacent blocks never merge; `(?s)` lets both sides
/// span embedded newlines.
fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<<<<<<< SEARCH\n(.*?)\n=======\n(.*?)\n>>>>>>> REPLACE")
            .expect("amendment block pattern is valid")
    })
}

/// Extract all amendments from an analysis response, in source order.
///
/// Both sides are trimmed of surrounding whitespace. A pair whose search
/// text trims to empty is still returned; rejecting it is the applier's
/// job. A response with no well-formed blocks yields an empty vec.
pub fn extract_amendments(response: &str) -> Vec<Amendment> {
    let mut amendments = Vec::new();

    for caps in block_pattern().captures_iter(response) {
        let search = caps[1].trim().to_string();
        let replace = caps[2].trim().to_string();
        debug!(
            search_chars = search.chars().count(),
            replace_chars = replace.chars().count(),
            "extracted amendment"
        );
        amendments.push(Amendment { search, replace });
    }

    info!(count = amendments.len(), "extracted amendments from analysis response");
    amendments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_blocks_yields_empty() {
        assert!(extract_amendments("").is_empty());
        assert!(extract_amendments("Just prose, no amendments needed.").is_empty());
    }

    #[test]
    fn test_single_block() {
        let response = "\
Some analysis first.

<<<<<<< SEARCH
- [To be determined from conversations]
=======
- Prefers concise answers
>>>>>>> REPLACE

Closing remarks.";
        let amendments = extract_amendments(response);
        assert_eq!(amendments.len(), 1);
        assert_eq!(
            amendments[0].search,
            "- [To be determined from conversations]"
        );
        assert_eq!(amendments[0].replace, "- Prefers concise answers");
    }

    #[test]
    fn test_multiple_blocks_in_source_order() {
        let response = "\
<<<<<<< SEARCH
alpha
=======
one
>>>>>>> REPLACE
<<<<<<< SEARCH
beta
=======
two
>>>>>>> REPLACE";
        let amendments = extract_amendments(response);
        assert_eq!(amendments.len(), 2);
        assert_eq!(amendments[0].search, "alpha");
        assert_eq!(amendments[1].search, "beta");
    }

    #[test]
    fn test_multiline_search_and_replace() {
        let response = "\
<<<<<<< SEARCH
INTERESTS:
- rust
- chess
=======
INTERESTS:
- rust
- chess
- sailing
>>>>>>> REPLACE";
        let amendments = extract_amendments(response);
        assert_eq!(amendments.len(), 1);
        assert_eq!(amendments[0].search, "INTERESTS:\n- rust\n- chess");
        assert_eq!(
            amendments[0].replace,
            "INTERESTS:\n- rust\n- chess\n- sailing"
        );
    }

    #[test]
    fn test_sides_are_trimmed() {
        let response = "\
<<<<<<< SEARCH
   padded
=======
   also padded
>>>>>>> REPLACE";
        let amendments = extract_amendments(response);
        assert_eq!(amendments[0].search, "padded");
        assert_eq!(amendments[0].replace, "also padded");
    }

    #[test]
    fn test_empty_search_still_returned() {
        let response = "\
<<<<<<< SEARCH

=======
inserted text
>>>>>>> REPLACE";
        let amendments = extract_amendments(response);
        assert_eq!(amendments.len(), 1);
        assert!(amendments[0].search.is_empty());
        assert_eq!(amendments[0].replace, "inserted text");
    }

    #[test]
    fn test_malformed_block_ignored() {
        // Missing separator: not a well-formed block.
        let response = "\
<<<<<<< SEARCH
orphaned text
>>>>>>> REPLACE";
        assert!(extract_amendments(response).is_empty());
    }
}
