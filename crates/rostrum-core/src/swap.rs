//! Simultaneous substring swapping
//!
//! Used to exchange debater names inside argument text when a transcript is
//! reversed.

/// Private-use code point; never produced by debaters
const SENTINEL_UNIT: char = '\u{E000}';

/// Swap every occurrence of `a` with `b` and every occurrence of `b` with `a`.
///
/// The swap is simultaneous: `a` is first parked behind a sentinel that occurs
/// nowhere in the inputs, then `b` becomes `a`, then the sentinel becomes `b`.
/// Matching is literal and case-sensitive.
///
/// When one name contains the other (`"Al"` and `"Alice"`, or `"Alice"` and
/// `"Alice Smith"`) the text is scanned once instead, matching whole words
/// only and trying the longer name first at each position, so an occurrence
/// of the longer name is never split by the shorter one.
///
/// Empty names, or identical names, leave the text unchanged.
///
/// ```
/// use rostrum_core::swap::swap_substrings;
///
/// assert_eq!(swap_substrings("Alice rebuts Bob", "Alice", "Bob"), "Bob rebuts Alice");
/// assert_eq!(swap_substrings("Al told Alice", "Al", "Alice"), "Alice told Al");
/// assert_eq!(
///     swap_substrings("Alice Smith met Alice", "Alice", "Alice Smith"),
///     "Alice met Alice Smith"
/// );
/// ```
pub fn swap_substrings(text: &str, a: &str, b: &str) -> String {
    if a.is_empty() || b.is_empty() || a == b {
        return text.to_string();
    }
    if a.contains(b) || b.contains(a) {
        return swap_whole_words(text, a, b);
    }

    let sentinel = sentinel_for(&[text, a, b]);
    text.replace(a, &sentinel)
        .replace(b, a)
        .replace(&sentinel, b)
}

/// Shortest run of [`SENTINEL_UNIT`] absent from every input
fn sentinel_for(inputs: &[&str]) -> String {
    let mut sentinel = SENTINEL_UNIT.to_string();
    while inputs.iter().any(|s| s.contains(&sentinel)) {
        sentinel.push(SENTINEL_UNIT);
    }
    sentinel
}

/// Single left-to-right pass, longest name first
fn swap_whole_words(text: &str, a: &str, b: &str) -> String {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let hit = [long, short]
            .into_iter()
            .find(|name| rest.starts_with(name) && is_word_boundary(text, pos, pos + name.len()));

        match hit {
            Some(name) => {
                out.push_str(&text[copied..pos]);
                out.push_str(if name == a { b } else { a });
                pos += name.len();
                copied = pos;
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swaps_both_directions() {
        assert_eq!(
            swap_substrings("Alice says Bob is wrong, Bob says Alice is", "Alice", "Bob"),
            "Bob says Alice is wrong, Alice says Bob is"
        );
    }

    #[test]
    fn test_not_sequential() {
        // A naive replace chain would turn everything into one name
        assert_eq!(swap_substrings("A B", "A", "B"), "B A");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(swap_substrings("alice Alice", "Alice", "Bob"), "alice Bob");
    }

    #[test]
    fn test_names_are_literal() {
        assert_eq!(swap_substrings("a.b and c+d", "a.b", "c+d"), "c+d and a.b");
    }

    #[test]
    fn test_empty_or_equal_names() {
        assert_eq!(swap_substrings("text", "", "Bob"), "text");
        assert_eq!(swap_substrings("text", "Bob", ""), "text");
        assert_eq!(swap_substrings("Bob", "Bob", "Bob"), "Bob");
    }

    #[test]
    fn test_contained_name_uses_whole_words() {
        let text = "Alice and Al disagree; Alice's point stands.";
        let swapped = swap_substrings(text, "Al", "Alice");
        assert_eq!(swapped, "Al and Alice disagree; Al's point stands.");
        assert_eq!(swap_substrings(&swapped, "Al", "Alice"), text);
    }

    #[test]
    fn test_whole_word_skips_embedded_match() {
        assert_eq!(swap_substrings("Alan", "Al", "Alan"), "Al");
        assert_eq!(swap_substrings("Albert", "Al", "Alan"), "Albert");
    }

    #[test]
    fn test_contained_multi_word_name() {
        let text = "Alice Smith met Alice";
        let swapped = swap_substrings(text, "Alice", "Alice Smith");
        assert_eq!(swapped, "Alice met Alice Smith");
        assert_eq!(swap_substrings(&swapped, "Alice", "Alice Smith"), text);
        assert_eq!(swap_substrings(text, "Alice Smith", "Alice"), "Alice met Alice Smith");
    }

    #[test]
    fn test_longer_name_needs_its_own_boundary() {
        let swapped = swap_substrings("Alice Smithson", "Alice", "Alice Smith");
        assert_eq!(swapped, "Alice Smith Smithson");
        assert_eq!(swap_substrings(&swapped, "Alice", "Alice Smith"), "Alice Smithson");
    }

    #[test]
    fn test_text_containing_sentinel() {
        let text = format!("{} Alice Bob", SENTINEL_UNIT);
        assert_eq!(
            swap_substrings(&text, "Alice", "Bob"),
            format!("{} Bob Alice", SENTINEL_UNIT)
        );
    }

    #[test]
    fn test_sentinel_grows_until_absent() {
        let taken = format!("{0}{0}", SENTINEL_UNIT);
        let sentinel = sentinel_for(&[&taken, "a", "b"]);
        assert_eq!(sentinel.chars().count(), 3);
    }
}
