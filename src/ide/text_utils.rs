//! Text scanning around the cursor.

use text_size::{TextRange, TextSize};

/// Character classes of the names the cursor can sit in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    /// Processor names: `th:text`, `data-th-text`.
    Processor,
    /// Helper method names: `#strings.isEmpty`.
    Helper,
}

impl CharClass {
    #[inline]
    pub fn contains(self, c: char) -> bool {
        match self {
            CharClass::Processor => is_processor_character(c),
            CharClass::Helper => is_helper_character(c),
        }
    }
}

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[inline]
pub fn is_processor_character(c: char) -> bool {
    is_word_character(c) || c == ':' || c == '-'
}

#[inline]
pub fn is_helper_character(c: char) -> bool {
    is_word_character(c) || c == '#' || c == '.'
}

/// The run of `class` characters ending at `offset`.
///
/// Returns an empty string when the offset is out of bounds or not on a
/// character boundary.
pub fn pattern_before(text: &str, offset: TextSize, class: CharClass) -> &str {
    let end = usize::from(offset);
    let Some(before) = text.get(..end) else {
        return "";
    };

    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| class.contains(*c))
        .last()
        .map_or(end, |(i, _)| i);

    &before[start..]
}

pub fn processor_pattern_before(text: &str, offset: TextSize) -> &str {
    pattern_before(text, offset, CharClass::Processor)
}

pub fn helper_pattern_before(text: &str, offset: TextSize) -> &str {
    pattern_before(text, offset, CharClass::Helper)
}

/// The run of `class` characters surrounding `offset`, with its range.
///
/// Returns `None` if there is no such character on either side.
pub fn word_around(text: &str, offset: TextSize, class: CharClass) -> Option<(TextRange, &str)> {
    let position = usize::from(offset);
    let after = text.get(position..)?;

    let prefix = pattern_before(text, offset, class);
    let suffix_len: usize = after
        .chars()
        .take_while(|c| class.contains(*c))
        .map(char::len_utf8)
        .sum();

    let start = position - prefix.len();
    let end = position + suffix_len;
    if start == end {
        return None;
    }

    let range = TextRange::new(TextSize::try_from(start).ok()?, TextSize::try_from(end).ok()?);
    Some((range, &text[start..end]))
}
