/// The character that opens a mention query.
pub const MENTION_TRIGGER: char = '@';

#[derive(Debug, Eq, PartialEq)]
pub enum CharCategory {
  Trigger,
  Whitespace,
  Eol,
  Alphanumeric,
  Other,
}

pub fn categorize_char(ch: char) -> CharCategory {
  match ch {
    MENTION_TRIGGER => CharCategory::Trigger,
    c if char_is_line_ending(c) => CharCategory::Eol,
    c if char_is_whitespace(c) => CharCategory::Whitespace,
    c if c.is_alphanumeric() => CharCategory::Alphanumeric,
    _ => CharCategory::Other,
  }
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  matches!(
    ch,
    '\u{000A}' // LineFeed
      | '\u{000B}' // VerticalTab
      | '\u{000C}' // FormFeed
      | '\u{000D}' // CarriageReturn
      | '\u{0085}' // NextLine
      | '\u{2028}' // LineSeparator
      | '\u{2029}' // ParagraphSeparator
  )
}

#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  match ch {
      '\u{0009}' | // Character Tabulation
      '\u{0020}' | // Space
      '\u{00A0}' | // No-break Space
      '\u{1680}' | // Ogham Space Mark
      '\u{180E}' | // Mongolian Vowel Separator
      '\u{202F}' | // Narrow No-break Space
      '\u{205F}' | // Medium Mathematical Space
      '\u{3000}' | // Ideographic Space
      '\u{FEFF}'   // Zero Width No-break Space
      => true,

      // En Quad, Em Quad, En Space, Em Space, Three-per-em Space,
      // Four-per-em Space, Six-per-em Space, Figure Space,
      // Punctuation Space, Thin Space, Hair Space, Zero Width Space.
      ch if ('\u{2000}' ..= '\u{200B}').contains(&ch) => true,

      _ => false,
    }
}

/// Characters that end a word for mention purposes: any whitespace or line
/// ending.
#[inline]
pub fn char_is_blank(ch: char) -> bool {
  matches!(
    categorize_char(ch),
    CharCategory::Whitespace | CharCategory::Eol
  )
}

/// Whether `ch` may be the first character typed after the trigger.
#[inline]
pub fn char_is_mention_start(ch: char) -> bool {
  categorize_char(ch) == CharCategory::Alphanumeric
}
