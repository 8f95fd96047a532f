//! Conversion between a song's plain-text lyrics and its stored verses.
//!
//! The split is deliberately naive: every `'\n'` starts a new verse, blank
//! lines and surrounding whitespace are kept as-is, so verse positions map
//! one-to-one onto stored verse indices.

/// Join verses into display text, one per line, without a trailing newline.
pub fn assemble_text<S: AsRef<str>>(verses: &[S]) -> String {
  let mut text = String::new();
  for (i, verse) in verses.iter().enumerate() {
    if i > 0 {
      text.push('\n');
    }
    text.push_str(verse.as_ref());
  }
  text
}

/// Split text on newlines. An empty input yields a single empty verse.
pub fn split_text(text: &str) -> Vec<String> {
  text.split('\n').map(str::to_owned).collect()
}
