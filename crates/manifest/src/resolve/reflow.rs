//! Sentence-boundary reflow for free-text descriptions.
//!
//! A sentence starts with an ASCII capital followed by a lowercase letter and runs, within a
//! single line, to the first `.`, `:`, `!` or `?` that is followed either by the end of the
//! text or by a space and a capital. A line break is inserted after each such sentence; every
//! line and the whole text are then trimmed.

const TERMINALS: [char; 4] = ['.', ':', '!', '?'];

/// Break single-paragraph text into one sentence per line.
pub fn reflow_description(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    let mut i = 0;
    while i < chars.len() {
        match sentence_end(&chars, i) {
            Some(end) => {
                out.extend(&chars[i..=end]);
                out.push('\n');
                i = end + 1;
            },
            None => {
                out.push(chars[i]);
                i += 1;
            },
        }
    }

    out.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

/// The index of the terminal punctuation closing a sentence starting at `start`.
fn sentence_end(chars: &[char], start: usize) -> Option<usize> {
    let (first, second) = (chars.get(start)?, chars.get(start + 1)?);
    if !first.is_ascii_uppercase() || !second.is_ascii_lowercase() {
        return None;
    }
    chars
        .iter()
        .enumerate()
        .skip(start + 2)
        .take_while(|(_, c)| !matches!(c, '\n' | '\r'))
        .find(|&(j, c)| TERMINALS.contains(c) && closes_sentence(chars, j))
        .map(|(j, _)| j)
}

fn closes_sentence(chars: &[char], at: usize) -> bool {
    match chars.get(at + 1) {
        None => true,
        // end of input also matches before a single trailing line break
        Some('\n') => at + 2 == chars.len(),
        Some(' ') => chars.get(at + 2).is_some_and(char::is_ascii_uppercase),
        Some(_) => false,
    }
}
