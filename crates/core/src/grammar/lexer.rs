/// Classification of a block token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// A letter followed by its (possibly empty) numeric text, e.g. `X-1.5`.
    Word,
    /// Program start/end marker `%`.
    ProgramMarker,
    /// Block-delete marker `/`.
    BlockDelete,
    /// `(` or `;` through end of line, kept verbatim.
    Comment,
    /// A run starting with a character that is neither a letter nor a marker.
    Unknown,
}

/// A token borrowing its text from the source line.
///
/// `text` is exactly `&line[start..end]`. Word and unknown tokens may contain
/// interior whitespace (`X 1 . 5`); use [`Token::normalized`] for the
/// whitespace-free, uppercased form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the source line.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last non-whitespace character.
    pub end: usize,
}

impl Token<'_> {
    /// Uppercased token text with whitespace removed.
    ///
    /// Comments are returned verbatim with trailing whitespace trimmed.
    pub fn normalized(&self) -> String {
        match self.kind {
            TokKind::Comment => self.text.trim_end().to_string(),
            _ => self
                .text
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect(),
        }
    }

    /// The command letter of a word token, uppercased.
    pub fn letter(&self) -> Option<char> {
        match self.kind {
            TokKind::Word => self.text.chars().next().map(|c| c.to_ascii_uppercase()),
            _ => None,
        }
    }
}

fn is_marker(b: u8) -> bool {
    matches!(b, b'%' | b'/' | b'(' | b';')
}

/// Split one block into tokens.
///
/// Whitespace separates nothing: a new word starts at every ASCII letter, so
/// `G1X1Y2` and `g1 x 1 y 2` produce the same words. `%` and `/` are
/// single-byte tokens. `(` or `;` consumes the rest of the line as a comment.
///
/// All boundary tests are ASCII, and UTF-8 continuation bytes are `>= 0x80`,
/// so every slice lands on a character boundary.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let b = line.as_bytes();
    let mut toks = Vec::new();
    let mut i = 0usize;
    while i < b.len() {
        let c = b[i];
        let start = i;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match c {
            b'(' | b';' => {
                let end = start + line[start..].trim_end().len();
                toks.push(Token {
                    kind: TokKind::Comment,
                    text: &line[start..end],
                    start,
                    end,
                });
                break;
            }
            b'%' | b'/' => {
                i += 1;
                toks.push(Token {
                    kind: if c == b'%' {
                        TokKind::ProgramMarker
                    } else {
                        TokKind::BlockDelete
                    },
                    text: &line[start..i],
                    start,
                    end: i,
                });
            }
            _ => {
                let kind = if c.is_ascii_alphabetic() {
                    TokKind::Word
                } else {
                    TokKind::Unknown
                };
                i += 1;
                let mut end = i;
                while i < b.len() && !b[i].is_ascii_alphabetic() && !is_marker(b[i]) {
                    if !b[i].is_ascii_whitespace() {
                        end = i + 1;
                    }
                    i += 1;
                }
                toks.push(Token {
                    kind,
                    text: &line[start..end],
                    start,
                    end,
                });
            }
        }
    }
    log::trace!("tokenized {:?} into {} tokens", line, toks.len());
    toks
}
