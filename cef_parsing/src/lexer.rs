// ********* Lexical analysis ***********

use std::error::Error;
use std::fmt::Display;

/// The literal marker for a ballot that expresses no preference.
pub const EMPTY_RANKING_MARKER: &str = "/EMPTY_RANKING/";

/// A lexical token of a CEF line.
///
/// Tokens are produced in left-to-right order and are only meaningful for the
/// line that produced them.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Token {
    /// A maximal run of word characters that is not all digits.
    Word(String),
    /// A maximal all-digit run.
    Integer(i64),
    /// `*` introduces a quantifier.
    Star,
    /// `^` introduces a weight.
    Caret,
    /// `=` separates tied candidates.
    Equals,
    /// `>` separates preference positions.
    GreaterThan,
    /// `,` separates tags.
    Comma,
    /// `||` separates the tag section from the ranking.
    DoublePipe,
    /// The `/EMPTY_RANKING/` literal.
    EmptyMarker,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LexError {
    /// A character that can never appear in a CEF line (control characters).
    UnexpectedChar { c: char, column: usize },
    /// A single `|` not immediately followed by a second one.
    UnterminatedMarker { column: usize },
}

impl Error for LexError {}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedChar { c, column } => {
                write!(f, "unexpected character {:?} at column {}", c, column)
            }
            LexError::UnterminatedMarker { column } => {
                write!(
                    f,
                    "single '|' at column {} (the tag separator is '||')",
                    column
                )
            }
        }
    }
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '*' | '^' | '=' | '>' | ',' | '|')
}

/// Classifies a completed word run.
///
/// An all-digit run becomes an `Integer` only when the numeric value prints
/// back to the exact same text (no leading zeros, fits in i64); anything else
/// stays a `Word` so that no name is silently normalized.
fn classify_word(word: String) -> Token {
    if word == EMPTY_RANKING_MARKER {
        return Token::EmptyMarker;
    }
    if word.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = word.parse::<i64>() {
            if n.to_string() == word {
                return Token::Integer(n);
            }
        }
    }
    Token::Word(word)
}

/// Splits one CEF line into tokens.
///
/// Whitespace separates tokens and is discarded. The punctuation characters
/// `* ^ = > , |` force a token boundary even without surrounding whitespace.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = line.char_indices().peekable();
    while let Some(&(column, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Equals);
            }
            '>' => {
                chars.next();
                tokens.push(Token::GreaterThan);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '|' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '|')) => {
                        chars.next();
                        tokens.push(Token::DoublePipe);
                    }
                    _ => return Err(LexError::UnterminatedMarker { column }),
                }
            }
            _ if c.is_control() => {
                return Err(LexError::UnexpectedChar { c, column });
            }
            _ => {
                let mut word = String::new();
                while let Some(&(column2, c2)) = chars.peek() {
                    if c2.is_whitespace() || is_punctuation(c2) {
                        break;
                    }
                    if c2.is_control() {
                        return Err(LexError::UnexpectedChar {
                            c: c2,
                            column: column2,
                        });
                    }
                    word.push(c2);
                    chars.next();
                }
                tokens.push(classify_word(word));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_integers() {
        assert_eq!(
            tokenize("Alice 42 R2D2"),
            Ok(vec![
                Token::Word("Alice".to_string()),
                Token::Integer(42),
                Token::Word("R2D2".to_string()),
            ])
        );
    }

    #[test]
    fn punctuation_needs_no_whitespace() {
        assert_eq!(
            tokenize("a=b>c*3^2"),
            Ok(vec![
                Token::Word("a".to_string()),
                Token::Equals,
                Token::Word("b".to_string()),
                Token::GreaterThan,
                Token::Word("c".to_string()),
                Token::Star,
                Token::Integer(3),
                Token::Caret,
                Token::Integer(2),
            ])
        );
    }

    #[test]
    fn double_pipe_is_one_token() {
        assert_eq!(
            tokenize("t1||a"),
            Ok(vec![
                Token::Word("t1".to_string()),
                Token::DoublePipe,
                Token::Word("a".to_string()),
            ])
        );
    }

    #[test]
    fn single_pipe_is_rejected() {
        assert_eq!(tokenize("X|Y"), Err(LexError::UnterminatedMarker { column: 1 }));
        assert_eq!(tokenize("X |"), Err(LexError::UnterminatedMarker { column: 2 }));
    }

    #[test]
    fn empty_ranking_marker() {
        assert_eq!(tokenize(" /EMPTY_RANKING/ "), Ok(vec![Token::EmptyMarker]));
        // Only the exact literal is a marker.
        assert_eq!(
            tokenize("/EMPTY_RANKING"),
            Ok(vec![Token::Word("/EMPTY_RANKING".to_string())])
        );
    }

    #[test]
    fn leading_zeros_stay_words() {
        assert_eq!(tokenize("007"), Ok(vec![Token::Word("007".to_string())]));
        // Too large for i64: kept verbatim as a word.
        assert_eq!(
            tokenize("99999999999999999999"),
            Ok(vec![Token::Word("99999999999999999999".to_string())])
        );
    }

    #[test]
    fn control_characters_are_rejected() {
        assert_eq!(
            tokenize("a\u{0007}b"),
            Err(LexError::UnexpectedChar {
                c: '\u{0007}',
                column: 1
            })
        );
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert_eq!(tokenize("   "), Ok(vec![]));
    }
}
