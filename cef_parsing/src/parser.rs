// ********* Grammar parsing ***********
//
// The grammar, as implemented by the recursive descent below:
//
//   line        := [ tag_section "||" ] ranking
//   tag_section := name { "," name }
//   ranking     := choice_list [ multiplier ]
//   choice_list := "/EMPTY_RANKING/" | tie_group { ">" tie_group }
//   tie_group   := name { "=" name }
//   name        := (Word | Integer)+
//   multiplier  := at most one "*" Integer and one "^" Integer, in any order

use std::error::Error;
use std::fmt::Display;

use log::debug;

use crate::lexer::{Token, EMPTY_RANKING_MARKER};

/// Candidates that share one preference position.
///
/// The parser preserves source order; uniqueness within the group is a
/// semantic rule checked by the validator, not here.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TieGroup {
    pub candidates: Vec<String>,
}

/// The preference part of a line: either the explicit empty marker or one or
/// more tie groups in strictly descending preference.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Ranking {
    Empty,
    Groups(Vec<TieGroup>),
}

/// The optional `*n` / `^n` suffix of a line. Both components default to
/// absent; the numeric defaults are applied when building the ballot.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Multiplier {
    pub quantifier: Option<u64>,
    pub weight: Option<u64>,
}

/// The syntax tree of one CEF line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Line {
    pub tags: Option<Vec<String>>,
    pub ranking: Ranking,
    pub multiplier: Multiplier,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParseError {
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        position: usize,
    },
    /// The line ended where another token was still required, e.g. after a
    /// trailing `=`, `>`, `*` or `^`.
    UnexpectedEnd {
        expected: &'static str,
        position: usize,
    },
    DuplicateMultiplierComponent {
        component: &'static str,
        position: usize,
    },
    /// A line with no ranking at all: either zero tokens, or a tag section
    /// with nothing after the `||`.
    EmptyInput,
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(
                f,
                "expected {} at token {}, found {:?}",
                expected, position, found
            ),
            ParseError::UnexpectedEnd { expected, position } => {
                write!(f, "expected {} but the line ended at token {}", expected, position)
            }
            ParseError::DuplicateMultiplierComponent {
                component,
                position,
            } => write!(f, "{} given twice (second one at token {})", component, position),
            ParseError::EmptyInput => write!(f, "no ranking on this line"),
        }
    }
}

/// Prints the canonical CEF text for a line: names space-joined, no spaces
/// around punctuation, quantifier before weight. Parsing the output yields the
/// same `Line` back.
impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(tags) = &self.tags {
            write!(f, "{}||", tags.join(","))?;
        }
        match &self.ranking {
            Ranking::Empty => f.write_str(EMPTY_RANKING_MARKER)?,
            Ranking::Groups(groups) => {
                for (idx, group) in groups.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(">")?;
                    }
                    write!(f, "{}", group.candidates.join("="))?;
                }
            }
        }
        if let Some(q) = self.multiplier.quantifier {
            write!(f, "*{}", q)?;
        }
        if let Some(w) = self.multiplier.weight {
            write!(f, "^{}", w)?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(t) => ParseError::UnexpectedToken {
                expected,
                found: t.clone(),
                position: self.pos,
            },
            None => ParseError::UnexpectedEnd {
                expected,
                position: self.pos,
            },
        }
    }

    /// name := (Word | Integer)+
    ///
    /// Adjacent word tokens with no punctuation in between belong to the same
    /// name and are joined by a single space (the canonical separator).
    fn name(&mut self, expected: &'static str) -> Result<String, ParseError> {
        let mut parts: Vec<String> = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                Token::Word(w) => parts.push(w.clone()),
                Token::Integer(n) => parts.push(n.to_string()),
                _ => break,
            }
            self.advance();
        }
        if parts.is_empty() {
            return Err(self.unexpected(expected));
        }
        Ok(parts.join(" "))
    }

    /// tag_section := name { "," name }, terminated by `||`.
    fn tag_section(&mut self) -> Result<Vec<String>, ParseError> {
        let mut tags = vec![self.name("tag name")?];
        loop {
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                    tags.push(self.name("tag name")?);
                }
                Some(Token::DoublePipe) => {
                    self.advance();
                    return Ok(tags);
                }
                _ => return Err(self.unexpected("',' or '||' after tag")),
            }
        }
    }

    /// tie_group := name { "=" name }
    fn tie_group(&mut self) -> Result<TieGroup, ParseError> {
        let mut candidates = vec![self.name("candidate name")?];
        while let Some(Token::Equals) = self.peek() {
            self.advance();
            candidates.push(self.name("candidate name")?);
        }
        Ok(TieGroup { candidates })
    }

    /// choice_list := "/EMPTY_RANKING/" | tie_group { ">" tie_group }
    fn choice_list(&mut self) -> Result<Ranking, ParseError> {
        // Running out of tokens where the ranking had to start means the
        // line has no ranking at all (e.g. a bare "tag||").
        if self.peek().is_none() {
            return Err(ParseError::EmptyInput);
        }
        if let Some(Token::EmptyMarker) = self.peek() {
            self.advance();
            return Ok(Ranking::Empty);
        }
        let mut groups = vec![self.tie_group()?];
        while let Some(Token::GreaterThan) = self.peek() {
            self.advance();
            groups.push(self.tie_group()?);
        }
        Ok(Ranking::Groups(groups))
    }

    /// Both multiplier components are optional and may come in either order,
    /// but each at most once. A repeat is an error, never an overwrite.
    fn multiplier(&mut self) -> Result<Multiplier, ParseError> {
        let mut multiplier = Multiplier::default();
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    let position = self.pos;
                    self.advance();
                    if multiplier.quantifier.is_some() {
                        return Err(ParseError::DuplicateMultiplierComponent {
                            component: "quantifier",
                            position,
                        });
                    }
                    multiplier.quantifier = Some(self.integer("quantifier value")?);
                }
                Some(Token::Caret) => {
                    let position = self.pos;
                    self.advance();
                    if multiplier.weight.is_some() {
                        return Err(ParseError::DuplicateMultiplierComponent {
                            component: "weight",
                            position,
                        });
                    }
                    multiplier.weight = Some(self.integer("weight value")?);
                }
                _ => return Ok(multiplier),
            }
        }
    }

    fn integer(&mut self, expected: &'static str) -> Result<u64, ParseError> {
        match self.peek() {
            // Lexed from a digit run, so never negative.
            Some(Token::Integer(n)) => {
                self.advance();
                Ok(*n as u64)
            }
            _ => Err(self.unexpected(expected)),
        }
    }
}

/// Parses one tokenized line into its syntax tree.
///
/// The only lookahead needed beyond LL(1) is the scan for `||` that decides
/// whether the line starts with a tag section.
pub fn parse_line(tokens: &[Token]) -> Result<Line, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let tags = if tokens.contains(&Token::DoublePipe) {
        Some(parser.tag_section()?)
    } else {
        None
    };
    let ranking = parser.choice_list()?;
    let multiplier = parser.multiplier()?;
    if parser.peek().is_some() {
        return Err(parser.unexpected("end of line"));
    }
    let line = Line {
        tags,
        ranking,
        multiplier,
    };
    debug!("parse_line: {:?}", line);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(text: &str) -> Result<Line, ParseError> {
        parse_line(&tokenize(text).unwrap())
    }

    fn group(names: &[&str]) -> TieGroup {
        TieGroup {
            candidates: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn simple_ranking() {
        assert_eq!(
            parse("Alice=Bob>Carol*3"),
            Ok(Line {
                tags: None,
                ranking: Ranking::Groups(vec![group(&["Alice", "Bob"]), group(&["Carol"])]),
                multiplier: Multiplier {
                    quantifier: Some(3),
                    weight: None
                },
            })
        );
    }

    #[test]
    fn multi_word_names_merge() {
        assert_eq!(
            parse("John Smith > Mary 2 Jones"),
            Ok(Line {
                tags: None,
                ranking: Ranking::Groups(vec![
                    group(&["John Smith"]),
                    group(&["Mary 2 Jones"])
                ]),
                multiplier: Multiplier::default(),
            })
        );
    }

    #[test]
    fn tags_before_empty_ranking() {
        assert_eq!(
            parse("t1,t2||/EMPTY_RANKING/"),
            Ok(Line {
                tags: Some(vec!["t1".to_string(), "t2".to_string()]),
                ranking: Ranking::Empty,
                multiplier: Multiplier::default(),
            })
        );
    }

    #[test]
    fn multiplier_in_either_order() {
        let a = parse("X>Y^5*2").unwrap();
        let b = parse("X>Y*2^5").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.multiplier,
            Multiplier {
                quantifier: Some(2),
                weight: Some(5)
            }
        );
    }

    #[test]
    fn repeated_component_is_an_error() {
        assert_eq!(
            parse("X*2*3"),
            Err(ParseError::DuplicateMultiplierComponent {
                component: "quantifier",
                position: 3,
            })
        );
        assert_eq!(
            parse("X^2^3"),
            Err(ParseError::DuplicateMultiplierComponent {
                component: "weight",
                position: 3,
            })
        );
    }

    #[test]
    fn double_separator_is_an_error() {
        assert_eq!(
            parse("A>>B"),
            Err(ParseError::UnexpectedToken {
                expected: "candidate name",
                found: Token::GreaterThan,
                position: 2,
            })
        );
    }

    #[test]
    fn empty_marker_forbids_more_groups() {
        assert!(matches!(
            parse("/EMPTY_RANKING/>A"),
            Err(ParseError::UnexpectedToken {
                expected: "end of line",
                ..
            })
        ));
    }

    #[test]
    fn zero_tokens_is_empty_input() {
        assert_eq!(parse_line(&[]), Err(ParseError::EmptyInput));
    }

    #[test]
    fn tags_with_no_ranking_is_empty_input() {
        assert_eq!(parse("t1||"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn truncated_tie_group_is_not_empty_input() {
        assert_eq!(
            parse("A="),
            Err(ParseError::UnexpectedEnd {
                expected: "candidate name",
                position: 2,
            })
        );
        assert_eq!(
            parse("A>"),
            Err(ParseError::UnexpectedEnd {
                expected: "candidate name",
                position: 2,
            })
        );
    }

    #[test]
    fn truncated_multiplier_is_not_empty_input() {
        assert_eq!(
            parse("A*"),
            Err(ParseError::UnexpectedEnd {
                expected: "quantifier value",
                position: 2,
            })
        );
        assert_eq!(
            parse("A^"),
            Err(ParseError::UnexpectedEnd {
                expected: "weight value",
                position: 2,
            })
        );
    }

    #[test]
    fn multiplier_needs_an_integer() {
        assert_eq!(
            parse("A*x"),
            Err(ParseError::UnexpectedToken {
                expected: "quantifier value",
                found: Token::Word("x".to_string()),
                position: 2,
            })
        );
    }

    #[test]
    fn canonical_display_round_trips() {
        for text in [
            "Alice=Bob>Carol*3",
            "t1,t2||/EMPTY_RANKING/",
            "X>Y^5*2",
            "a b c=d>e*10^4",
            "tag one,tag two||A>B",
            "/EMPTY_RANKING/^7",
        ] {
            let parsed = parse(text).unwrap();
            let canonical = parsed.to_string();
            assert_eq!(parse(&canonical), Ok(parsed), "canonical form: {}", canonical);
        }
    }

    #[test]
    fn canonical_display_orders_quantifier_first() {
        assert_eq!(parse("X>Y^5*2").unwrap().to_string(), "X>Y*2^5");
    }
}
