// ********* Semantic validation ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

use crate::parser::{Line, Ranking};

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ValidationError {
    /// The same candidate appears in two different tie groups.
    DuplicateCandidate(String),
    /// The same candidate appears twice within one tie group.
    TiedSelfDuplicate(String),
    ZeroQuantifier,
    ZeroWeight,
    EmptyTagName,
}

impl Error for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is ranked at more than one position", name)
            }
            ValidationError::TiedSelfDuplicate(name) => {
                write!(f, "candidate {:?} is tied with itself", name)
            }
            ValidationError::ZeroQuantifier => write!(f, "ballot quantifier must be at least 1"),
            ValidationError::ZeroWeight => write!(f, "ballot weight must be at least 1"),
            ValidationError::EmptyTagName => write!(f, "tag names may not be empty"),
        }
    }
}

/// Checks the cross-field rules the grammar alone cannot express.
///
/// The checks run in a fixed order and the first failure wins. Validation
/// never mutates the line; it only accepts or rejects.
pub fn validate(line: &Line) -> Result<(), ValidationError> {
    if let Ranking::Groups(groups) = &line.ranking {
        // A candidate may only occur at one preference position. Names seen
        // in earlier groups are compared against each later group; repeats
        // inside a single group are left for the dedicated check below.
        let mut seen_before: HashSet<&str> = HashSet::new();
        for group in groups {
            for name in &group.candidates {
                if seen_before.contains(name.as_str()) {
                    return Err(ValidationError::DuplicateCandidate(name.clone()));
                }
            }
            seen_before.extend(group.candidates.iter().map(|s| s.as_str()));
        }

        for group in groups {
            let mut seen: HashSet<&str> = HashSet::new();
            for name in &group.candidates {
                if !seen.insert(name.as_str()) {
                    return Err(ValidationError::TiedSelfDuplicate(name.clone()));
                }
            }
        }
    }

    if line.multiplier.quantifier == Some(0) {
        return Err(ValidationError::ZeroQuantifier);
    }
    if line.multiplier.weight == Some(0) {
        return Err(ValidationError::ZeroWeight);
    }

    // Structurally near-impossible after parsing, checked all the same.
    if let Some(tags) = &line.tags {
        if tags.iter().any(|t| t.is_empty()) {
            return Err(ValidationError::EmptyTagName);
        }
    }

    Ok(())
}
