// ********* Output data structures ***********

use std::collections::BTreeSet;

use crate::parser::{Line, Ranking};

/// A normalized ballot, ready for a tabulation consumer.
///
/// Independent of the parsed line that produced it: once built, it carries no
/// reference back to the source text.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    /// The tags of the source line, in source order. Duplicates permitted.
    pub tags: Vec<String>,
    /// Tie groups in strictly descending preference. Empty for a ballot that
    /// expresses no preference.
    pub ranked_groups: Vec<BTreeSet<String>>,
    /// How many identical ballots this line represents.
    pub count: u64,
    /// Per-ballot weight.
    pub weight: u64,
}

/// Converts a validated line into a ballot.
///
/// Total over lines that passed validation; never called otherwise. The
/// quantifier and weight default to 1 when absent.
pub fn build_ballot(line: &Line) -> Ballot {
    let ranked_groups: Vec<BTreeSet<String>> = match &line.ranking {
        Ranking::Empty => Vec::new(),
        Ranking::Groups(groups) => groups
            .iter()
            .map(|g| g.candidates.iter().cloned().collect())
            .collect(),
    };
    Ballot {
        tags: line.tags.clone().unwrap_or_default(),
        ranked_groups,
        count: line.multiplier.quantifier.unwrap_or(1),
        weight: line.multiplier.weight.unwrap_or(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse_line;

    fn ballot(text: &str) -> Ballot {
        build_ballot(&parse_line(&tokenize(text).unwrap()).unwrap())
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn groups_and_count() {
        assert_eq!(
            ballot("Alice=Bob>Carol*3"),
            Ballot {
                tags: vec![],
                ranked_groups: vec![set(&["Alice", "Bob"]), set(&["Carol"])],
                count: 3,
                weight: 1,
            }
        );
    }

    #[test]
    fn empty_ranking_keeps_tags_and_multiplier() {
        assert_eq!(
            ballot("t1,t2||/EMPTY_RANKING/"),
            Ballot {
                tags: vec!["t1".to_string(), "t2".to_string()],
                ranked_groups: vec![],
                count: 1,
                weight: 1,
            }
        );
        assert_eq!(ballot("/EMPTY_RANKING/*4^2").ranked_groups, vec![]);
    }

    #[test]
    fn multipliers_default_to_one() {
        assert_eq!(ballot("A>B"), ballot("A>B*1^1"));
    }

    #[test]
    fn weight_and_quantifier_are_independent() {
        let b = ballot("X>Y^5*2");
        assert_eq!(b.count, 2);
        assert_eq!(b.weight, 5);
    }
}
