//! Comment vote tally types.
//!
//! Each voter holds at most one vote per comment, either up or down. The
//! tally is derived from those votes; the score is ups minus downs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::fields::is_blank;
use crate::validation::rules::{FieldError, FieldErrorKind};

/// Longest accepted comment text, in characters.
pub const MAX_COMMENT_TEXT_CHARS: u64 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Stored weight of a single vote.
    pub fn weight(self) -> i16 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// Aggregated votes for one comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub num_vote_up: i64,
    pub num_vote_down: i64,
    pub vote_score: i64,
}

impl VoteTally {
    pub fn from_counts(num_vote_up: i64, num_vote_down: i64) -> Self {
        Self {
            num_vote_up,
            num_vote_down,
            vote_score: num_vote_up - num_vote_down,
        }
    }
}

/// Trim a voter name, rejecting blanks.
pub fn normalize_voter(voter: &str) -> Result<String, CoreError> {
    if is_blank(voter) {
        return Err(CoreError::Invalid(vec![FieldError::new(
            "voter",
            FieldErrorKind::MissingField,
            "This field is required.",
        )]));
    }
    Ok(voter.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn weights_are_opposite() {
        assert_eq!(VoteDirection::Up.weight(), 1);
        assert_eq!(VoteDirection::Down.weight(), -1);
    }

    #[test]
    fn tally_score_is_ups_minus_downs() {
        let tally = VoteTally::from_counts(5, 7);
        assert_eq!(tally.vote_score, -2);
        assert_eq!(VoteTally::default().vote_score, 0);
    }

    #[test]
    fn tally_serializes_camel_case() {
        let json = serde_json::to_value(VoteTally::from_counts(2, 1)).unwrap();
        assert_eq!(json["numVoteUp"], 2);
        assert_eq!(json["numVoteDown"], 1);
        assert_eq!(json["voteScore"], 1);
    }

    #[test]
    fn voter_must_not_be_blank() {
        assert_eq!(normalize_voter("  ana ").unwrap(), "ana");
        assert_matches!(normalize_voter("   "), Err(CoreError::Invalid(ref e)) if e[0].field == "voter");
    }
}
