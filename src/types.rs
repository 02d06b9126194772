use std::cmp::Ordering;

use serde::Serialize;

pub type UserId = u64;

/// Candidate entry during top-k accumulation. The ordering is inverted so
/// that the root of a max-heap holds the *weakest* candidate: lower
/// similarity compares greater, and on equal similarity the larger user id
/// compares greater (ascending-id tie-break for the final ranking).
#[derive(PartialEq, Debug, Clone)]
pub(crate) struct SimilarUser {
    pub(crate) user: UserId,
    pub(crate) similarity: f64,
}

impl SimilarUser {
    pub(crate) fn new(user: UserId, similarity: f64) -> Self {
        SimilarUser { user, similarity }
    }
}

impl Eq for SimilarUser {}

impl Ord for SimilarUser {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .similarity
            .total_cmp(&self.similarity)
            .then_with(|| self.user.cmp(&other.user))
    }
}

impl PartialOrd for SimilarUser {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Query result in the payload shape downstream consumers publish.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Neighborhood {
    pub user_id: UserId,
    pub neighbors: Vec<UserId>,
}
