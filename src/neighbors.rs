use std::collections::{BinaryHeap, HashMap};
use std::io::Read;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::matrix::RatingMatrix;
use crate::ratings::RatingTable;
use crate::similarity::SimilarityIndex;
use crate::types::{Neighborhood, SimilarUser, UserId};

pub const DEFAULT_NEIGHBORS: usize = 10;

/// Process-wide neighbor-query service: the ordered user population plus
/// the precomputed similarity index. Built once at startup, then queried
/// through `&self` only, so it can be shared across threads freely.
pub struct NeighborhoodService {
    user_ids: Vec<UserId>,
    row_of: HashMap<UserId, usize>,
    index: SimilarityIndex,
}

impl NeighborhoodService {
    /// Builds the full pipeline: ingestion-ordered table, padded matrix,
    /// eager pairwise index. Any failure aborts construction outright;
    /// a partially built service never exists.
    pub fn new(table: &RatingTable) -> Result<Self> {
        let matrix = RatingMatrix::build(table)?;
        let index = SimilarityIndex::compute(&matrix);

        let user_ids = matrix.user_ids().to_vec();
        let row_of = user_ids
            .iter()
            .enumerate()
            .map(|(row, &user)| (user, row))
            .collect();

        info!("similarity index ready for {} users", user_ids.len());

        Ok(NeighborhoodService {
            user_ids,
            row_of,
            index,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let table = RatingTable::from_reader(reader)?;
        Self::new(&table)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = RatingTable::from_csv_path(path)?;
        Self::new(&table)
    }

    /// Up to `k` other users ranked by descending precomputed similarity,
    /// equal scores broken by ascending user id. Fails with `UnknownUser`
    /// for an id outside the loaded population.
    pub fn nearest_neighbors(&self, user: UserId, k: usize) -> Result<Vec<UserId>> {
        let row = *self.row_of.get(&user).ok_or(Error::UnknownUser(user))?;

        let mut topk: BinaryHeap<SimilarUser> = BinaryHeap::with_capacity(k);
        for (other_row, &other_user) in self.user_ids.iter().enumerate() {
            if other_row == row {
                continue;
            }
            let similarity = self.index.get(row, other_row).unwrap_or(0.0);
            let candidate = SimilarUser::new(other_user, similarity);

            if topk.len() < k {
                topk.push(candidate);
            } else if let Some(mut top) = topk.peek_mut() {
                if candidate < *top {
                    *top = candidate;
                }
            }
        }

        Ok(topk
            .into_sorted_vec()
            .into_iter()
            .map(|similar| similar.user)
            .collect())
    }

    /// `nearest_neighbors` with the payload shape downstream publishers use.
    pub fn neighborhood(&self, user: UserId, k: usize) -> Result<Neighborhood> {
        let neighbors = self.nearest_neighbors(user, k)?;
        Ok(Neighborhood {
            user_id: user,
            neighbors,
        })
    }

    /// Precomputed similarity between two known users; `None` when either
    /// id is unknown or the ids are equal.
    pub fn similarity(&self, a: UserId, b: UserId) -> Option<f64> {
        let row_a = *self.row_of.get(&a)?;
        let row_b = *self.row_of.get(&b)?;
        self.index.get(row_a, row_b)
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    /// Known user ids in ingestion order.
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }
}
