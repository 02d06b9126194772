use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::UserId;

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    rating: Option<f64>,
}

/// Per-user rating lists in ingestion order: the first user id encountered
/// in the stream becomes row 0 of the matrix built from this table, and
/// each user's ratings keep their append order. Positions are NOT aligned
/// to items across users.
pub struct RatingTable {
    user_ids: Vec<UserId>,
    ratings: HashMap<UserId, Vec<f64>>,
}

impl RatingTable {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a headered CSV with `userId` and `rating` columns; other
    /// columns are ignored. Records with an empty rating are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut user_ids = Vec::new();
        let mut ratings: HashMap<UserId, Vec<f64>> = HashMap::new();
        let mut skipped = 0usize;

        for record in csv_reader.deserialize() {
            let record: RatingRecord = record.map_err(Error::MalformedRecord)?;

            let Some(rating) = record.rating else {
                skipped += 1;
                continue;
            };

            let per_user = ratings.entry(record.user_id).or_insert_with(|| {
                user_ids.push(record.user_id);
                Vec::new()
            });
            per_user.push(rating);
        }

        debug!(
            "ingested {} users, skipped {} unrated records",
            user_ids.len(),
            skipped
        );

        Ok(RatingTable { user_ids, ratings })
    }

    /// Fixture constructor, mostly for tests and examples.
    pub fn from_lists(lists: Vec<(UserId, Vec<f64>)>) -> Self {
        let mut user_ids = Vec::with_capacity(lists.len());
        let mut ratings = HashMap::with_capacity(lists.len());
        for (user_id, list) in lists {
            if !ratings.contains_key(&user_id) {
                user_ids.push(user_id);
            }
            ratings.entry(user_id).or_insert_with(Vec::new).extend(list);
        }
        RatingTable { user_ids, ratings }
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    /// User ids in ingestion order, the row order of the built matrix.
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn ratings_of(&self, user: UserId) -> Option<&[f64]> {
        self.ratings.get(&user).map(Vec::as_slice)
    }

    /// Iterates (user id, rating list) in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, &[f64])> {
        self.user_ids
            .iter()
            .map(move |user| (*user, self.ratings[user].as_slice()))
    }
}
