//! Precomputed user-user similarity over a static rating dataset.
//!
//! The pipeline runs once at startup: a CSV of `(userId, rating)` records
//! is collected into per-user rating lists ([`RatingTable`]), padded into a
//! fixed-width sparse matrix ([`RatingMatrix`]), and swept pairwise into an
//! immutable masked-cosine [`SimilarityIndex`]. A [`NeighborhoodService`]
//! then answers top-k nearest-neighbor queries against the index for the
//! lifetime of the process.
//!
//! ```
//! use vecino::{NeighborhoodService, RatingTable};
//!
//! let table = RatingTable::from_lists(vec![
//!     (1, vec![5.0, 3.0]),
//!     (2, vec![5.0, 3.0]),
//!     (3, vec![1.0, 1.0]),
//! ]);
//! let service = NeighborhoodService::new(&table).unwrap();
//!
//! assert_eq!(service.nearest_neighbors(1, 1).unwrap(), vec![2]);
//! ```
//!
//! Rating positions are compared by ingestion order, not by item id; two
//! users' k-th ratings need not concern the same item. The index inherits
//! this alignment assumption from the dataset it was built for.

mod error;
mod matrix;
mod neighbors;
mod ratings;
mod similarity;
mod types;

pub use error::{Error, Result};
pub use matrix::RatingMatrix;
pub use neighbors::{NeighborhoodService, DEFAULT_NEIGHBORS};
pub use ratings::RatingTable;
pub use similarity::SimilarityIndex;
pub use types::{Neighborhood, UserId};
