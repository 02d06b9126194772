use sprs::{CsMat, TriMat};

use crate::error::{Error, Result};
use crate::ratings::RatingTable;
use crate::types::UserId;

/// Zero-padded rating matrix of shape (num users x longest rating list),
/// row-indexed by user ingestion order. Stored as CSR: padding positions,
/// and real 0.0 ratings (indistinguishable from padding by construction),
/// are simply not stored.
pub struct RatingMatrix {
    representations: CsMat<f64>,
    user_ids: Vec<UserId>,
}

impl RatingMatrix {
    pub fn build(table: &RatingTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let num_users = table.num_users();
        let max_ratings = table
            .iter()
            .map(|(_, list)| list.len())
            .max()
            .unwrap_or(0);

        let mut triplets = TriMat::new((num_users, max_ratings));
        for (row, (_, list)) in table.iter().enumerate() {
            for (col, &value) in list.iter().enumerate() {
                if value != 0.0 {
                    triplets.add_triplet(row, col, value);
                }
            }
        }

        let representations: CsMat<f64> = triplets.to_csr();

        Ok(RatingMatrix {
            representations,
            user_ids: table.user_ids().to_vec(),
        })
    }

    pub fn num_users(&self) -> usize {
        self.representations.rows()
    }

    pub fn max_ratings(&self) -> usize {
        self.representations.cols()
    }

    /// User ids in row order.
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    /// Materializes one padded row.
    pub fn dense_row(&self, row: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.max_ratings()];
        if let Some(view) = self.representations.outer_view(row) {
            for (col, &value) in view.iter() {
                dense[col] = value;
            }
        }
        dense
    }

    pub(crate) fn csr(&self) -> &CsMat<f64> {
        &self.representations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_padded_to_longest_list() {
        let table = RatingTable::from_lists(vec![
            (1, vec![5.0, 3.0, 4.0]),
            (2, vec![2.0, 1.0, 3.0, 4.0, 5.0]),
        ]);

        let matrix = RatingMatrix::build(&table).unwrap();

        assert_eq!(matrix.num_users(), 2);
        assert_eq!(matrix.max_ratings(), 5);
        assert_eq!(matrix.dense_row(0), vec![5.0, 3.0, 4.0, 0.0, 0.0]);
        assert_eq!(matrix.dense_row(1), vec![2.0, 1.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_row_order_follows_ingestion_order() {
        let table = RatingTable::from_lists(vec![
            (9, vec![1.0]),
            (4, vec![2.0]),
            (7, vec![3.0]),
        ]);

        let matrix = RatingMatrix::build(&table).unwrap();

        assert_eq!(matrix.user_ids(), &[9, 4, 7]);
        assert_eq!(matrix.dense_row(0), vec![1.0]);
        assert_eq!(matrix.dense_row(2), vec![3.0]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = RatingTable::from_lists(vec![]);
        let result = RatingMatrix::build(&table);

        assert!(matches!(result, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_explicit_zero_rating_reads_back_as_padding() {
        let table = RatingTable::from_lists(vec![(1, vec![0.0, 2.0]), (2, vec![1.0])]);
        let matrix = RatingMatrix::build(&table).unwrap();

        assert_eq!(matrix.dense_row(0), vec![0.0, 2.0]);
        assert_eq!(matrix.csr().nnz(), 2);
    }
}
