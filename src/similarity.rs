use std::cmp::Ordering;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::matrix::RatingMatrix;

/// Pairwise masked cosine similarity over all users, precomputed eagerly
/// and immutable afterwards. Stored as the strictly upper triangle of the
/// symmetric n x n matrix, row-major, so lookup cost and memory stay flat
/// instead of paying for a pair-keyed map.
pub struct SimilarityIndex {
    num_users: usize,
    pairs: Vec<f64>,
}

impl SimilarityIndex {
    pub fn compute(matrix: &RatingMatrix) -> Self {
        let started = Instant::now();

        let csr = matrix.csr();
        let num_users = matrix.num_users();

        let data = csr.data();
        let indices = csr.indices();
        let indptr = csr.indptr();

        // Pairs are independent, so rows of the triangle are computed in
        // parallel; each row writes its own disjoint output.
        let triangle: Vec<Vec<f64>> = (0..num_users)
            .into_par_iter()
            .map(|i| {
                let range_i = indptr.outer_inds_sz(i);
                let cols_i = &indices[range_i.clone()];
                let vals_i = &data[range_i];

                ((i + 1)..num_users)
                    .map(|j| {
                        let range_j = indptr.outer_inds_sz(j);
                        masked_cosine(cols_i, vals_i, &indices[range_j.clone()], &data[range_j])
                    })
                    .collect()
            })
            .collect();

        let pairs: Vec<f64> = triangle.into_iter().flatten().collect();

        info!(
            "computed {} similarity pairs for {} users in {:?}",
            pairs.len(),
            num_users,
            started.elapsed()
        );

        SimilarityIndex { num_users, pairs }
    }

    /// Similarity between two rows; symmetric, `None` for a row paired
    /// with itself or an out-of-range row.
    pub fn get(&self, row_a: usize, row_b: usize) -> Option<f64> {
        if row_a >= self.num_users || row_b >= self.num_users {
            return None;
        }
        let (i, j) = match row_a.cmp(&row_b) {
            Ordering::Less => (row_a, row_b),
            Ordering::Greater => (row_b, row_a),
            Ordering::Equal => return None,
        };
        Some(self.pairs[self.offset(i, j)])
    }

    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    // Offset of (i, j), i < j, into the row-major upper triangle.
    fn offset(&self, i: usize, j: usize) -> usize {
        i * (2 * self.num_users - i - 1) / 2 + (j - i - 1)
    }
}

/// Cosine over the positions where both rows hold a non-zero value. The
/// inputs are parallel sorted column/value slices of two CSR rows; the
/// 0.0 padding sentinel never contributes to the dot product or to either
/// magnitude. Returns 0.0 when either restricted magnitude vanishes.
pub(crate) fn masked_cosine(
    cols_a: &[usize],
    vals_a: &[f64],
    cols_b: &[usize],
    vals_b: &[f64],
) -> f64 {
    let mut dot = 0.0;
    let mut mag_a = 0.0;
    let mut mag_b = 0.0;

    let mut a = 0;
    let mut b = 0;
    while a < cols_a.len() && b < cols_b.len() {
        match cols_a[a].cmp(&cols_b[b]) {
            Ordering::Less => a += 1,
            Ordering::Greater => b += 1,
            Ordering::Equal => {
                let value_a = vals_a[a];
                let value_b = vals_b[b];
                if value_a != 0.0 && value_b != 0.0 {
                    dot += value_a * value_b;
                    mag_a += value_a * value_a;
                    mag_b += value_b * value_b;
                }
                a += 1;
                b += 1;
            }
        }
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a.sqrt() * mag_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::RatingTable;
    use approx::assert_relative_eq;

    fn index_for(lists: Vec<(u64, Vec<f64>)>) -> SimilarityIndex {
        let table = RatingTable::from_lists(lists);
        let matrix = RatingMatrix::build(&table).unwrap();
        SimilarityIndex::compute(&matrix)
    }

    #[test]
    fn test_identical_vectors() {
        let sim = masked_cosine(&[0, 1], &[5.0, 3.0], &[0, 1], &[5.0, 3.0]);
        assert_relative_eq!(sim, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_common_columns() {
        let sim = masked_cosine(&[0, 2], &[1.0, 2.0], &[1, 3], &[1.0, 2.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_explicit_zero_overlap_has_zero_magnitude() {
        // The only shared column holds a stored zero on one side.
        let sim = masked_cosine(&[0, 1], &[0.0, 2.0], &[0], &[4.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_opposed_vectors_hit_lower_bound() {
        let sim = masked_cosine(&[0, 1], &[1.0, -1.0], &[0, 1], &[-1.0, 1.0]);
        assert_relative_eq!(sim, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_overlap_uses_masked_magnitudes() {
        // Common columns are 1 and 2 only; magnitudes are restricted to
        // those positions, so the result is 1.0 even though the full
        // vectors differ.
        let sim = masked_cosine(&[0, 1, 2], &[9.0, 1.0, 1.0], &[1, 2], &[2.0, 2.0]);
        assert_relative_eq!(sim, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounded_for_any_overlap() {
        let sim = masked_cosine(
            &[0, 1, 3],
            &[2.5, -4.0, 1.0],
            &[1, 2, 3],
            &[3.0, 7.0, -2.0],
        );
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_index_is_symmetric() {
        let index = index_for(vec![
            (1, vec![5.0, 3.0, 1.0]),
            (2, vec![4.0, 2.0]),
            (3, vec![1.0, 5.0, 2.0]),
        ]);

        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    assert_eq!(index.get(i, j), index.get(j, i));
                }
            }
        }
    }

    #[test]
    fn test_no_self_similarity_entry() {
        let index = index_for(vec![(1, vec![1.0]), (2, vec![2.0])]);

        assert_eq!(index.get(0, 0), None);
        assert_eq!(index.get(1, 1), None);
    }

    #[test]
    fn test_out_of_range_row() {
        let index = index_for(vec![(1, vec![1.0]), (2, vec![2.0])]);
        assert_eq!(index.get(0, 5), None);
    }

    #[test]
    fn test_pair_count_is_triangular() {
        let index = index_for(vec![
            (1, vec![1.0]),
            (2, vec![2.0]),
            (3, vec![3.0]),
            (4, vec![4.0]),
        ]);
        assert_eq!(index.pair_count(), 6);
    }

    #[test]
    fn test_known_dataset_similarities() {
        let index = index_for(vec![
            (1, vec![5.0, 3.0]),
            (2, vec![5.0, 3.0]),
            (3, vec![1.0, 1.0]),
        ]);

        let sim_12 = index.get(0, 1).unwrap();
        let sim_13 = index.get(0, 2).unwrap();

        assert_relative_eq!(sim_12, 1.0, epsilon = 1e-12);
        // Full two-position overlap with user 3: 8 / (sqrt(34) * sqrt(2)).
        assert_relative_eq!(sim_13, 8.0 / (34.0_f64.sqrt() * 2.0_f64.sqrt()), epsilon = 1e-12);
        assert!(sim_13 < 1.0);
    }

    #[test]
    fn test_disjoint_effective_positions_score_zero() {
        // User 2's single rating co-occurs only with a zero on user 1's
        // side, so the pair has no usable overlap.
        let index = index_for(vec![(1, vec![0.0, 2.0]), (2, vec![1.0])]);
        assert_eq!(index.get(0, 1), Some(0.0));
    }
}
