//! Rating records and the in-memory rating store.

use crate::error::{DataError, DataResult};
use serde::{Deserialize, Serialize};

/// A single user-item interaction.
///
/// User and item IDs are dense and zero-based: a store with `num_users`
/// users contains exactly the IDs `0..num_users`, with no gaps. Loaders
/// remap raw source IDs into this space before constructing a store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Dense zero-based user ID
    pub user_id: usize,
    /// Dense zero-based item ID
    pub item_id: usize,
    /// Rating value (1.0 through 5.0 for MovieLens)
    pub rating: f32,
    /// Unix timestamp of the interaction
    pub timestamp: i64,
}

impl Rating {
    /// Creates a new rating record.
    pub fn new(user_id: usize, item_id: usize, rating: f32, timestamp: i64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            timestamp,
        }
    }
}

/// An in-memory collection of ratings with known user and item dimensions.
///
/// The store owns the canonical ordering of its ratings. Splitters and
/// dataset builders preserve this order so runs are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    num_users: usize,
    num_items: usize,
}

impl RatingStore {
    /// Builds a store from ratings, inferring dimensions from the maximum
    /// IDs present and validating that IDs are dense.
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::MalformedRecord`] if the user or item ID
    /// space has gaps. Gaps would leave unreachable rows in the embedding
    /// tables and usually indicate a remapping bug upstream.
    pub fn from_ratings(ratings: Vec<Rating>) -> DataResult<Self> {
        if ratings.is_empty() {
            return Ok(Self {
                ratings,
                num_users: 0,
                num_items: 0,
            });
        }

        let num_users = ratings.iter().map(|r| r.user_id).max().unwrap_or(0) + 1;
        let num_items = ratings.iter().map(|r| r.item_id).max().unwrap_or(0) + 1;

        let mut user_seen = vec![false; num_users];
        let mut item_seen = vec![false; num_items];
        for r in &ratings {
            user_seen[r.user_id] = true;
            item_seen[r.item_id] = true;
        }
        if let Some(gap) = user_seen.iter().position(|&seen| !seen) {
            return Err(DataError::MalformedRecord {
                message: format!("user ID space has a gap at {} (of {})", gap, num_users),
            });
        }
        if let Some(gap) = item_seen.iter().position(|&seen| !seen) {
            return Err(DataError::MalformedRecord {
                message: format!("item ID space has a gap at {} (of {})", gap, num_items),
            });
        }

        Ok(Self {
            ratings,
            num_users,
            num_items,
        })
    }

    /// Builds a store with explicitly given dimensions, without requiring
    /// the ratings to cover the whole ID space.
    ///
    /// Split outputs use this to carry the parent store's dimensions: a
    /// test partition rarely touches every user, but its IDs still index
    /// the same embedding tables as the training partition.
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::InvalidArgument`] if any rating's IDs fall
    /// outside the given dimensions.
    pub fn with_dims(ratings: Vec<Rating>, num_users: usize, num_items: usize) -> DataResult<Self> {
        for r in &ratings {
            if r.user_id >= num_users || r.item_id >= num_items {
                return Err(DataError::InvalidArgument {
                    message: format!(
                        "rating ({}, {}) outside dimensions ({}, {})",
                        r.user_id, r.item_id, num_users, num_items
                    ),
                });
            }
        }
        Ok(Self {
            ratings,
            num_users,
            num_items,
        })
    }

    /// Number of ratings in the store.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Whether the store holds no ratings.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Number of distinct users in the ID space.
    pub fn num_users(&self) -> usize {
        self.num_users
    }

    /// Number of distinct items in the ID space.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The ratings in store order.
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(user: usize, item: usize, rating: f32) -> Rating {
        Rating::new(user, item, rating, 0)
    }

    #[test]
    fn test_from_ratings_infers_dims() {
        let store =
            RatingStore::from_ratings(vec![r(0, 0, 5.0), r(1, 2, 3.0), r(2, 1, 4.0)]).unwrap();
        assert_eq!(store.num_users(), 3);
        assert_eq!(store.num_items(), 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_from_ratings_rejects_user_gap() {
        let err = RatingStore::from_ratings(vec![r(0, 0, 5.0), r(2, 0, 3.0)]).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn test_from_ratings_rejects_item_gap() {
        let err = RatingStore::from_ratings(vec![r(0, 0, 5.0), r(1, 3, 3.0), r(2, 1, 4.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn test_empty_store() {
        let store = RatingStore::from_ratings(vec![]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.num_users(), 0);
        assert_eq!(store.num_items(), 0);
    }

    #[test]
    fn test_with_dims_allows_sparse_coverage() {
        let store = RatingStore::with_dims(vec![r(5, 7, 2.0)], 10, 10).unwrap();
        assert_eq!(store.num_users(), 10);
        assert_eq!(store.num_items(), 10);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_dims_rejects_out_of_range() {
        let err = RatingStore::with_dims(vec![r(10, 0, 2.0)], 10, 10).unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument { .. }));
    }
}
