//! Per-user train/test splitting of a rating store.

use crate::error::{DataError, DataResult};
use crate::rating::RatingStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Splits a rating store into train and test partitions, withholding a
/// fraction of each user's ratings for test.
///
/// For a user with `c` ratings and test fraction `f`, exactly
/// `ceil(c * f)` of that user's ratings land in the test partition. The
/// withheld ratings are chosen uniformly without replacement, so every
/// user the model trains on is also represented in evaluation (for
/// `f > 0`). Both partitions preserve store order.
///
/// A user with a single rating and `f > 0` contributes that rating to
/// test and nothing to train; with dense IDs their embedding rows still
/// exist, they just receive no updates.
///
/// # Example
///
/// ```
/// use neumf_data::rating::{Rating, RatingStore};
/// use neumf_data::split::UserStratifiedSplitter;
///
/// let store = RatingStore::from_ratings(vec![
///     Rating::new(0, 0, 5.0, 0),
///     Rating::new(0, 1, 3.0, 1),
///     Rating::new(1, 0, 4.0, 2),
///     Rating::new(1, 1, 2.0, 3),
/// ])
/// .unwrap();
///
/// let mut splitter = UserStratifiedSplitter::with_seed(42);
/// let (train, test) = splitter.split(&store, 0.5).unwrap();
/// assert_eq!(train.len() + test.len(), store.len());
/// ```
#[derive(Debug)]
pub struct UserStratifiedSplitter {
    rng: StdRng,
}

impl UserStratifiedSplitter {
    /// Creates a splitter seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a splitter with a fixed seed for reproducible splits.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Splits `store` into `(train, test)` partitions.
    ///
    /// Both partitions carry the parent store's user and item dimensions
    /// so they index the same embedding tables.
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::InvalidArgument`] if `test_fraction` is
    /// outside `[0, 1)` or the store is empty.
    pub fn split(
        &mut self,
        store: &RatingStore,
        test_fraction: f64,
    ) -> DataResult<(RatingStore, RatingStore)> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(DataError::InvalidArgument {
                message: format!(
                    "test fraction must be in [0, 1), got {}",
                    test_fraction
                ),
            });
        }
        if store.is_empty() {
            return Err(DataError::InvalidArgument {
                message: "cannot split an empty rating store".to_string(),
            });
        }

        // Gather each user's rating positions in store order.
        let mut per_user: Vec<Vec<usize>> = vec![Vec::new(); store.num_users()];
        for (pos, rating) in store.ratings().iter().enumerate() {
            per_user[rating.user_id].push(pos);
        }

        let mut in_test = vec![false; store.len()];
        for positions in &per_user {
            let count = positions.len();
            if count == 0 {
                continue;
            }
            let withhold = (count as f64 * test_fraction).ceil() as usize;

            // Partial Fisher-Yates: the first `withhold` slots end up
            // holding a uniform sample without replacement.
            let mut pool: Vec<usize> = positions.clone();
            for i in 0..withhold {
                let j = self.rng.gen_range(i..count);
                pool.swap(i, j);
            }
            for &pos in &pool[..withhold] {
                in_test[pos] = true;
            }
        }

        let mut train = Vec::new();
        let mut test = Vec::new();
        for (pos, rating) in store.ratings().iter().enumerate() {
            if in_test[pos] {
                test.push(*rating);
            } else {
                train.push(*rating);
            }
        }

        info!(
            total = store.len(),
            train = train.len(),
            test = test.len(),
            test_fraction,
            "Split ratings per user"
        );

        let train = RatingStore::with_dims(train, store.num_users(), store.num_items())?;
        let test = RatingStore::with_dims(test, store.num_users(), store.num_items())?;
        Ok((train, test))
    }
}

impl Default for UserStratifiedSplitter {
    fn default() -> Self {
        Self::new()
    }
}
