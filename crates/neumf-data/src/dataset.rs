//! Model-ready dataset encoding of a rating store.

use crate::error::{DataError, DataResult};
use crate::rating::RatingStore;
use neumf_core::{ProblemMode, NUM_RATING_CLASSES};

/// A rating store encoded for training.
///
/// Each example is a `(user_id, item_id)` pair with a label row. For
/// [`ProblemMode::Regression`] the label is the raw rating in a width-1
/// row; for [`ProblemMode::Classification`] it is a one-hot row over the
/// five rating classes, class `k` encoding rating `k + 1`.
#[derive(Debug, Clone)]
pub struct InteractionDataset {
    users: Vec<usize>,
    items: Vec<usize>,
    /// Flat row-major labels, `len * label_width` values
    labels: Vec<f32>,
    label_width: usize,
    num_users: usize,
    num_items: usize,
    mode: ProblemMode,
}

/// A contiguous slice of dataset examples.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// User IDs for the batch
    pub users: &'a [usize],
    /// Item IDs for the batch
    pub items: &'a [usize],
    /// Flat row-major labels, `users.len() * label_width` values
    pub labels: &'a [f32],
    /// Width of each label row
    pub label_width: usize,
}

impl<'a> Batch<'a> {
    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl InteractionDataset {
    /// Encodes a rating store for the given problem mode.
    ///
    /// # Errors
    ///
    /// In classification mode, fails with [`DataError::InvalidArgument`]
    /// for any rating that is not an integer between 1 and 5.
    pub fn from_store(store: &RatingStore, mode: ProblemMode) -> DataResult<Self> {
        let label_width = mode.output_dim();
        let mut users = Vec::with_capacity(store.len());
        let mut items = Vec::with_capacity(store.len());
        let mut labels = Vec::with_capacity(store.len() * label_width);

        for rating in store.ratings() {
            users.push(rating.user_id);
            items.push(rating.item_id);
            match mode {
                ProblemMode::Regression => labels.push(rating.rating),
                ProblemMode::Classification => {
                    let value = rating.rating;
                    if value.fract() != 0.0 || !(1.0..=NUM_RATING_CLASSES as f32).contains(&value) {
                        return Err(DataError::InvalidArgument {
                            message: format!(
                                "rating {} for ({}, {}) is not a class in 1..={}",
                                value, rating.user_id, rating.item_id, NUM_RATING_CLASSES
                            ),
                        });
                    }
                    let class = value as usize - 1;
                    let mut row = [0.0f32; NUM_RATING_CLASSES];
                    row[class] = 1.0;
                    labels.extend_from_slice(&row);
                }
            }
        }

        Ok(Self {
            users,
            items,
            labels,
            label_width,
            num_users: store.num_users(),
            num_items: store.num_items(),
            mode,
        })
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Width of each label row.
    pub fn label_width(&self) -> usize {
        self.label_width
    }

    /// The problem mode the labels were encoded for.
    pub fn mode(&self) -> ProblemMode {
        self.mode
    }

    /// User dimension inherited from the source store.
    pub fn num_users(&self) -> usize {
        self.num_users
    }

    /// Item dimension inherited from the source store.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Returns example `index` as `((user, item), label_row)`.
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::IndexOutOfRange`] past the end.
    pub fn get(&self, index: usize) -> DataResult<((usize, usize), &[f32])> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfRange {
                index,
                length: self.len(),
            });
        }
        let start = index * self.label_width;
        Ok((
            (self.users[index], self.items[index]),
            &self.labels[start..start + self.label_width],
        ))
    }

    /// Iterates over consecutive batches of at most `batch_size` examples.
    /// The final batch may be short.
    ///
    /// # Errors
    ///
    /// Fails with [`DataError::InvalidArgument`] if `batch_size` is zero.
    pub fn batches(&self, batch_size: usize) -> DataResult<Batches<'_>> {
        if batch_size == 0 {
            return Err(DataError::InvalidArgument {
                message: "batch size must be positive".to_string(),
            });
        }
        Ok(Batches {
            dataset: self,
            batch_size,
            cursor: 0,
        })
    }
}

/// Iterator over consecutive dataset batches.
#[derive(Debug)]
pub struct Batches<'a> {
    dataset: &'a InteractionDataset,
    batch_size: usize,
    cursor: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.dataset.len() {
            return None;
        }
        let start = self.cursor;
        let end = (start + self.batch_size).min(self.dataset.len());
        self.cursor = end;
        let width = self.dataset.label_width;
        Some(Batch {
            users: &self.dataset.users[start..end],
            items: &self.dataset.items[start..end],
            labels: &self.dataset.labels[start * width..end * width],
            label_width: width,
        })
    }
}
