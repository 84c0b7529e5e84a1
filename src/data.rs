//! Batches and datasets for the training loop
//!
//! Training data is an ordered sequence of epochs, each an ordered sequence
//! of batches. Validation data is a single batch list that the loop
//! re-iterates once per epoch.

use ndarray::Array1;
use rand::Rng;

/// One (input, target) batch plus its sample count.
#[derive(Clone, Debug)]
pub struct Batch<I, T> {
    pub input: I,
    pub target: T,
    /// Number of samples in the batch, used to weight loss averages.
    pub size: usize,
}

impl<I, T> Batch<I, T> {
    pub fn new(input: I, target: T, size: usize) -> Self {
        Self {
            input,
            target,
            size,
        }
    }
}

#[derive(Clone, Debug)]
enum TrainData<I, T> {
    /// The same batch list replayed every epoch.
    Repeat(Vec<Batch<I, T>>),
    /// A distinct batch list per epoch; the fit ends early if it runs out.
    Epochs(Vec<Vec<Batch<I, T>>>),
}

/// Training and validation data handed to a [`Learner`](crate::train::Learner).
#[derive(Clone, Debug)]
pub struct DataBunch<I, T> {
    train: TrainData<I, T>,
    valid: Vec<Batch<I, T>>,
}

impl<I, T> DataBunch<I, T> {
    /// Replay `train` every epoch.
    pub fn repeat(train: Vec<Batch<I, T>>, valid: Vec<Batch<I, T>>) -> Self {
        Self {
            train: TrainData::Repeat(train),
            valid,
        }
    }

    /// Use a distinct batch list per epoch.
    pub fn from_epochs(epochs: Vec<Vec<Batch<I, T>>>, valid: Vec<Batch<I, T>>) -> Self {
        Self {
            train: TrainData::Epochs(epochs),
            valid,
        }
    }

    /// Training batches for epoch `epoch`, or `None` when the data has run out.
    pub fn train_epoch(&self, epoch: usize) -> Option<&[Batch<I, T>]> {
        match &self.train {
            TrainData::Repeat(batches) => Some(batches),
            TrainData::Epochs(epochs) => epochs.get(epoch).map(Vec::as_slice),
        }
    }

    /// Validation batches, re-consumed fully once per epoch.
    pub fn valid(&self) -> &[Batch<I, T>] {
        &self.valid
    }

    /// Total number of training batches across the first `epoch_count` epochs.
    pub fn total_train_batches(&self, epoch_count: usize) -> usize {
        match &self.train {
            TrainData::Repeat(batches) => batches.len() * epoch_count,
            TrainData::Epochs(epochs) => epochs
                .iter()
                .take(epoch_count)
                .map(Vec::len)
                .sum(),
        }
    }
}

/// Synthetic regression batches for `y = a*x + b` with optional noise.
///
/// Inputs are drawn uniformly from `[-1, 1)`.
pub fn linear_batches<R: Rng>(
    rng: &mut R,
    a: f32,
    b: f32,
    batch_size: usize,
    batch_count: usize,
    noise: f32,
) -> Vec<Batch<Array1<f32>, Array1<f32>>> {
    (0..batch_count)
        .map(|_| {
            let x: Array1<f32> = (0..batch_size).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let y = x.mapv(|v| a * v + b + noise * rng.gen_range(-1.0..1.0f32));
            Batch::new(x, y, batch_size)
        })
        .collect()
}
