//! Fixed-capacity moving average over the most recent temperature samples.
//!
//! The buffer is a plain slice with a write cursor, a read cursor and a
//! `filled` flag. It moves through three states:
//!
//! - **Empty** — no sample recorded yet; [`MovingAverage::mean`] fails.
//! - **Partial** — `k < N` samples recorded; the mean divides by `k`.
//! - **Full** — at least `N` samples recorded; the oldest sample is evicted on
//!   every update and the mean divides by `N`.

use crate::error::{Error, Result};

/// How much of the window currently holds live samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Empty,
    /// Number of live samples, always below capacity.
    Partial(usize),
    Full,
}

/// Circular buffer computing the arithmetic mean of the last `N` samples.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: Vec<f64>,
    /// Slot the next sample is written to.
    write: usize,
    /// Slot holding the oldest live sample.
    read: usize,
    filled: bool,
}

impl MovingAverage {
    /// Create an empty window with room for `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self {
            values: vec![0.0; capacity],
            write: 0,
            read: 0,
            filled: false,
        })
    }

    /// Record a sample, evicting the oldest one once the window is full.
    pub fn update(&mut self, value: f64) {
        let capacity = self.capacity();
        let was_full = self.filled;
        self.values[self.write] = value;
        self.write = (self.write + 1) % capacity;
        if self.write == 0 {
            self.filled = true;
        }
        // The overwritten slot held the oldest sample; once full the read
        // cursor always sits on the write cursor.
        if was_full {
            self.read = (self.read + 1) % capacity;
        }
    }

    /// Arithmetic mean of every live sample.
    pub fn mean(&self) -> Result<f64> {
        let count = self.len();
        if count == 0 {
            return Err(Error::EmptyAverage);
        }
        let sum: f64 = self.iter().sum();
        Ok(sum / count as f64)
    }

    /// Live samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let capacity = self.capacity();
        (0..self.len()).map(move |i| self.values[(self.read + i) % capacity])
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Number of live samples.
    pub fn len(&self) -> usize {
        if self.filled {
            self.capacity()
        } else {
            self.write
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the window has wrapped at least once. Never reverts.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn fill(&self) -> Fill {
        match (self.filled, self.write) {
            (true, _) => Fill::Full,
            (false, 0) => Fill::Empty,
            (false, k) => Fill::Partial(k),
        }
    }
}
