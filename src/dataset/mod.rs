mod idx;
mod labelled;
mod pairs;

pub use idx::{IdxMetadata, IdxReader, Record};
pub use labelled::LabelledImages;
pub use pairs::Pairs;

use crate::Result;

/// An `(input, target)` training pair.
pub type Sample = (Vec<f64>, Vec<f64>);

/// A source of training pairs addressable by index.
pub trait Dataset {
    /// Returns the amount of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the sample at `index`.
    fn sample(&mut self, index: usize) -> Result<Sample>;
}
