use super::{Dataset, Sample};
use crate::{NetErr, Result};

/// An in-memory dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairs {
    samples: Vec<Sample>,
}

impl Pairs {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl FromIterator<Sample> for Pairs {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Dataset for Pairs {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn sample(&mut self, index: usize) -> Result<Sample> {
        self.samples.get(index).cloned().ok_or_else(|| {
            NetErr::Dataset(format!(
                "sample {index} requested from a dataset of {} samples",
                self.samples.len()
            ))
        })
    }
}
