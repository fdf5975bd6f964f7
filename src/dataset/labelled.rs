use std::path::Path;

use super::{Dataset, IdxReader, Record, Sample};
use crate::{NetErr, Result};

/// Pairs an IDX image file with its IDX label file.
///
/// Pixels are scaled to `[0, 1]` and labels are one-hot encoded over `classes` outputs.
#[derive(Debug, Clone)]
pub struct LabelledImages {
    images: IdxReader,
    labels: IdxReader,
    classes: usize,
}

impl LabelledImages {
    pub fn new(images: IdxReader, labels: IdxReader, classes: usize) -> Result<Self> {
        let (im, lm) = (images.metadata(), labels.metadata());

        if im.dims.is_none() || lm.dims.is_some() {
            return Err(NetErr::Dataset(
                "expected an image file and a label file".into(),
            ));
        }

        if im.len != lm.len {
            return Err(NetErr::Dataset(format!(
                "{} images but {} labels",
                im.len, lm.len
            )));
        }

        Ok(Self {
            images,
            labels,
            classes,
        })
    }

    pub fn open(images: impl AsRef<Path>, labels: impl AsRef<Path>, classes: usize) -> Result<Self> {
        Self::new(IdxReader::open(images)?, IdxReader::open(labels)?, classes)
    }

    /// Returns the amount of pixels of every image.
    pub fn input_len(&self) -> usize {
        self.images.metadata().record_size()
    }

    pub fn classes(&self) -> usize {
        self.classes
    }
}

impl Dataset for LabelledImages {
    fn len(&self) -> usize {
        self.images.metadata().len
    }

    fn sample(&mut self, index: usize) -> Result<Sample> {
        self.images.set_head_position(index)?;
        self.labels.set_head_position(index)?;

        let (Some(Record::Pixels(pixels)), Some(Record::Label(label))) =
            (self.images.next(), self.labels.next())
        else {
            return Err(NetErr::Dataset(format!("no record at index {index}")));
        };

        let label = label as usize;
        if label >= self.classes {
            return Err(NetErr::Dataset(format!(
                "label {label} at index {index} exceeds {} classes",
                self.classes
            )));
        }

        let input = pixels.into_iter().map(|p| p / 255.).collect();
        let mut target = vec![0.; self.classes];
        target[label] = 1.;

        Ok((input, target))
    }
}
