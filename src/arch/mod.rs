pub mod activations;
mod forward;
mod network;

pub use activations::{ActFn, ActFnConfig, Activation};
pub use network::{Layer, Network, NodePos, NodeView, TrainingMetadata};
