mod backprop;
mod net_gradient;

pub(crate) use backprop::inspect_batch_gradient;
pub use backprop::{backprop, compute_batch_gradient, SampleError};
pub use net_gradient::{LayerGradient, NetGradient, NodeGradient};
