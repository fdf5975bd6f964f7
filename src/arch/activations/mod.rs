mod act_fn;
mod activation;
mod relu;
mod sigmoid;

pub use act_fn::{ActFn, ActFnConfig};
pub use activation::Activation;
pub use relu::Relu;
pub use sigmoid::Sigmoid;
