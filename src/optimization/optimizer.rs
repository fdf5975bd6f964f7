use crate::{arch::Network, gradient::NetGradient, Result};

pub trait Optimizer {
    /// Produces the next generation of `net` from a batch gradient.
    fn step(&mut self, net: &Network, grad: &NetGradient) -> Result<Network>;
}
