use std::fmt::Debug;

use crate::arch::NodePos;

/// An activation function paired with its derivative.
///
/// Both functions receive the pre-activation value of a node, the node's position and the
/// declared width of every layer, so a strategy may behave differently per layer (a linear
/// output layer, for example). `df` must be the true derivative of `f` with respect to `value`;
/// the gradient engine relies on it being evaluated at the pre-activation value.
pub trait Activation: Debug + Send + Sync {
    fn f(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64;

    fn df(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64;
}
