use super::Optimizer;
use crate::{arch::Network, gradient::NetGradient, Result};

/// Applies a scaled gradient to every bias and weight of `net`.
///
/// The gradient already points downhill (see `backprop`), so it is *added* to the
/// parameters. The returned network carries the gradient's batch metrics as its training
/// metadata; `net` is left untouched.
///
/// # Arguments
/// * `net` - The current network generation.
/// * `grad` - A gradient with exactly the same topology as `net`.
/// * `learning_rate` - The step length.
///
/// # Returns
/// The next network generation, or an error if `grad` does not match `net`.
pub fn apply_gradient(net: &Network, grad: &NetGradient, learning_rate: f64) -> Result<Network> {
    grad.check_matches(net)?;

    let mut next = net.clone();
    for (layer, g) in next.layers.iter_mut().zip(grad.layers()) {
        layer.biases.scaled_add(learning_rate, g.bias_pd());
        layer.weights.scaled_add(learning_rate, g.weight_pd());
    }

    next.training_metadata = grad.metrics();
    next.validate()?;

    Ok(next)
}

/// Plain gradient steps of a fixed length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStep {
    learning_rate: f64,
}

impl GradientStep {
    /// Returns a new `GradientStep`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `step`.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Optimizer for GradientStep {
    fn step(&mut self, net: &Network, grad: &NetGradient) -> Result<Network> {
        apply_gradient(net, grad, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::{ActFn, TrainingMetadata},
        gradient::compute_batch_gradient,
        init::{build_network, seeded_rng, ConstInit, InitFn},
        NetErr,
    };
    use approx::assert_relative_eq;

    fn net(sizes: &[usize]) -> Network {
        build_network(
            sizes,
            ActFn::relu(),
            &mut InitFn::NormalInit,
            &mut seeded_rng(Some("update")),
        )
        .unwrap()
    }

    #[test]
    fn parameters_move_by_the_scaled_gradient() {
        let n = net(&[2, 3]);
        let mut g = NetGradient::zeros_like(&n);
        g.layers[1].bias_pd[2] = 4.;
        g.layers[1].weight_pd[(0, 1)] = -2.;

        let next = apply_gradient(&n, &g, 0.5).unwrap();

        assert_relative_eq!(next.layers()[1].biases()[2], n.layers()[1].biases()[2] + 2.);
        assert_relative_eq!(
            next.layers()[1].weights()[(0, 1)],
            n.layers()[1].weights()[(0, 1)] - 1.
        );
        assert_eq!(next.layers()[1].weights()[(1, 1)], n.layers()[1].weights()[(1, 1)]);
    }

    #[test]
    fn mismatched_gradient_is_rejected() {
        let g = NetGradient::zeros_like(&net(&[2, 3]));
        let err = apply_gradient(&net(&[2, 4]), &g, 0.1).unwrap_err();

        assert!(matches!(err, NetErr::GradientShape { layer: 1, .. }));
    }

    #[test]
    fn metadata_comes_from_the_batch() {
        let n = net(&[2, 2]);
        let (g, rms, avg) = compute_batch_gradient(&n, &[([1., 0.], [0., 1.])]).unwrap();
        let next = GradientStep::new(0.1).step(&n, &g).unwrap();

        assert_eq!(
            next.training_metadata(),
            Some(TrainingMetadata {
                rms_error: rms,
                avg_error: avg
            })
        );
        assert!(n.training_metadata().is_none());
    }

    #[test]
    fn shape_is_preserved() {
        let n = build_network(
            &[4, 3, 5, 2],
            ActFn::sigmoid(1.),
            &mut ConstInit::new(0.1, 0.3),
            &mut seeded_rng(None),
        )
        .unwrap();
        let (g, _, _) = compute_batch_gradient(&n, &[([1., 2., 3., 4.], [0., 1.])]).unwrap();
        let next = apply_gradient(&n, &g, 1.0).unwrap();

        assert_eq!(next.layer_sizes(), n.layer_sizes());
        for l in 1..next.layers().len() {
            for node in next.layers()[l].nodes() {
                assert_eq!(node.input_weights.len(), next.layer_sizes()[l - 1]);
            }
        }
    }
}
