use super::{activations::Activation, Network, NodePos};
use crate::{NetErr, Result};

impl Network {
    /// Makes a forward pass through the network.
    ///
    /// The network itself is left untouched; the activations are computed on an independent
    /// copy which is returned alongside the output so the caller may adopt it.
    ///
    /// Weighted sums are always divided by the width of the previous layer, so a node's
    /// pre-activation stays within the range of its weights no matter how wide the layer
    /// feeding it is.
    ///
    /// # Arguments
    /// * `input` - One value per input node.
    ///
    /// # Returns
    /// The output layer values and the realized network, or an error if `input` does not
    /// match the input layer width.
    pub fn evaluate(&self, input: &[f64]) -> Result<(Vec<f64>, Network)> {
        let mut realized = self.clone();
        realized.forward_in_place(input)?;
        Ok((realized.output(), realized))
    }

    pub(crate) fn forward_in_place(&mut self, input: &[f64]) -> Result<()> {
        let expected = self.input_len();
        if input.len() != expected {
            return Err(NetErr::InputLength {
                got: input.len(),
                expected,
            });
        }

        let Self {
            layers,
            layer_sizes,
            activation,
            ..
        } = self;

        let first = &mut layers[0];
        for (n, &x) in input.iter().enumerate() {
            let z = first.biases[n] + x;
            first.pre_activations[n] = z;
            first.values[n] = activation.f(z, NodePos::new(0, n), layer_sizes);
        }

        for l in 1..layers.len() {
            let (done, rest) = layers.split_at_mut(l);
            let prev = done[l - 1].values.view();
            let fan_in = prev.len() as f64;
            let layer = &mut rest[0];

            for n in 0..layer.len() {
                let weighted_sum = layer.weights.row(n).dot(&prev) / fan_in;
                let z = layer.biases[n] + weighted_sum;
                layer.pre_activations[n] = z;
                layer.values[n] = activation.f(z, NodePos::new(l, n), layer_sizes);
            }
        }

        Ok(())
    }
}
