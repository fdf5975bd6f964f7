use log::warn;
use ndarray::{Array1, Axis};

use super::{LayerGradient, NetGradient};
use crate::{
    arch::{Activation, Network, NodePos, TrainingMetadata},
    NetErr, Result,
};

/// The error metrics of a single `(input, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleError {
    /// `sqrt(Σ error²)` over the output nodes.
    pub rms: f64,
    /// `mean(|error|)` over the output nodes.
    pub avg: f64,
}

impl SampleError {
    fn new(error: &Array1<f64>) -> Self {
        Self {
            rms: error.mapv(|e| e * e).sum().sqrt(),
            avg: error.mapv(f64::abs).mean().unwrap_or_default(),
        }
    }
}

/// Backpropagates the error of a realized network against `target`.
///
/// The loss is the squared error summed over the output nodes and the gradient points in
/// the direction that *reduces* it: the output `node_pd` is `2 * (target - output)`, so
/// adding the gradient times a positive learning rate moves every parameter downhill.
///
/// Both the weight and the hidden-node derivatives carry the same fan-in normalization the
/// forward pass applies to weighted sums.
///
/// # Arguments
/// * `realized` - A network whose activations come from the forward pass of the sample.
/// * `target` - The expected output.
///
/// # Returns
/// The gradient for this single sample and its error metrics, or an error if `target` does
/// not match the output layer width.
pub fn backprop(realized: &Network, target: &[f64]) -> Result<(NetGradient, SampleError)> {
    let expected = realized.output_len();
    if target.len() != expected {
        return Err(NetErr::ShapeMismatch {
            got: target.len(),
            expected,
        });
    }

    let layers = realized.layers();
    let sizes = realized.layer_sizes();
    let act = realized.activation();
    let last = layers.len() - 1;

    let error = Array1::from_iter(
        target
            .iter()
            .zip(layers[last].values())
            .map(|(t, out)| t - out),
    );

    let mut grads: Vec<LayerGradient> = Vec::with_capacity(layers.len());
    let mut node_pd = error.mapv(|e| 2. * e);

    for l in (0..=last).rev() {
        let layer = &layers[l];

        let delta = Array1::from_iter(layer.pre_activations().iter().enumerate().map(
            |(n, &z)| node_pd[n] * act.df(z, NodePos::new(l, n), sizes),
        ));

        let mut grad = LayerGradient::zeros(layer.len(), layer.fan_in());

        if l > 0 {
            let prev = layers[l - 1].values();
            let fan_in = layer.fan_in() as f64;

            for (n, mut row) in grad.weight_pd.axis_iter_mut(Axis(0)).enumerate() {
                row.zip_mut_with(&prev, |pd, &a| *pd = (a / fan_in) * delta[n]);
            }

            let width = layer.len() as f64;
            let prev_pd = layer.weights().t().dot(&delta) / width;

            grad.node_pd = node_pd;
            grad.bias_pd = delta;
            node_pd = prev_pd;
        } else {
            grad.node_pd = std::mem::take(&mut node_pd);
            grad.bias_pd = delta;
        }

        grads.push(grad);
    }

    grads.reverse();

    let sample_error = SampleError::new(&error);
    if !sample_error.rms.is_finite() {
        warn!("non-finite sample error: {}", sample_error.rms);
    }

    let gradient = NetGradient {
        layers: grads,
        metrics: Some(TrainingMetadata {
            rms_error: sample_error.rms,
            avg_error: sample_error.avg,
        }),
    };

    Ok((gradient, sample_error))
}

/// Computes the average gradient of a batch of `(input, target)` pairs.
///
/// Every pair is evaluated on its own copy of `net`; the per-sample gradients and error
/// metrics are summed and then divided by the batch size. `net` is never modified.
///
/// # Arguments
/// * `net` - The network to differentiate.
/// * `batch` - The training pairs.
///
/// # Returns
/// The averaged gradient (carrying the averaged metrics), the average rms error and the
/// average absolute error, or an error if the batch is empty or a vector has the wrong length.
pub fn compute_batch_gradient<X, Y>(net: &Network, batch: &[(X, Y)]) -> Result<(NetGradient, f64, f64)>
where
    X: AsRef<[f64]>,
    Y: AsRef<[f64]>,
{
    inspect_batch_gradient(net, batch, |_, _| {})
}

/// Like `compute_batch_gradient`, handing every realized network and its target to `inspect`
/// before it is differentiated.
pub(crate) fn inspect_batch_gradient<X, Y, F>(
    net: &Network,
    batch: &[(X, Y)],
    mut inspect: F,
) -> Result<(NetGradient, f64, f64)>
where
    X: AsRef<[f64]>,
    Y: AsRef<[f64]>,
    F: FnMut(&Network, &[f64]),
{
    if batch.is_empty() {
        return Err(NetErr::EmptyBatch);
    }

    let expected = net.output_len();
    if let Some((_, y)) = batch.iter().find(|(_, y)| y.as_ref().len() != expected) {
        return Err(NetErr::ShapeMismatch {
            got: y.as_ref().len(),
            expected,
        });
    }

    let mut sum = NetGradient::zeros_like(net);
    let mut rms_sum = 0.;
    let mut avg_sum = 0.;

    for (x, y) in batch {
        let (_, realized) = net.evaluate(x.as_ref())?;
        inspect(&realized, y.as_ref());
        let (grad, err) = backprop(&realized, y.as_ref())?;

        sum.accumulate(&grad)?;
        rms_sum += err.rms;
        avg_sum += err.avg;
    }

    let n = batch.len();
    sum.average_over(n);

    let rms_error = rms_sum / n as f64;
    let avg_error = avg_sum / n as f64;
    sum.metrics = Some(TrainingMetadata {
        rms_error,
        avg_error,
    });

    Ok((sum, rms_error, avg_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arch::{ActFn, Layer},
        init::{build_network, seeded_rng, InitFn},
    };
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    /// 1 -> 1 identity network with weight `w` and output bias `b`.
    fn line(w: f64, b: f64) -> Network {
        let layers = vec![
            Layer::new(array![0.], Array2::zeros((1, 0))).unwrap(),
            Layer::new(array![b], array![[w]]).unwrap(),
        ];
        Network::from_layers(layers, ActFn::Identity).unwrap()
    }

    #[test]
    fn single_weight_by_hand() {
        // out = 0.5 + 2 * 3 = 6.5, error = 1 - 6.5 = -5.5
        let (_, realized) = line(2., 0.5).evaluate(&[3.]).unwrap();
        let (grad, err) = backprop(&realized, &[1.]).unwrap();

        let out = grad.layers()[1].node(0).unwrap();
        assert_relative_eq!(out.node_pd, -11.);
        assert_relative_eq!(out.bias_pd, -11.);
        assert_relative_eq!(out.weight_pd[0], 3. * -11.);

        let input = grad.layers()[0].node(0).unwrap();
        assert_relative_eq!(input.node_pd, 2. * -11.);
        assert_relative_eq!(input.bias_pd, 2. * -11.);
        assert!(input.weight_pd.is_empty());

        assert_relative_eq!(err.rms, 5.5);
        assert_relative_eq!(err.avg, 5.5);
    }

    #[test]
    fn hidden_pd_is_normalized_by_next_layer_width() {
        // 1 -> 1 -> 2, all weights 1, identity.
        let layers = vec![
            Layer::new(array![0.], Array2::zeros((1, 0))).unwrap(),
            Layer::new(array![0.], array![[1.]]).unwrap(),
            Layer::new(array![0., 0.], array![[1.], [1.]]).unwrap(),
        ];
        let net = Network::from_layers(layers, ActFn::Identity).unwrap();
        let (_, realized) = net.evaluate(&[1.]).unwrap();
        let (grad, _) = backprop(&realized, &[2., 4.]).unwrap();

        // output node_pd = [2, 6]; hidden = (2 + 6) / 2
        assert_eq!(grad.layers()[2].node_pd().to_vec(), vec![2., 6.]);
        assert_relative_eq!(grad.layers()[1].node_pd()[0], 4.);
    }

    #[test]
    fn metrics_per_sample() {
        let layers = vec![
            Layer::new(array![0., 0.], Array2::zeros((2, 0))).unwrap(),
        ];
        let net = Network::from_layers(layers, ActFn::Identity).unwrap();
        let (_, realized) = net.evaluate(&[3., 0.]).unwrap();
        let (_, err) = backprop(&realized, &[0., 4.]).unwrap();

        assert_relative_eq!(err.rms, 5.);
        assert_relative_eq!(err.avg, 3.5);
    }

    #[test]
    fn target_length_is_checked() {
        let net = line(1., 0.);
        let batch = [(vec![1.], vec![1.]), (vec![1.], vec![1., 2.])];

        let err = compute_batch_gradient(&net, &batch).unwrap_err();
        assert!(matches!(err, NetErr::ShapeMismatch { got: 2, expected: 1 }));
    }

    #[test]
    fn empty_batch_fails() {
        let batch: [(Vec<f64>, Vec<f64>); 0] = [];
        assert!(matches!(
            compute_batch_gradient(&line(1., 0.), &batch),
            Err(NetErr::EmptyBatch)
        ));
    }

    #[test]
    fn batch_is_the_mean_of_its_samples() {
        let net = build_network(
            &[3, 4, 2],
            ActFn::sigmoid(1.),
            &mut InitFn::UniformKaiming,
            &mut seeded_rng(Some("batch")),
        )
        .unwrap();
        let a = ([1., 0., 0.5], [1., 0.]);
        let b = ([0., 2., 0.], [0., 1.]);

        let (ga, _, _) = compute_batch_gradient(&net, &[a]).unwrap();
        let (gb, _, _) = compute_batch_gradient(&net, &[b]).unwrap();
        let (gab, rms, avg) = compute_batch_gradient(&net, &[a, b]).unwrap();

        for l in 0..3 {
            let expected = (ga.layers()[l].weight_pd() + gb.layers()[l].weight_pd()) / 2.;
            for (x, y) in gab.layers()[l].weight_pd().iter().zip(expected.iter()) {
                assert_relative_eq!(x, y, epsilon = 1e-15);
            }
        }

        let (ma, mb) = (ga.metrics().unwrap(), gb.metrics().unwrap());
        assert_relative_eq!(rms, (ma.rms_error + mb.rms_error) / 2.);
        assert_relative_eq!(avg, (ma.avg_error + mb.avg_error) / 2.);
        assert_eq!(gab.metrics().unwrap().rms_error, rms);
    }

    #[test]
    fn caller_network_is_untouched() {
        let net = line(2., 0.5);
        let before = net.layers()[1].clone();

        compute_batch_gradient(&net, &[([3.], [1.])]).unwrap();
        assert_eq!(net.layers()[1], before);
    }
}
