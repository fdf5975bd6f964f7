use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Activation, Relu, Sigmoid};
use crate::arch::NodePos;

/// The activation strategies a network can be built with.
///
/// The built-in variants ignore the node position; `Custom` hands both the position and the
/// layer sizes to a user supplied strategy.
#[derive(Clone, Debug)]
pub enum ActFn {
    Relu(Relu),
    Sigmoid(Sigmoid),
    Tanh,
    Identity,
    Custom(Arc<dyn Activation>),
}

impl ActFn {
    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn sigmoid(amp: f64) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn custom<A: Activation + 'static>(activation: A) -> Self {
        Self::Custom(Arc::new(activation))
    }
}

impl Activation for ActFn {
    fn f(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64 {
        match self {
            Self::Relu(a) => a.f(value),
            Self::Sigmoid(a) => a.f(value),
            Self::Tanh => value.tanh(),
            Self::Identity => value,
            Self::Custom(a) => a.f(value, pos, layer_sizes),
        }
    }

    fn df(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64 {
        match self {
            Self::Relu(a) => a.df(value),
            Self::Sigmoid(a) => a.df(value),
            Self::Tanh => 1. - value.tanh().powi(2),
            Self::Identity => 1.,
            Self::Custom(a) => a.df(value, pos, layer_sizes),
        }
    }
}

/// The configuration for the built-in `ActFn` variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnConfig {
    Relu,
    Sigmoid { amp: f64 },
    Tanh,
    Identity,
}

impl From<ActFnConfig> for ActFn {
    fn from(config: ActFnConfig) -> Self {
        match config {
            ActFnConfig::Relu => ActFn::relu(),
            ActFnConfig::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnConfig::Tanh => ActFn::Tanh,
            ActFnConfig::Identity => ActFn::Identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear on the output layer, ReLU everywhere else.
    #[derive(Debug)]
    struct LinearOutput;

    impl Activation for LinearOutput {
        fn f(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64 {
            if pos.layer + 1 == layer_sizes.len() {
                value
            } else {
                Relu.f(value)
            }
        }

        fn df(&self, value: f64, pos: NodePos, layer_sizes: &[usize]) -> f64 {
            if pos.layer + 1 == layer_sizes.len() {
                1.
            } else {
                Relu.df(value)
            }
        }
    }

    #[test]
    fn custom_strategy_sees_the_node_position() {
        let act = ActFn::custom(LinearOutput);
        let sizes = [2, 3, 1];

        assert_eq!(act.f(-1., NodePos::new(1, 0), &sizes), 0.);
        assert_eq!(act.f(-1., NodePos::new(2, 0), &sizes), -1.);
        assert_eq!(act.df(-1., NodePos::new(2, 0), &sizes), 1.);
    }

    #[test]
    fn config_names_are_snake_case() {
        let parsed: ActFnConfig = serde_json::from_str(r#"{"sigmoid":{"amp":2.0}}"#).unwrap();
        assert_eq!(parsed, ActFnConfig::Sigmoid { amp: 2.0 });

        let parsed: ActFnConfig = serde_json::from_str(r#""relu""#).unwrap();
        assert_eq!(parsed, ActFnConfig::Relu);
    }

    #[test]
    fn tanh_derivative() {
        let pos = NodePos::new(0, 0);
        assert_eq!(ActFn::Tanh.df(0., pos, &[1]), 1.);
        assert!(ActFn::Tanh.df(3., pos, &[1]) < 0.01);
    }
}
