use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{NetDraft, ParamInit, ParamSite};

/// The configuration-selectable random initializers. Biases always start at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitFn {
    /// `U(0, 1) * 2 / fan_in`.
    #[default]
    NormalInit,
    /// `U(0, 1) * 2 / sqrt(fan_in * fan_out)`.
    UniformKaiming,
}

impl<R: Rng> ParamInit<R> for InitFn {
    fn sample(&mut self, rng: &mut R, site: ParamSite, draft: &NetDraft<'_>) -> f64 {
        let ParamSite::Weight { layer, .. } = site else {
            return 0.;
        };

        let fan_in = draft.fan_in(layer);
        if fan_in == 0 {
            return 0.;
        }

        let u: f64 = rng.random();
        match self {
            InitFn::NormalInit => u * 2. / fan_in as f64,
            InitFn::UniformKaiming => {
                let fan_out = draft.fan_out(layer);
                u * 2. / ((fan_in * fan_out) as f64).sqrt()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const SIZES: [usize; 3] = [4, 9, 2];

    fn draft() -> NetDraft<'static> {
        NetDraft {
            layer_sizes: &SIZES,
            layers: &[],
        }
    }

    #[test]
    fn biases_start_at_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let site = ParamSite::NodeBias { layer: 1, node: 0 };

        assert_eq!(InitFn::NormalInit.sample(&mut rng, site, &draft()), 0.);
        assert_eq!(InitFn::UniformKaiming.sample(&mut rng, site, &draft()), 0.);
    }

    #[test]
    fn normal_init_is_bounded_by_fan_in() {
        let mut rng = StdRng::seed_from_u64(7);

        for node in 0..SIZES[2] {
            for weight in 0..SIZES[1] {
                let site = ParamSite::Weight {
                    layer: 2,
                    node,
                    weight,
                };
                let w = InitFn::NormalInit.sample(&mut rng, site, &draft());
                assert!((0. ..2. / 9.).contains(&w), "{w}");
            }
        }
    }

    #[test]
    fn kaiming_is_bounded_by_fan_in_and_fan_out() {
        let mut rng = StdRng::seed_from_u64(7);
        let bound = 2. / ((4 * 9) as f64).sqrt();

        for _ in 0..100 {
            let site = ParamSite::Weight {
                layer: 1,
                node: 0,
                weight: 0,
            };
            let w = InitFn::UniformKaiming.sample(&mut rng, site, &draft());
            assert!((0. ..bound).contains(&w), "{w}");
        }
    }

    #[test]
    fn config_names() {
        let parsed: InitFn = serde_json::from_str(r#""uniform_kaiming""#).unwrap();
        assert_eq!(parsed, InitFn::UniformKaiming);
    }
}
