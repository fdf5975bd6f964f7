/// Rectified linear unit, `max(0, z)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Relu;

impl Relu {
    pub fn f(&self, z: f64) -> f64 {
        if z > 0. {
            z
        } else {
            0.
        }
    }

    /// The derivative at exactly `0` is taken to be `0`.
    pub fn df(&self, z: f64) -> f64 {
        if z > 0. {
            1.
        } else {
            0.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negatives() {
        assert_eq!(Relu.f(-2.5), 0.);
        assert_eq!(Relu.f(0.), 0.);
        assert_eq!(Relu.f(1.25), 1.25);
    }

    #[test]
    fn derivative_is_a_step() {
        assert_eq!(Relu.df(-1.), 0.);
        assert_eq!(Relu.df(0.), 0.);
        assert_eq!(Relu.df(1e-9), 1.);
    }
}
