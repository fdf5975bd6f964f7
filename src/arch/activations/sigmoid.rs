#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sigmoid {
    amp: f64,
}

impl Sigmoid {
    pub fn new(amp: f64) -> Self {
        Self { amp }
    }

    pub fn f(&self, z: f64) -> f64 {
        self.amp / (1. + (-z).exp())
    }

    pub fn df(&self, z: f64) -> f64 {
        let s = 1. / (1. + (-z).exp());
        self.amp * s * (1. - s)
    }
}

impl Default for Sigmoid {
    fn default() -> Self {
        Self::new(1.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn midpoint_is_half_the_amplitude() {
        let s = Sigmoid::new(3.0);
        assert_relative_eq!(s.f(0.0), 1.5);
        assert_relative_eq!(s.df(0.0), 0.75);
    }

    #[test]
    fn derivative_matches_central_difference() {
        let s = Sigmoid::default();
        let h = 1e-6;

        for z in [-4.0, -0.5, 0.3, 2.0] {
            let numeric = (s.f(z + h) - s.f(z - h)) / (2. * h);
            assert_relative_eq!(s.df(z), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn derivative_saturates_without_overflow() {
        let s = Sigmoid::new(2.0);

        for z in [-800.0, 800.0] {
            assert!(s.df(z).is_finite());
            assert_relative_eq!(s.df(z), 0.0);
        }
        assert_eq!(s.f(-800.0), 0.0);
    }
}
