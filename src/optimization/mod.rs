mod gradient_step;
mod optimizer;

pub use gradient_step::{apply_gradient, GradientStep};
pub use optimizer::Optimizer;
