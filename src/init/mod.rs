mod builder;
mod constant;
mod param_init;
mod random;
mod seed;

pub use builder::build_network;
pub use constant::ConstInit;
pub use param_init::{NetDraft, ParamInit, ParamSite};
pub use random::InitFn;
pub use seed::{derived_rng, seeded_rng};
