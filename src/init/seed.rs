use rand::{rngs::StdRng, SeedableRng};

/// Builds the generator used to initialize a network.
///
/// A string seed is hashed into the 32 byte `StdRng` seed, so the same seed always yields the
/// same network. Without a seed the generator is seeded from the OS.
pub fn seeded_rng(seed: Option<&str>) -> StdRng {
    match seed {
        Some(seed) => StdRng::from_seed(*blake3::hash(seed.as_bytes()).as_bytes()),
        None => StdRng::from_os_rng(),
    }
}

/// Builds an independent generator for a named `stream` of the same seed.
pub fn derived_rng(seed: Option<&str>, stream: &str) -> StdRng {
    match seed {
        Some(seed) => seeded_rng(Some(&format!("{seed}/{stream}"))),
        None => StdRng::from_os_rng(),
    }
}
