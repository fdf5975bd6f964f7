use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire engine.
pub type Result<T> = std::result::Result<T, NetErr>;

/// The engine's error type.
#[derive(Debug)]
pub enum NetErr {
    /// The input vector length differs from the width of the input layer.
    InputLength { got: usize, expected: usize },
    /// A target vector length differs from the width of the output layer.
    ShapeMismatch { got: usize, expected: usize },
    /// A gradient is not topologically isomorphic to the network it is applied to.
    GradientShape {
        what: &'static str,
        layer: usize,
        got: usize,
        expected: usize,
    },
    /// A batch with no samples was given.
    EmptyBatch,
    /// The layer structure breaks one of the network invariants.
    InvalidTopology(String),
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// A dataset file is malformed or a record was requested out of bounds.
    Dataset(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::InputLength { got, expected } => write!(
                f,
                "The input vector has {got} values but the input layer has {expected} nodes"
            ),
            NetErr::ShapeMismatch { got, expected } => write!(
                f,
                "The target vector has {got} values but the output layer has {expected} nodes"
            ),
            NetErr::GradientShape {
                what,
                layer,
                got,
                expected,
            } => write!(
                f,
                "The gradient does not match the network at layer {layer}: {what} got {got}, expected {expected}"
            ),
            NetErr::EmptyBatch => write!(f, "Cannot compute the gradient of an empty batch"),
            NetErr::InvalidTopology(msg) => write!(f, "invalid topology: {msg}"),
            NetErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            NetErr::Dataset(msg) => write!(f, "dataset error: {msg}"),
            NetErr::Io(e) => write!(f, "io error: {e}"),
            NetErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Io(e) => Some(e),
            NetErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NetErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
