use crate::graph::{EdgeIx, NodeIx};
use geo::Point;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} does not exist in the network")]
    UnknownNode(NodeIx),

    #[error("edge {0:?} does not exist in the network")]
    UnknownEdge(EdgeIx),

    #[error("edge weight must be finite and non-negative, got {0}")]
    InvalidWeight(f64),

    #[error("node position must be a finite coordinate, got {0:?}")]
    InvalidCoordinate(Point),

    #[error("subdivision length must be finite and positive, got {0}")]
    InvalidSubdivision(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("the transition model contains no states")]
    EmptyModel,

    #[error("priors must carry positive, finite mass over at least one state")]
    InvalidPriors,

    #[error("decoded {actual} states for {expected} observations")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("self, unknown and u-turn transitions exceed a total probability of 1 ({0})")]
    TransitionMassExceeded(f64),

    #[error("constraint length must be at least 1")]
    ZeroConstraintLength,

    #[error("could not parse environment variable {name}={value:?}")]
    InvalidVariable { name: String, value: String },
}
