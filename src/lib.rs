#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod graph;
pub mod transition;
pub mod util;

#[cfg(test)]
pub(crate) mod fixtures;

#[doc(inline)]
pub use config::MatchConfig;
#[doc(inline)]
pub use error::{ConfigError, Error, GraphError, MatchError};
#[doc(inline)]
pub use graph::{Network, NetworkBuilder};
#[doc(inline)]
pub use transition::{Matcher, Observation, State};

pub type Result<T> = std::result::Result<T, Error>;
