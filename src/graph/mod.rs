//! The directed road network the matcher decodes against.
//!
//! A [`Network`] owns every node and edge. Identifiers are handed out by the
//! [`NetworkBuilder`] arena and are plain indices, so edges and nodes never
//! hold references to one another and all mutation goes through the network.
//!
//! Positions are geodetic, stored as [`geo::Point`] with `x` as longitude
//! and `y` as latitude.

pub mod builder;
pub mod item;
pub mod network;
pub mod subdivide;


#[doc(inline)]
pub use builder::NetworkBuilder;
#[doc(inline)]
pub use item::*;
#[doc(inline)]
pub use network::{Network, Successor};
