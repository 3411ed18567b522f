//! Feeding a raw trace through the decoder.
//!
//! An [`Observation`] is a single GPS fix. The [`Interpolator`] fills long
//! hops between consecutive fixes with synthetic observations, and the
//! [`TraceSession`] drives each of them through the decoder, pairing every
//! final decision with the observation it belongs to.

pub mod feeder;
pub mod interpolate;
pub mod matched;
pub mod observation;


#[doc(inline)]
pub use feeder::TraceSession;
#[doc(inline)]
pub use interpolate::Interpolator;
#[doc(inline)]
pub use matched::{MatchedObservation, MatchedTrace};
#[doc(inline)]
pub use observation::Observation;
