//! Data model: wire-format structs independent of the decoding machinery
//! that produces them (see the `parser` module for that).

pub mod bgp;
pub mod mrt;
pub mod network;

pub use bgp::*;
pub use mrt::*;
pub use network::*;
