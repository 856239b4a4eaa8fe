//! The four record-family decoders dispatched on by [`crate::parser`]'s
//! dispatch loop.

pub mod bgp4mp;
pub mod table_dump;
pub mod table_dump_v2;
