//! Adapters: implementations of the ports, plus the command-line entry.

pub mod inbound;
pub mod outbound;
