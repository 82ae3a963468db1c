//! Adapter implementations for the ports.

pub mod outbound;
