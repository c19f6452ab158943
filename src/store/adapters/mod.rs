//! Adapter implementations of the credential-store ports.

pub mod memory;
