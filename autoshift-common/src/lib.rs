#![no_std]
pub mod globals;
pub mod keycodes;

/// Version tag written at the start of a compiled settings image.
pub const PROTOCOL_VERSION: u16 = 1;
