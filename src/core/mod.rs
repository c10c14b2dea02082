//! Shared records and error types for the compositing and dynamics engines.
//!
//! Nothing here depends on the tile/projection system or on the paint
//! pipeline; collaborators talk to this crate only through these types.

pub mod contracts;
pub mod errors;
