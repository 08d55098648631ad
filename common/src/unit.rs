//! Tags telling what a [`DateTimeOf`] stands for.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Moment something was created at.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Moment something stops being valid at.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
