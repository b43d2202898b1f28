//! Background tasks module
//! 
//! This module contains the timer tasks that run alongside the controller.

pub mod countdown;

// Re-export main types
pub use countdown::Countdown;
