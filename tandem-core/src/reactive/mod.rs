//! Reactive actuation
//!
//! Sensor magnitude drives pulse intensity. The sensor callback publishes
//! samples into a [`SampleCell`]; the actuation task reads the latest
//! smoothed value each iteration and asks [`ReactiveLoop::step`] what to do.

pub mod control;
pub mod sample;

pub use control::{ReactiveLoop, ReactiveStep};
pub use sample::{ReactiveSample, SampleCell, Smoothing};
