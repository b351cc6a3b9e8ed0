//! Wall-clock abstraction
//!
//! Scheduling compares absolute epoch-millisecond instants so that two
//! devices given the same target start together without clock sync.

pub use tandem_protocol::Timestamp;

/// Source of the current wall-clock instant
pub trait Clock {
    /// Current instant in epoch milliseconds
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
