//! Peer message channel trait

use tandem_protocol::Route;

use crate::error::EngineError;

/// Reliable, unordered-across-routes message channel to the paired device
///
/// Inbound messages are not part of this trait: the platform hands them to
/// the engine as `(route, bytes)` pairs.
pub trait PeerChannel {
    /// Check whether any peer node is currently connected
    fn has_peers(&self) -> bool;

    /// Send a payload on a route to all connected peers
    ///
    /// Returns [`EngineError::ChannelUnreachable`] when no peer is connected.
    fn send(&mut self, route: Route, payload: &[u8]) -> Result<(), EngineError>;

    /// Ask the platform to look for peer nodes again
    fn rediscover(&mut self);
}
