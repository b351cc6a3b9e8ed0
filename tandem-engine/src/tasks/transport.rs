//! Transport task
//!
//! Owns the peer channel. Encodes outbound messages, tracks whether the peer
//! is reachable and reports reachability changes back to the controller.

use tandem_core::state::Intent;
use tandem_core::traits::PeerChannel;
use tandem_core::EngineError;

use crate::channels::{EngineChannels, Outbound};
use crate::fmt::{debug, info, trace, warn};

/// Transport task - delivers outbound messages to the peer
///
/// Returns after a close request.
pub async fn transport_task<P: PeerChannel>(channels: &EngineChannels, peer: &mut P) {
    info!("Transport task started");

    // Matches the controller's initial assumption
    let mut reachable = true;
    channels.set_peers_available(peer.has_peers());

    loop {
        match channels.outbound.receive().await {
            Outbound::Send(message) => {
                let payload = match message.encode() {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Dropping unencodable {:?}: {:?}", message.route(), e);
                        continue;
                    }
                };

                let result = if peer.has_peers() {
                    peer.send(message.route(), &payload)
                } else {
                    Err(EngineError::ChannelUnreachable)
                };
                match result {
                    Ok(()) => trace!("Sent {} ({} bytes)", message.route().path(), payload.len()),
                    Err(e) => debug!("Send on {} failed: {:?}", message.route().path(), e),
                }

                let delivered = result.is_ok();
                channels.set_peers_available(delivered);
                if delivered != reachable {
                    let intent = if delivered {
                        Intent::PeerDelivered
                    } else {
                        Intent::PeerUnreachable
                    };
                    // Unreported changes are retried on the next send
                    match channels.intents.try_send(intent) {
                        Ok(()) => {
                            reachable = delivered;
                            if delivered {
                                info!("Peer reachable");
                            } else {
                                warn!("Peer unreachable, running local-only");
                            }
                        }
                        Err(_) => warn!("Intent channel full, reachability report deferred"),
                    }
                }
            }
            Outbound::Rediscover => {
                debug!("Rediscovering peers");
                peer.rediscover();
                channels.set_peers_available(peer.has_peers());
            }
            Outbound::Close => {
                info!("Transport closed");
                return;
            }
        }
    }
}
