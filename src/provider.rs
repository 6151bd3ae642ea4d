//! Packet source trait

use crate::Result;

/// Anything that yields raw datagrams.
///
/// Sources do no decoding; the driver hands every buffer to the
/// [`ChannelStore`](crate::store::ChannelStore) so that rejected datagrams
/// are still counted. Each source handles its own timing: sockets block
/// until a datagram arrives, simulated sources sleep between packets.
#[async_trait::async_trait]
pub trait PacketSource: Send + 'static {
    /// Wait for the next datagram.
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` - one datagram, exactly as received
    /// - `Ok(None)` - the source is exhausted (normal termination)
    /// - `Err(e)` - receive failed; the driver retries with backoff
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>>;

    /// Short label for logs.
    fn name(&self) -> &str;
}
