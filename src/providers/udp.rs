//! UDP socket source

use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{info, trace, warn};

use crate::provider::PacketSource;
use crate::{MonitorError, Result};

/// One bound UDP port.
pub struct UdpSource {
    socket: UdpSocket,
    buf: Vec<u8>,
    name: String,
}

impl UdpSource {
    /// Bind `addr`. Datagrams longer than `max_datagram` bytes are truncated
    /// by the socket and will usually fail to decode.
    pub async fn bind(addr: SocketAddr, max_datagram: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await.map_err(|err| {
            warn!(error = %err, %addr, "UDP socket bind failed");
            MonitorError::source_failed_with(format!("failed to bind {addr}"), Box::new(err))
        })?;
        let local = socket.local_addr()?;
        info!(addr = %local, "UDP source bound");

        Ok(Self { socket, buf: vec![0u8; max_datagram.max(1)], name: format!("udp:{local}") })
    }

    /// Address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

#[async_trait::async_trait]
impl PacketSource for UdpSource {
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        let (len, peer) = self.socket.recv_from(&mut self.buf).await?;
        trace!(source = %self.name, %peer, len, "Datagram received");
        Ok(Some(self.buf[..len].to_vec()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::build_dref_packet;

    #[tokio::test]
    async fn receives_datagram_bytes_unchanged() {
        let mut source = UdpSource::bind("127.0.0.1:0".parse().unwrap(), 2048).await.unwrap();
        let target = source.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let raw = build_dref_packet("sim/test", 42.0);
        sender.send_to(&raw, target).await.unwrap();

        let received = source.next_packet().await.unwrap();
        assert_eq!(received, Some(raw));
        assert!(source.name().starts_with("udp:127.0.0.1:"));
    }

    #[tokio::test]
    async fn bind_conflict_is_a_source_error() {
        let first = UdpSource::bind("127.0.0.1:0".parse().unwrap(), 64).await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = UdpSource::bind(taken, 64).await.err().unwrap();
        assert!(matches!(err, MonitorError::Source { .. }));
        assert!(err.is_retryable());
    }
}
