//! Channel-fed source

use tokio::sync::mpsc;

use crate::Result;
use crate::provider::PacketSource;

/// Yields whatever is pushed through its sender, ending once every sender is
/// dropped and the queue is drained.
pub struct QueueSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl QueueSource {
    /// Source plus the sender that feeds it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }
}

#[async_trait::async_trait]
impl PacketSource for QueueSource {
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }

    fn name(&self) -> &str {
        "queue"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_then_ends() {
        let (tx, mut source) = QueueSource::channel(4);
        tx.send(b"DATA*".to_vec()).await.unwrap();
        tx.send(b"junk".to_vec()).await.unwrap();
        drop(tx);

        assert_eq!(source.next_packet().await.unwrap(), Some(b"DATA*".to_vec()));
        assert_eq!(source.next_packet().await.unwrap(), Some(b"junk".to_vec()));
        assert_eq!(source.next_packet().await.unwrap(), None);
    }
}
