//! Latest-wins rate limiting

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait to add coalescing to any Stream
pub trait CoalesceExt: Stream {
    /// Emit at most once per `period`.
    ///
    /// Items arriving between emissions replace each other; only the latest
    /// is delivered. When the inner stream ends, a held item is flushed
    /// before the coalesced stream ends.
    fn coalesce(self, period: Duration) -> Coalesce<Self>
    where
        Self: Sized,
    {
        Coalesce::new(self, period)
    }
}

impl<T: Stream> CoalesceExt for T {}

pin_project! {
    /// Stream for [`CoalesceExt::coalesce`]
    pub struct Coalesce<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        // A tick fired with nothing to deliver; the next item goes out at once.
        armed: bool,
        done: bool,
    }
}

impl<S: Stream> Coalesce<S> {
    pub fn new(stream: S, period: Duration) -> Self {
        let mut interval = interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, interval, pending: None, armed: false, done: false }
    }
}

impl<S: Stream> Stream for Coalesce<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain everything available, keeping only the latest
        while !*this.done {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => break,
            }
        }

        if *this.done {
            return Poll::Ready(this.pending.take());
        }

        if !*this.armed && this.interval.poll_tick(cx).is_ready() {
            *this.armed = true;
        }

        if *this.armed && this.pending.is_some() {
            *this.armed = false;
            return Poll::Ready(this.pending.take());
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_latest() {
        let burst = futures::stream::iter(1..=10);
        let out: Vec<u32> = burst.coalesce(Duration::from_millis(100)).collect().await;
        assert_eq!(out, vec![10]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stream_passes_through() {
        let slow = futures::stream::unfold(0u32, |n| async move {
            if n == 4 {
                return None;
            }
            sleep(Duration::from_millis(200)).await;
            Some((n, n + 1))
        });

        let out: Vec<u32> = slow.coalesce(Duration::from_millis(50)).collect().await;
        assert_eq!(out, vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_stream_is_thinned_and_keeps_last() {
        let fast = futures::stream::unfold(1u32, |n| async move {
            if n > 40 {
                return None;
            }
            sleep(Duration::from_millis(10)).await;
            Some((n, n + 1))
        });

        let out: Vec<u32> = fast.coalesce(Duration::from_millis(100)).collect().await;
        assert!(out.len() <= 6, "{:?}", out);
        assert!(out.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(out.last(), Some(&40));
    }
}
