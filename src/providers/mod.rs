//! Packet source implementations
//!
//! - [`UdpSource`] receives datagrams from the simulator
//! - [`SampleSource`] replays the bundled sample packets on a timer
//! - [`QueueSource`] yields buffers pushed through a channel, for tests and
//!   embedding

pub mod queue;
pub mod sample;
pub mod udp;

pub use queue::QueueSource;
pub use sample::SampleSource;
pub use udp::UdpSource;
