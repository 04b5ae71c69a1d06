//! Inbound byte queue.
//!
//! The UART receive context produces, the control loop consumes one byte
//! per tick.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ UART RX     │────▶│  Byte Queue  │────▶│  Main Loop   │
//! │ (producer)  │     │  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Backed by `heapless::spsc::Queue`, split into a producer and a consumer
//! half; the two halves may live on different threads or interrupt levels
//! without a lock.

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

use crate::app::ports::ByteSource;

/// Slots in the ring; one stays empty, so 63 bytes can be pending.
pub const RX_QUEUE_CAP: usize = 64;

pub type RxQueue = Queue<u8, RX_QUEUE_CAP>;
pub type RxProducer<'a> = Producer<'a, u8, RX_QUEUE_CAP>;
pub type RxConsumer<'a> = Consumer<'a, u8, RX_QUEUE_CAP>;

/// Bytes dropped because the queue was full.
static RX_OVERRUNS: AtomicU32 = AtomicU32::new(0);

/// Enqueue a received byte. Safe from the receive context (lock-free).
/// Returns `false` if the queue is full and the byte was dropped.
pub fn push_rx_byte(producer: &mut RxProducer<'_>, byte: u8) -> bool {
    if producer.enqueue(byte).is_err() {
        RX_OVERRUNS.fetch_add(1, Ordering::Relaxed);
        return false;
    }
    true
}

/// Total bytes dropped on overrun since boot.
pub fn rx_overruns() -> u32 {
    RX_OVERRUNS.load(Ordering::Relaxed)
}

impl ByteSource for RxConsumer<'_> {
    fn pop(&mut self) -> Option<u8> {
        self.dequeue()
    }
}
