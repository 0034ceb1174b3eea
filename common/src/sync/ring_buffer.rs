use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A fixed-capacity single-producer/single-consumer byte queue.
///
/// `RingBuffer` lets one context push bytes while another pops them without
/// a lock. It is meant to sit between an interrupt handler and application
/// code on a single core: the interrupt handler produces into a receive
/// buffer that the application drains, and the application produces into a
/// transmit buffer that the interrupt handler drains.
///
/// `head` and `tail` are free-running counters; the slot index is the
/// counter masked by `N - 1`, which is why `N` must be a power of two.
/// Only plain atomic loads and stores are used, so the buffer also works on
/// cores without compare-and-swap.
///
/// # Roles
///
/// For a given buffer, at most one context may call the producer methods
/// ([`try_push`](Self::try_push)) and at most one context may call the
/// consumer methods ([`try_pop`](Self::try_pop), [`peek`](Self::peek)).
/// Breaking that rule does not cause undefined behavior in the safe API but
/// may lose or duplicate bytes.
///
/// # Type Parameters
///
/// * `N` - Capacity in bytes. Must be a non-zero power of two.
pub struct RingBuffer<const N: usize> {
    buffer: UnsafeCell<[u8; N]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// SAFETY: a slot is only written by the producer while it is outside the
// occupied range and only read by the consumer while it is inside it. The
// Release store of `head` publishes the byte before the consumer can see it,
// and the Release store of `tail` hands the slot back before the producer can
// reuse it.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}
unsafe impl<const N: usize> Send for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = N - 1;

    /// Creates an empty buffer.
    ///
    /// Fails to compile if `N` is zero or not a power of two.
    ///
    /// # Example
    ///
    /// ```
    /// use common::sync::RingBuffer;
    ///
    /// static RX: RingBuffer<64> = RingBuffer::new();
    /// assert!(RX.is_empty());
    /// ```
    pub const fn new() -> Self {
        const {
            assert!(N.is_power_of_two(), "RingBuffer capacity must be a power of two");
        }

        Self {
            buffer: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Total number of bytes the buffer can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends a byte.
    ///
    /// Returns `false` and leaves the buffer untouched if it is full.
    /// Producer side only.
    pub fn try_push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N {
            return false;
        }

        // SAFETY: the slot at `head` is free, and the consumer will not read
        // it until the store to `head` below makes it visible.
        unsafe {
            (*self.buffer.get())[head & Self::MASK] = byte;
        }

        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Removes and returns the oldest byte, or `None` if the buffer is empty.
    ///
    /// Consumer side only.
    pub fn try_pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        // SAFETY: the slot at `tail` is occupied, and the producer will not
        // overwrite it until the store to `tail` below releases it.
        let byte = unsafe { (*self.buffer.get())[tail & Self::MASK] };

        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Returns the oldest byte without removing it.
    ///
    /// Consumer side only.
    pub fn peek(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        // SAFETY: same reasoning as `try_pop`, without releasing the slot.
        Some(unsafe { (*self.buffer.get())[tail & Self::MASK] })
    }

    /// Number of bytes currently stored.
    pub fn available(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    /// Number of bytes that can be pushed before the buffer is full.
    pub fn free(&self) -> usize {
        N - self.available()
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    pub fn is_full(&self) -> bool {
        self.available() == N
    }

    /// Discards all stored bytes by moving `head` back to `tail`.
    ///
    /// Only call this while the other side of the buffer is quiescent, for
    /// example while the owning channel's interrupt is masked.
    pub fn flush(&self) {
        let tail = self.tail.load(Ordering::Acquire);
        self.head.store(tail, Ordering::Release);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let rb = RingBuffer::<8>::new();
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.available(), 0);
        assert_eq!(rb.capacity(), 8);
        assert_eq!(rb.try_pop(), None);
        assert_eq!(rb.peek(), None);
    }

    #[test]
    fn test_fifo_order() {
        let rb = RingBuffer::<4>::new();
        assert!(rb.try_push(0x41));
        assert!(rb.try_push(0x42));
        assert!(rb.try_push(0x43));
        assert_eq!(rb.peek(), Some(0x41));
        assert_eq!(rb.try_pop(), Some(0x41));
        assert_eq!(rb.try_pop(), Some(0x42));
        assert_eq!(rb.try_pop(), Some(0x43));
        assert_eq!(rb.try_pop(), None);
    }

    #[test]
    fn test_push_to_full_buffer_is_rejected() {
        let rb = RingBuffer::<4>::new();
        for b in 1..=4 {
            assert!(rb.try_push(b));
        }
        assert!(rb.is_full());
        assert_eq!(rb.free(), 0);

        assert!(!rb.try_push(0xFF));
        assert_eq!(rb.available(), 4);

        // Existing contents are intact.
        for b in 1..=4 {
            assert_eq!(rb.try_pop(), Some(b));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn test_available_tracks_accepted_pushes_minus_pops() {
        let rb = RingBuffer::<8>::new();
        let mut accepted = 0usize;
        let mut popped = 0usize;

        // Deterministic mixed sequence that wraps the indices many times.
        for step in 0..1000u32 {
            if step % 3 == 2 {
                if rb.try_pop().is_some() {
                    popped += 1;
                }
            } else if rb.try_push(step as u8) {
                accepted += 1;
            }

            assert_eq!(rb.available(), accepted - popped);
            assert!(rb.available() <= rb.capacity());
        }
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let rb = RingBuffer::<4>::new();
        let mut next_in = 0u8;
        let mut next_out = 0u8;

        for _ in 0..50 {
            while rb.try_push(next_in) {
                next_in = next_in.wrapping_add(1);
            }
            for _ in 0..3 {
                assert_eq!(rb.try_pop(), Some(next_out));
                next_out = next_out.wrapping_add(1);
            }
        }
    }

    #[test]
    fn test_flush_discards_contents() {
        let rb = RingBuffer::<8>::new();
        rb.try_push(1);
        rb.try_push(2);
        rb.try_pop();
        rb.try_push(3);

        rb.flush();
        assert!(rb.is_empty());
        assert_eq!(rb.try_pop(), None);

        assert!(rb.try_push(9));
        assert_eq!(rb.try_pop(), Some(9));
    }

    #[test]
    fn test_spsc_across_threads() {
        use std::sync::Arc;

        let rb = Arc::new(RingBuffer::<16>::new());
        let producer = {
            let rb = Arc::clone(&rb);
            std::thread::spawn(move || {
                for b in 0..=255u8 {
                    while !rb.try_push(b) {
                        std::hint::spin_loop();
                    }
                }
            })
        };

        let mut expected = 0u16;
        while expected <= 255 {
            if let Some(b) = rb.try_pop() {
                assert_eq!(b as u16, expected);
                expected += 1;
            }
        }

        producer.join().unwrap();
        assert!(rb.is_empty());
    }
}
