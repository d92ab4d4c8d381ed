//! # Outbound Ports (Driven Ports / SPI)

/// Abstract wall clock, so the replay window can be tested deterministically.
pub trait TimeSource: Send + Sync {
    /// Current time in unix seconds.
    fn now(&self) -> i64;
}
