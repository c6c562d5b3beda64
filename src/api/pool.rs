//! Connection accounting for one transport
//!
//! reqwest keeps idle sockets itself but has no cap on how many requests are
//! in flight. [`ConnectionPool`] adds that cap: a request holds a
//! [`PoolPermit`] for its whole round trip and the permit goes back to the
//! pool when dropped, on success and error paths alike.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ConnectionPool {
    capacity: usize,
    acquire_timeout: Duration,
    in_use: Mutex<usize>,
    released: Condvar,
}

impl ConnectionPool {
    pub fn new(capacity: usize, acquire_timeout: Duration) -> Self {
        Self {
            capacity,
            acquire_timeout,
            in_use: Mutex::new(0),
            released: Condvar::new(),
        }
    }

    /// Block until a slot is free or `acquire_timeout` passes.
    ///
    /// Returns the time spent waiting on failure.
    pub fn acquire(&self) -> Result<PoolPermit<'_>, Duration> {
        let started = Instant::now();
        let deadline = started + self.acquire_timeout;
        let mut in_use = self.in_use.lock();

        while *in_use >= self.capacity {
            if self.released.wait_until(&mut in_use, deadline).timed_out()
                && *in_use >= self.capacity
            {
                return Err(started.elapsed());
            }
        }

        *in_use += 1;
        Ok(PoolPermit { pool: self })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        *self.in_use.lock()
    }

    fn release(&self) {
        let mut in_use = self.in_use.lock();
        *in_use = in_use.saturating_sub(1);
        self.released.notify_one();
    }
}

/// A claimed slot; returned to its pool on drop.
#[derive(Debug)]
pub struct PoolPermit<'a> {
    pool: &'a ConnectionPool,
}

impl Drop for PoolPermit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_permit_released_on_drop() {
        let pool = ConnectionPool::new(2, Duration::from_millis(50));
        {
            let _a = pool.acquire().expect("first permit");
            let _b = pool.acquire().expect("second permit");
            assert_eq!(pool.in_use(), 2);
        }
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_acquire_times_out_when_exhausted() {
        let pool = ConnectionPool::new(1, Duration::from_millis(20));
        let _held = pool.acquire().expect("first permit");

        let waited = pool.acquire().expect_err("pool should be exhausted");
        assert!(waited >= Duration::from_millis(20));
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn test_permit_released_when_holder_errors() {
        let pool = ConnectionPool::new(1, Duration::from_millis(20));

        let failing = || -> Result<(), &'static str> {
            let _permit = pool.acquire().map_err(|_| "exhausted")?;
            Err("request failed")
        };
        assert!(failing().is_err());
        assert_eq!(pool.in_use(), 0);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn test_waiter_wakes_on_release() {
        let pool = Arc::new(ConnectionPool::new(1, Duration::from_secs(5)));
        let permit = pool.acquire().expect("first permit");

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.acquire().map(|_| ()).is_ok())
        };

        thread::sleep(Duration::from_millis(20));
        drop(permit);

        assert!(waiter.join().expect("waiter thread panicked"));
        assert_eq!(pool.in_use(), 0);
    }
}
