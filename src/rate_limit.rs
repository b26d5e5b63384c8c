//! Per-key request quota over a rolling window.
//!
//! Counters live in a bounded LRU. Each call refreshes the key's expiry, so
//! the counter only resets after a full window without calls (or once the
//! key was evicted to make room for newer keys).

use std::num::NonZeroUsize;
use std::time::Duration;

use log::warn;
use lru::LruCache;
use parking_lot::Mutex;

/// Keys tracked before the least recently used one is evicted.
pub const DEFAULT_UNIQUE_KEYS: usize = 500;
/// One hour.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Millisecond wall clock.
pub trait Clock {
	/// Milliseconds since the Unix epoch.
	fn now_millis(&self) -> u64;
}

/// `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	#[cfg(target_arch = "wasm32")]
	fn now_millis(&self) -> u64 {
		js_sys::Date::now() as u64
	}

	#[cfg(not(target_arch = "wasm32"))]
	fn now_millis(&self) -> u64 {
		std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|d| d.as_millis() as u64)
			.unwrap_or_default()
	}
}

/// Outcome of one [`RateLimiter::check_limit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitDecision {
	/// Whether this call fits under the limit.
	pub allowed: bool,
	/// The limit the call was checked against.
	pub limit: u32,
	/// Calls left before the key is rejected.
	pub remaining: u32,
}

#[derive(Clone, Copy, Debug)]
struct Counter {
	count: u32,
	expires_at: u64,
}

/// In-memory limiter keyed by strings such as `interaction:{person_id}`.
pub struct RateLimiter<C = SystemClock> {
	window: Duration,
	clock: C,
	counters: Mutex<LruCache<String, Counter>>,
}

impl RateLimiter<SystemClock> {
	/// Limiter on the system clock.
	pub fn new(window: Duration, unique_keys: usize) -> Self {
		Self::with_clock(window, unique_keys, SystemClock)
	}
}

impl Default for RateLimiter<SystemClock> {
	fn default() -> Self {
		Self::new(DEFAULT_WINDOW, DEFAULT_UNIQUE_KEYS)
	}
}

impl<C: Clock> RateLimiter<C> {
	/// Limiter on a caller-supplied clock.
	pub fn with_clock(window: Duration, unique_keys: usize, clock: C) -> Self {
		let capacity = NonZeroUsize::new(unique_keys).unwrap_or(NonZeroUsize::MIN);
		Self {
			window,
			clock,
			counters: Mutex::new(LruCache::new(capacity)),
		}
	}

	/// Counts one call for `key` and reports whether it fits under `limit`.
	///
	/// Lookup, increment and compare happen under one lock, so the first call
	/// of a fresh window is always allowed when `limit >= 1`.
	pub fn check_limit(&self, key: &str, limit: u32) -> RateLimitDecision {
		let now = self.clock.now_millis();
		let window = u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX);

		let mut counters = self.counters.lock();
		let count = match counters.get(key) {
			Some(existing) if existing.expires_at > now => existing.count,
			_ => 0,
		};
		// Every counted call pushes the expiry out again.
		let counter = Counter {
			count: count.saturating_add(1),
			expires_at: now.saturating_add(window),
		};
		counters.put(key.to_string(), counter);
		drop(counters);

		let decision = RateLimitDecision {
			allowed: counter.count <= limit,
			limit,
			remaining: limit.saturating_sub(counter.count),
		};
		if !decision.allowed {
			warn!("rate limit exceeded for {key}: {} calls, limit {limit}", counter.count);
		}
		decision
	}

	/// Quiet time after which a key starts over.
	pub fn window(&self) -> Duration {
		self.window
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::Clock;

	#[derive(Clone, Default)]
	pub struct ManualClock(Rc<Cell<u64>>);

	impl ManualClock {
		pub fn advance(&self, millis: u64) {
			self.0.set(self.0.get() + millis);
		}
	}

	impl Clock for ManualClock {
		fn now_millis(&self) -> u64 {
			self.0.get()
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::testing::ManualClock;
	use super::*;

	fn limiter(clock: &ManualClock) -> RateLimiter<ManualClock> {
		RateLimiter::with_clock(Duration::from_secs(60), 500, clock.clone())
	}

	#[test]
	fn first_call_is_allowed() {
		let limiter = limiter(&ManualClock::default());
		assert_eq!(
			limiter.check_limit("user-1", 5),
			RateLimitDecision {
				allowed: true,
				limit: 5,
				remaining: 4
			}
		);
	}

	#[test]
	fn sixth_call_in_window_is_rejected() {
		let limiter = limiter(&ManualClock::default());
		for expected in (0..5).rev() {
			let decision = limiter.check_limit("user-1", 5);
			assert!(decision.allowed);
			assert_eq!(decision.remaining, expected);
		}
		assert_eq!(
			limiter.check_limit("user-1", 5),
			RateLimitDecision {
				allowed: false,
				limit: 5,
				remaining: 0
			}
		);
	}

	#[test]
	fn keys_are_independent() {
		let limiter = limiter(&ManualClock::default());
		assert!(limiter.check_limit("a", 1).allowed);
		assert!(!limiter.check_limit("a", 1).allowed);
		assert!(limiter.check_limit("b", 1).allowed);
	}

	#[test]
	fn counter_resets_after_quiet_window() {
		let clock = ManualClock::default();
		let limiter = limiter(&clock);
		assert!(limiter.check_limit("a", 1).allowed);
		clock.advance(59_999);
		assert!(!limiter.check_limit("a", 1).allowed);
		clock.advance(60_000);
		let decision = limiter.check_limit("a", 1);
		assert!(decision.allowed);
		assert_eq!(decision.remaining, 0);
	}

	#[test]
	fn each_call_extends_the_window() {
		let clock = ManualClock::default();
		let limiter = limiter(&clock);
		assert!(limiter.check_limit("a", 2).allowed);
		clock.advance(40_000);
		assert!(limiter.check_limit("a", 2).allowed);
		clock.advance(20_000);
		// 60 s after the first call but only 20 s after the last one.
		assert_eq!(
			limiter.check_limit("a", 2),
			RateLimitDecision {
				allowed: false,
				limit: 2,
				remaining: 0
			}
		);
		clock.advance(60_000);
		assert!(limiter.check_limit("a", 2).allowed);
	}

	#[test]
	fn evicted_keys_start_over() {
		let clock = ManualClock::default();
		let limiter = RateLimiter::with_clock(Duration::from_secs(60), 1, clock);
		assert!(limiter.check_limit("a", 1).allowed);
		assert!(limiter.check_limit("b", 1).allowed);
		assert!(limiter.check_limit("a", 1).allowed);
	}

	#[test]
	fn zero_limit_never_allows() {
		let limiter = limiter(&ManualClock::default());
		assert_eq!(limiter.check_limit("a", 0).remaining, 0);
		assert!(!limiter.check_limit("a", 0).allowed);
	}
}
