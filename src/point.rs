use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::{const_rwlock, RwLock};

use crate::log::report_fire;
use crate::config::INFINITE_RAW;
use crate::Times;

/// A named injection point.
///
/// Points are normally declared with [`errsim_point!`](crate::errsim_point),
/// which also registers them with the global [`Registry`](crate::Registry).
/// The point's state is only changed through the registry (or an
/// [`ErrsimGuard`](crate::ErrsimGuard)); production code only ever calls
/// [`check`](ErrsimPoint::check).
pub struct ErrsimPoint {
    name: &'static str,

    // 0 == inactive.  Published last by `arm`.
    code: AtomicI32,

    // INFINITE_RAW == infinite, > 0 == fires left, anything else ==
    // exhausted.  Racing decrements can leave it briefly below 0.
    remaining: AtomicI32,

    // Empty matches every key.
    match_key: RwLock<String>,
}

impl ErrsimPoint {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            code: AtomicI32::new(0),
            remaining: AtomicI32::new(0),
            match_key: const_rwlock(String::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the point is armed and could fire on a matching
    /// call.
    pub fn is_active(&self) -> bool {
        self.code.load(Ordering::Acquire) != 0
    }

    /// Called at each injection site.  Returns the configured error code
    /// if the point fires for `key`, otherwise 0.
    ///
    /// An inactive point costs a single atomic load.  A point activated
    /// with a key filter only fires for calls whose `key` is equal to
    /// it; the empty key matches only unfiltered activations.
    #[inline]
    pub fn check(&self, key: &str) -> i32 {
        let code = self.code.load(Ordering::Acquire);
        if code == 0 {
            return 0;
        }
        self.check_active(code, key)
    }

    #[cold]
    fn check_active(&self, code: i32, key: &str) -> i32 {
        {
            let match_key = self.match_key.read();
            if !match_key.is_empty() && *match_key != key {
                return 0;
            }
        }

        let remaining = self.remaining.load(Ordering::Acquire);
        if remaining != INFINITE_RAW {
            if remaining <= 0 {
                // Exhausted, possibly mid-way through another caller's
                // back-off.
                let _ = self.remaining.compare_exchange(
                    remaining,
                    0,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                self.switch_off(code);
                return 0;
            }

            let prev = self.remaining.fetch_sub(1, Ordering::AcqRel);
            if prev <= 0 {
                // Someone else took the last fire.
                self.remaining.store(0, Ordering::Release);
                self.switch_off(code);
                return 0;
            }
            if prev == 1 {
                self.switch_off(code);
            }
        }

        report_fire(self.name, code, key);
        code
    }

    // Clears the code unless a concurrent re-activation already replaced
    // it.
    fn switch_off(&self, code: i32) {
        let _ = self
            .code
            .compare_exchange(code, 0, Ordering::AcqRel, Ordering::Acquire);
    }

    pub(crate) fn arm(&self, code: i32, match_key: &str, times: Times) {
        let remaining = times.to_raw();
        let code = if remaining == 0 { 0 } else { code };

        // Unpublish first so no reader pairs the old code with the new
        // filter or budget.
        self.code.store(0, Ordering::Release);
        {
            let mut k = self.match_key.write();
            k.clear();
            k.push_str(match_key);
        }
        self.remaining.store(remaining, Ordering::Release);
        self.code.store(code, Ordering::Release);
    }

    pub(crate) fn disarm(&self) {
        self.code.store(0, Ordering::Release);
        self.remaining.store(0, Ordering::Release);
        self.match_key.write().clear();
    }
}

impl fmt::Debug for ErrsimPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrsimPoint")
            .field("name", &self.name)
            .field("code", &self.code.load(Ordering::Relaxed))
            .field("remaining", &self.remaining.load(Ordering::Relaxed))
            .field("match_key", &*self.match_key.read())
            .finish()
    }
}
