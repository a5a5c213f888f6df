//! Errsim is a deterministic error injection system for tests.
//!
//! An injection point is a named place in production code where a test
//! can make the code fail on demand.  Points are declared once, at
//! module scope, with [`errsim_point!`]:
//!
//! ```rust
//! # use errsim::errsim_point;
//! errsim_point!(EP_STORAGE_OFFLOAD);
//! # fn main() {}
//! ```
//!
//! and checked wherever a failure should be simulated, using
//! [`errsim_inject!`].  The last argument is what to do instead of the
//! normal path when the point fires:
//!
//! ```rust
//! # use errsim::{errsim_inject, errsim_point};
//! # errsim_point!(EP_STORAGE_OFFLOAD);
//! # struct Kv { key: String }
//! fn offload(batch: &[Kv]) -> usize {
//!     let mut stored = 0;
//!     for kv in batch {
//!         errsim_inject!(EP_STORAGE_OFFLOAD, kv.key, continue);
//!         stored += 1;
//!     }
//!     stored
//! }
//! # fn main() {}
//! ```
//!
//! [`errsim_inject_err!`] is a shorthand for returning an error from
//! the enclosing function.
//!
//! A point does nothing until a test activates it by name.  An
//! activation carries an error code (nonzero), an optional key filter
//! and a fire budget:
//!
//! ```rust
//! # use errsim::{errsim_point, Times};
//! errsim_point!(EP_WRITE);
//!
//! fn main() {
//! #   if !errsim::is_enabled() { return; }
//!     errsim::activate("EP_WRITE", 7, "", Times::Finite(2));
//!
//!     assert_eq!(7, EP_WRITE.check("a"));
//!     assert_eq!(7, EP_WRITE.check("a"));
//!     assert_eq!(0, EP_WRITE.check("a")); // budget used up
//! }
//! ```
//!
//! When the key filter is non-empty, the point only fires for calls
//! whose key equals it.  [`reset`] deactivates a point; an
//! [`ErrsimGuard`] does the same automatically when it goes out of
//! scope, so an activation never leaks into the next test:
//!
//! ```rust
//! # use errsim::{errsim_point, ErrsimGuard};
//! errsim_point!(EP_OFFLOAD);
//!
//! fn main() {
//! #   if !errsim::is_enabled() { return; }
//!     {
//!         let _g = ErrsimGuard::with_key(&EP_OFFLOAD, 5, "k2");
//!         assert_eq!(0, EP_OFFLOAD.check("k1"));
//!         assert_eq!(5, EP_OFFLOAD.check("k2"));
//!     }
//!     assert_eq!(0, EP_OFFLOAD.check("k2"));
//! }
//! ```
//!
//! Activation is process-wide: every thread sees it.  Each time a point
//! fires an INFO event is emitted with `tracing` (target `errsim`); a
//! callback installed with [`set_logger`] receives a copy.
//!
//! Points can also be activated from the `ERRSIM` environment variable,
//! see [`parse_config`] and [`activate_from_env`].
//!
//! # Release builds
//!
//! Injection is compiled in only when the `errsim_enabled` feature
//! (on by default) is set and debug assertions are on.  Otherwise every
//! type and function keeps its signature but does nothing: points
//! never fire, [`lookup`] returns `None` and the macros expand to
//! nothing that runs.  [`is_enabled`] tells which mode is compiled.

mod config;
mod macros;

pub use config::{activate_from_env, parse_config, ConfigError, Times, Trigger, ENV_VAR};

#[cfg(all(feature = "errsim_enabled", debug_assertions))]
mod guard;
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
mod log;
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
mod point;
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
mod registry;

#[cfg(all(feature = "errsim_enabled", debug_assertions))]
pub use guard::ErrsimGuard;
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
pub use log::{set_logger, Logger};
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
pub use point::ErrsimPoint;
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
pub use registry::Registry;

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
mod stub;

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
pub use stub::{set_logger, ErrsimGuard, ErrsimPoint, Logger, Registry};

// HIDDEN DOC:
//
// Has to be public so that it can be reached from the macro expansions
// in other crates, but it is not part of the public interface so we
// hide it from rust doc.
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
#[doc(hidden)]
pub mod __private {
    pub use crate::registry::ERRSIM_POINTS;
    pub use linkme;
}

#[cfg(all(feature = "errsim_enabled", debug_assertions))]
pub fn is_enabled() -> bool {
    true
}

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
pub fn is_enabled() -> bool {
    false
}

/// Activates the point `name` in the global registry.
///
/// Every call whose key matches `match_key` (empty matches all keys)
/// returns `code`, until `times` fires have happened.  Activating an
/// unknown name logs a warning and does nothing else.
pub fn activate(name: &str, code: i32, match_key: &str, times: Times) {
    Registry::global().activate(name, code, match_key, times);
}

/// Deactivates the point `name` in the global registry.  Unknown names
/// are ignored.
pub fn reset(name: &str) {
    Registry::global().reset(name);
}

/// Deactivates every point in the global registry.
pub fn reset_all() {
    Registry::global().reset_all();
}

/// Finds a point in the global registry.
pub fn lookup(name: &str) -> Option<&'static ErrsimPoint> {
    Registry::global().lookup(name)
}

/// Names of all points in the global registry, sorted.
pub fn registered_names() -> Vec<&'static str> {
    Registry::global().names()
}
