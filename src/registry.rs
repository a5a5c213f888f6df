use std::collections::HashMap;
use std::sync::LazyLock;

use linkme::distributed_slice;
use parking_lot::Mutex;

use crate::config::{parse_config, ConfigError, Trigger};
use crate::log::report_unknown;
use crate::{ErrsimPoint, Times};

// See HIDDEN DOC in lib.rs.  Every point declared with `errsim_point!`
// lands in this slice at link time.
#[doc(hidden)]
#[distributed_slice]
pub static ERRSIM_POINTS: [&'static ErrsimPoint];

static GLOBAL: LazyLock<Registry> = LazyLock::new(|| {
    let registry = Registry::new();
    for point in ERRSIM_POINTS.iter().copied() {
        registry.register(point);
    }
    registry
});

/// Maps point names to points.
///
/// The registry only holds references; points live in statics.  All
/// operations are serialized by one lock, which is never taken by
/// [`ErrsimPoint::check`].
#[derive(Default)]
pub struct Registry {
    points: Mutex<HashMap<&'static str, &'static ErrsimPoint>>,
}

impl Registry {
    /// Creates an empty registry, unrelated to the global one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, holding every point declared with
    /// [`errsim_point!`](crate::errsim_point).
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Adds `point` under its name, replacing any point already
    /// registered under that name.
    pub fn register(&self, point: &'static ErrsimPoint) {
        self.points.lock().insert(point.name(), point);
    }

    pub fn lookup(&self, name: &str) -> Option<&'static ErrsimPoint> {
        self.points.lock().get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.points.lock().keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Activates the point `name`.
    ///
    /// Every call whose key matches `match_key` (empty matches all
    /// keys) returns `code` until `times` fires have happened.  Any
    /// previous activation is replaced.  An unknown `name` is reported
    /// as a warning and otherwise ignored.
    pub fn activate(&self, name: &str, code: i32, match_key: &str, times: Times) {
        let g = self.points.lock();
        match g.get(name) {
            Some(point) => point.arm(code, match_key, times),
            None => report_unknown(name),
        }
    }

    pub fn activate_with(&self, name: &str, trigger: &Trigger) {
        self.activate(name, trigger.code, &trigger.match_key, trigger.times);
    }

    /// Deactivates the point `name`.  Unknown names are ignored.
    pub fn reset(&self, name: &str) {
        if let Some(point) = self.points.lock().get(name) {
            point.disarm();
        }
    }

    pub fn reset_all(&self) {
        for point in self.points.lock().values() {
            point.disarm();
        }
    }

    /// Parses `config` (see [`parse_config`]) and activates every
    /// entry.  Nothing is activated unless the whole string parses.
    pub fn apply_config(&self, config: &str) -> Result<usize, ConfigError> {
        let entries = parse_config(config)?;
        for (name, trigger) in &entries {
            self.activate_with(name, trigger);
        }
        Ok(entries.len())
    }
}
