// Stand-ins used when injection is compiled out.  They keep the public
// API of the live implementation so that call sites and tests build
// unchanged; nothing here ever injects.

use std::marker::PhantomData;

use crate::config::{parse_config, ConfigError, Trigger};
use crate::Times;

pub type Logger = Box<dyn Fn(String) + Send + Sync>;

#[inline]
pub fn set_logger(_l: Option<Logger>) {}

#[derive(Debug)]
pub struct ErrsimPoint {
    name: &'static str,
}

impl ErrsimPoint {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn is_active(&self) -> bool {
        false
    }

    #[inline(always)]
    pub fn check(&self, _key: &str) -> i32 {
        0
    }
}

static GLOBAL: Registry = Registry { _priv: () };

#[derive(Debug, Default)]
pub struct Registry {
    _priv: (),
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    #[inline]
    pub fn register(&self, _point: &'static ErrsimPoint) {}

    #[inline]
    pub fn lookup(&self, _name: &str) -> Option<&'static ErrsimPoint> {
        None
    }

    pub fn names(&self) -> Vec<&'static str> {
        Vec::new()
    }

    #[inline]
    pub fn activate(&self, _name: &str, _code: i32, _match_key: &str, _times: Times) {}

    #[inline]
    pub fn activate_with(&self, _name: &str, _trigger: &Trigger) {}

    #[inline]
    pub fn reset(&self, _name: &str) {}

    #[inline]
    pub fn reset_all(&self) {}

    /// Validates `config` but activates nothing.
    pub fn apply_config(&self, config: &str) -> Result<usize, ConfigError> {
        parse_config(config).map(|_| 0)
    }
}

#[must_use = "the point is reset as soon as the guard is dropped"]
pub struct ErrsimGuard<'r> {
    name: &'static str,
    _registry: PhantomData<&'r Registry>,
}

impl ErrsimGuard<'static> {
    pub fn new(point: &ErrsimPoint, _code: i32) -> Self {
        Self::at(point)
    }

    pub fn with_key(point: &ErrsimPoint, _code: i32, _match_key: &str) -> Self {
        Self::at(point)
    }

    pub fn activate(point: &ErrsimPoint, _code: i32, _match_key: &str, _times: Times) -> Self {
        Self::at(point)
    }

    pub fn from_trigger(point: &ErrsimPoint, _trigger: &Trigger) -> Self {
        Self::at(point)
    }
}

impl<'r> ErrsimGuard<'r> {
    pub fn in_registry(
        _registry: &'r Registry,
        point: &ErrsimPoint,
        _code: i32,
        _match_key: &str,
        _times: Times,
    ) -> Self {
        Self::at(point)
    }

    fn at(point: &ErrsimPoint) -> Self {
        Self {
            name: point.name(),
            _registry: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
