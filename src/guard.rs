use crate::{ErrsimPoint, Registry, Times, Trigger};

/// Activates a point for as long as the guard lives.
///
/// The point is reset when the guard is dropped, whichever way the
/// enclosing scope is left: normal return, `?`, or a panic.
///
/// # Examples
///
/// ```rust
/// use errsim::{errsim_point, ErrsimGuard};
///
/// errsim_point!(EP_GUARD_DOC);
///
/// fn main() {
/// #   if !errsim::is_enabled() { return; }
///     {
///         let _g = ErrsimGuard::with_key(&EP_GUARD_DOC, 5, "key2");
///         assert_eq!(0, EP_GUARD_DOC.check("key1"));
///         assert_eq!(5, EP_GUARD_DOC.check("key2"));
///     }
///
///     assert_eq!(0, EP_GUARD_DOC.check("key2"));
/// }
/// ```
#[must_use = "the point is reset as soon as the guard is dropped"]
pub struct ErrsimGuard<'r> {
    registry: &'r Registry,
    name: &'static str,
}

impl ErrsimGuard<'static> {
    /// Fails every call to `point` with `code`.
    pub fn new(point: &ErrsimPoint, code: i32) -> Self {
        Self::activate(point, code, "", Times::Infinite)
    }

    /// Fails every call to `point` whose key equals `match_key`.
    pub fn with_key(point: &ErrsimPoint, code: i32, match_key: &str) -> Self {
        Self::activate(point, code, match_key, Times::Infinite)
    }

    pub fn activate(point: &ErrsimPoint, code: i32, match_key: &str, times: Times) -> Self {
        Self::in_registry(Registry::global(), point, code, match_key, times)
    }

    pub fn from_trigger(point: &ErrsimPoint, trigger: &Trigger) -> Self {
        Self::activate(point, trigger.code, &trigger.match_key, trigger.times)
    }
}

impl<'r> ErrsimGuard<'r> {
    /// Like [`ErrsimGuard::activate`] but against `registry` instead of
    /// the global one.
    pub fn in_registry(
        registry: &'r Registry,
        point: &ErrsimPoint,
        code: i32,
        match_key: &str,
        times: Times,
    ) -> Self {
        let name = point.name();
        registry.activate(name, code, match_key, times);
        Self { registry, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ErrsimGuard<'_> {
    fn drop(&mut self) {
        self.registry.reset(self.name);
    }
}
