/// Declares a named injection point.
///
/// Expands to a `static` [`ErrsimPoint`](crate::ErrsimPoint) whose name
/// is the identifier itself, and registers it with the global
/// [`Registry`](crate::Registry).  Use it at module scope, never inside
/// a function body.  Attributes and a visibility may precede the name.
///
/// ```rust
/// use errsim::errsim_point;
///
/// errsim_point!(EP_STORAGE_OFFLOAD);
/// errsim_point!(
///     /// Fires before the header is written.
///     pub(crate) EP_WRITE_HEADER
/// );
///
/// fn main() {
/// #   if !errsim::is_enabled() { return; }
///     assert_eq!("EP_STORAGE_OFFLOAD", EP_STORAGE_OFFLOAD.name());
///     assert!(errsim::lookup("EP_WRITE_HEADER").is_some());
/// }
/// ```
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
#[macro_export]
macro_rules! errsim_point {
    ($(#[$attr:meta])* $vis:vis $name:ident) => {
        $(#[$attr])*
        $vis static $name: $crate::ErrsimPoint = $crate::ErrsimPoint::new(stringify!($name));

        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::__private::ERRSIM_POINTS)]
            #[linkme(crate = $crate::__private::linkme)]
            static REGISTER: &$crate::ErrsimPoint = &$name;
        };
    };
}

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
#[macro_export]
macro_rules! errsim_point {
    ($(#[$attr:meta])* $vis:vis $name:ident) => {
        $(#[$attr])*
        #[allow(dead_code)]
        $vis static $name: $crate::ErrsimPoint = $crate::ErrsimPoint::new(stringify!($name));
    };
}

/// Injects a failure at this site.
///
/// `$on_err` is evaluated when `$point` fires for `$key`, it is usually
/// `continue`, `break` or a `return`.  With two arguments the key is
/// empty, so the site only fires for activations without a key filter.
///
/// ```rust
/// use errsim::{errsim_inject, errsim_point, ErrsimGuard};
///
/// errsim_point!(EP_OFFLOAD_DOC);
///
/// fn offload(keys: &[&str]) -> Vec<String> {
///     let mut done = Vec::new();
///     for key in keys {
///         errsim_inject!(EP_OFFLOAD_DOC, key, continue);
///         done.push(key.to_string());
///     }
///     done
/// }
///
/// fn main() {
/// #   if !errsim::is_enabled() { return; }
///     let _g = ErrsimGuard::with_key(&EP_OFFLOAD_DOC, 1, "key2");
///     assert_eq!(vec!["key1", "key3"], offload(&["key1", "key2", "key3"]));
/// }
/// ```
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
#[macro_export]
macro_rules! errsim_inject {
    ($point: expr, $key: expr, $on_err: expr) => {
        if $point.check(::core::convert::AsRef::<str>::as_ref(&$key)) != 0 {
            $on_err;
        }
    };

    ($point: expr, $on_err: expr) => {
        $crate::errsim_inject!($point, "", $on_err)
    };
}

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
#[macro_export]
macro_rules! errsim_inject {
    ($point: expr, $key: expr, $on_err: expr) => {
        let _ = || (&$point, &$key);
    };

    ($point: expr, $on_err: expr) => {
        let _ = || &$point;
    };
}

/// Returns `Err($err)` from the enclosing function when `$point` fires
/// for `$key`.  The error is converted with `From`, as `?` would.
///
/// ```rust
/// use errsim::{errsim_inject_err, errsim_point, ErrsimGuard};
///
/// errsim_point!(EP_WRITE_DOC);
///
/// fn write(buf: &[u8]) -> Result<usize, anyhow::Error> {
///     errsim_inject_err!(EP_WRITE_DOC, "", anyhow::Error::msg("write failed"));
///     Ok(buf.len())
/// }
///
/// fn main() {
/// #   if !errsim::is_enabled() { return; }
///     let _g = ErrsimGuard::new(&EP_WRITE_DOC, 7);
///     assert!(write(b"abc").is_err());
/// }
/// ```
#[cfg(all(feature = "errsim_enabled", debug_assertions))]
#[macro_export]
macro_rules! errsim_inject_err {
    ($point: expr, $key: expr, $err: expr) => {
        $crate::errsim_inject!(
            $point,
            $key,
            return ::core::result::Result::Err(::core::convert::From::from($err))
        )
    };
}

#[cfg(not(all(feature = "errsim_enabled", debug_assertions)))]
#[macro_export]
macro_rules! errsim_inject_err {
    ($point: expr, $key: expr, $err: expr) => {
        let _ = || (&$point, &$key, || $err);
    };
}
