use parking_lot::{const_rwlock, RwLock};

/// A callback that receives each formatted errsim record.
pub type Logger = Box<dyn Fn(String) + Send + Sync>;

static LOGGER: RwLock<Option<Logger>> = const_rwlock(None);

/// Installs a callback that receives a copy of every record errsim
/// emits, in addition to the `tracing` event.  Set to `None` to remove
/// it.
///
/// Records are emitted once per fired injection and once per attempt
/// to activate an unknown point.
///
/// # Examples
///
/// ```rust
/// errsim::set_logger(Some(Box::new(|msg| println!("{msg}"))));
///
/// errsim::set_logger(None);
/// ```
pub fn set_logger(l: Option<Logger>) {
    *LOGGER.write() = l;
}

fn forward(msg: String) {
    if let Some(ref log_fn) = *LOGGER.read() {
        log_fn(msg);
    }
}

pub(crate) fn report_fire(point: &'static str, code: i32, key: &str) {
    tracing::info!(target: "errsim", point, code, key, "injecting error");

    if LOGGER.read().is_none() {
        return;
    }
    let msg = if key.is_empty() {
        format!("[ERRSIM] Injecting error {code} at point {point}")
    } else {
        format!("[ERRSIM] Injecting error {code} at point {point} for key={key}")
    };
    forward(msg);
}

pub(crate) fn report_unknown(name: &str) {
    tracing::warn!(target: "errsim", point = name, "activate: unknown point");
    forward(format!("[ERRSIM] activate: unknown point '{name}'"));
}
