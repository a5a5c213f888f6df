#![cfg(all(feature = "errsim_enabled", debug_assertions))]

use std::sync::{Arc, Mutex};

use anyhow::Error;
use serial_test::serial;

use errsim::{
    activate, errsim_inject, errsim_inject_err, errsim_point, lookup, reset, ErrsimGuard, Times,
    Trigger,
};

errsim_point!(EP_WRITE);
errsim_point!(EP_OFFLOAD);
errsim_point!(EP_NEVER_ACTIVATED);
errsim_point!(EP_GUARD_ERR);
errsim_point!(EP_GUARD_PANIC);
errsim_point!(EP_INJECT_LOOP);
errsim_point!(EP_INJECT_RETURN);
errsim_point!(EP_LOGGED);
errsim_point!(EP_ENV_A);
errsim_point!(EP_ENV_B);
errsim_point!(
    /// Documented and public.
    pub EP_PUBLIC
);

fn capture_logs() -> Arc<Mutex<Vec<String>>> {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&logs);
    errsim::set_logger(Some(Box::new(move |msg| sink.lock().unwrap().push(msg))));
    logs
}

#[test]
fn test_points_are_registered() {
    let names = errsim::registered_names();

    for name in ["EP_WRITE", "EP_OFFLOAD", "EP_PUBLIC"] {
        assert!(names.contains(&name), "{name} missing from {names:?}");
    }

    let p = lookup("EP_WRITE").unwrap();
    assert!(std::ptr::eq(p, &EP_WRITE));
    assert_eq!("EP_WRITE", p.name());
}

#[test]
fn test_never_activated() {
    for key in ["", "a", "k2"] {
        for _ in 0..100 {
            assert_eq!(0, EP_NEVER_ACTIVATED.check(key));
        }
    }
}

#[test]
fn test_write_finite_budget() {
    activate("EP_WRITE", 7, "", Times::Finite(2));

    assert_eq!(7, EP_WRITE.check("a"));
    assert_eq!(7, EP_WRITE.check("a"));
    assert_eq!(0, EP_WRITE.check("a"));
    assert_eq!(0, EP_WRITE.check("a"));
    assert!(!EP_WRITE.is_active());
}

#[test]
fn test_offload_key_filter() {
    activate("EP_OFFLOAD", 5, "k2", Times::Infinite);

    assert_eq!(0, EP_OFFLOAD.check("k1"));
    assert_eq!(0, EP_OFFLOAD.check(""));
    assert_eq!(5, EP_OFFLOAD.check("k2"));
    assert_eq!(5, EP_OFFLOAD.check("k2"));

    reset("EP_OFFLOAD");
    assert_eq!(0, EP_OFFLOAD.check("k2"));
}

#[test]
fn test_unknown_point() {
    reset("EP_DOES_NOT_EXIST");
    activate("EP_DOES_NOT_EXIST", 3, "", Times::Infinite);

    assert!(lookup("EP_DOES_NOT_EXIST").is_none());
    assert!(!errsim::registered_names().contains(&"EP_DOES_NOT_EXIST"));
}

#[test]
fn test_guard_reset_on_error() {
    fn fallible() -> Result<(), Error> {
        Err(Error::msg("bail out"))
    }

    fn guarded() -> Result<(), Error> {
        let _g = ErrsimGuard::new(&EP_GUARD_ERR, 9);
        assert_eq!(9, EP_GUARD_ERR.check("any"));
        fallible()?;
        Ok(())
    }

    assert!(guarded().is_err());
    assert!(!EP_GUARD_ERR.is_active());
    assert_eq!(0, EP_GUARD_ERR.check("any"));
}

#[test]
fn test_guard_reset_on_panic() {
    let res = std::panic::catch_unwind(|| {
        let _g = ErrsimGuard::activate(&EP_GUARD_PANIC, 4, "k", Times::Finite(10));
        assert_eq!(4, EP_GUARD_PANIC.check("k"));
        panic!("test body failed");
    });

    assert!(res.is_err());
    assert!(!EP_GUARD_PANIC.is_active());
    assert_eq!(0, EP_GUARD_PANIC.check("k"));
}

#[test]
fn test_inject_continue() {
    fn store(keys: &[String]) -> Vec<String> {
        let mut stored = Vec::new();
        for key in keys {
            errsim_inject!(EP_INJECT_LOOP, key, continue);
            stored.push(key.clone());
        }
        stored
    }

    let keys: Vec<String> = ["key1", "key2", "key3"].map(String::from).to_vec();

    assert_eq!(keys, store(&keys));

    let _g = ErrsimGuard::from_trigger(&EP_INJECT_LOOP, &Trigger::new(1).with_key("key2"));
    assert_eq!(vec!["key1", "key3"], store(&keys));
}

#[test]
fn test_inject_return_err() {
    #[derive(Debug, PartialEq, thiserror::Error)]
    enum WriteError {
        #[error("file write failed")]
        FileWriteFail,
    }

    fn write(buf: &[u8]) -> Result<usize, WriteError> {
        errsim_inject_err!(EP_INJECT_RETURN, "", WriteError::FileWriteFail);
        Ok(buf.len())
    }

    fn write_all(buf: &[u8]) -> Result<usize, Error> {
        errsim_inject!(EP_INJECT_RETURN, "all", return Err(Error::msg("short write")));
        Ok(write(buf)?)
    }

    assert_eq!(Ok(3), write(b"abc"));

    {
        let _g = ErrsimGuard::activate(&EP_INJECT_RETURN, 1, "", Times::Finite(1));
        assert_eq!(Err(WriteError::FileWriteFail), write(b"abc"));
        assert_eq!(Ok(3), write(b"abc"));
    }

    {
        let _g = ErrsimGuard::with_key(&EP_INJECT_RETURN, 1, "all");
        let err = write_all(b"abc").unwrap_err();
        assert_eq!("short write", err.to_string());
        assert_eq!(Ok(3), write(b"abc"));
    }
}

#[test]
#[serial]
fn test_logged_once_per_fire() {
    let logs = capture_logs();

    activate("EP_LOGGED", 7, "", Times::Finite(2));
    for _ in 0..4 {
        EP_LOGGED.check("a");
    }

    activate("EP_LOGGED", 5, "", Times::Finite(1));
    EP_LOGGED.check("");

    activate("EP_LOGGED_TYPO", 5, "", Times::Infinite);

    errsim::set_logger(None);

    let logs = logs.lock().unwrap();
    let fired: Vec<_> = logs
        .iter()
        .map(String::as_str)
        .filter(|m| m.contains("at point EP_LOGGED"))
        .collect();
    assert_eq!(
        vec![
            "[ERRSIM] Injecting error 7 at point EP_LOGGED for key=a",
            "[ERRSIM] Injecting error 7 at point EP_LOGGED for key=a",
            "[ERRSIM] Injecting error 5 at point EP_LOGGED",
        ],
        fired
    );
    assert!(logs.contains(&"[ERRSIM] activate: unknown point 'EP_LOGGED_TYPO'".to_string()));
}

#[test]
#[serial]
fn test_activate_from_env() {
    std::env::remove_var(errsim::ENV_VAR);
    assert_eq!(Ok(0), errsim::activate_from_env());

    std::env::set_var(errsim::ENV_VAR, "EP_ENV_A=3@1; EP_ENV_B=4:k");
    assert_eq!(Ok(2), errsim::activate_from_env());

    assert_eq!(3, EP_ENV_A.check("x"));
    assert_eq!(0, EP_ENV_A.check("x"));
    assert_eq!(0, EP_ENV_B.check("j"));
    assert_eq!(4, EP_ENV_B.check("k"));

    reset("EP_ENV_B");

    std::env::set_var(errsim::ENV_VAR, "EP_ENV_A=3;EP_ENV_B");
    assert!(matches!(
        errsim::activate_from_env(),
        Err(errsim::ConfigError::MissingCode { .. })
    ));
    assert!(!EP_ENV_A.is_active());

    std::env::remove_var(errsim::ENV_VAR);
}
