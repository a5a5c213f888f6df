/// Check everything works if injection is compiled out.
///
/// Run like this to test with errsim enabled:
///
/// ```shell
/// cargo run --example conditional_comp
/// ```
///
/// And like this to test with errsim disabled.
///
/// ```shell
/// cargo run --example conditional_comp --no-default-features
/// ```
use errsim::{errsim_inject_err, errsim_point, ErrsimGuard};

errsim_point!(EP_IMPORTANT);

fn do_something_important() -> Result<(), anyhow::Error> {
    Ok(())
}

fn code_under_test() -> Result<(), anyhow::Error> {
    errsim_inject_err!(EP_IMPORTANT, "", anyhow::Error::msg("Error 1"));
    do_something_important()
}

fn main() {
    if errsim::is_enabled() {
        println!("errsim is enabled");
    } else {
        println!("errsim is disabled");
    }

    let _g = ErrsimGuard::new(&EP_IMPORTANT, 1);

    let res = code_under_test();

    if errsim::is_enabled() {
        assert!(res.is_err());
        assert!(errsim::lookup("EP_IMPORTANT").is_some());
    } else {
        assert!(res.is_ok());
        assert!(errsim::lookup("EP_IMPORTANT").is_none());
    }
}
