use std::io;
use std::num::ParseIntError;

use thiserror::Error;

use errsim::{errsim_inject_err, errsim_point, ErrsimGuard, Times};

errsim_point!(EP_READ_FILE);
errsim_point!(EP_PARSE_FILE);

// An error type.
#[derive(Error, Debug)]
enum MyError {
    #[error("Error reading file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Parse error")]
    ParseError(#[from] ParseIntError),

    #[error("Injected error code {0}")]
    Injected(i32),
}

// This function can return an IO error.
fn read_file() -> io::Result<()> {
    Ok(())
}

fn do_read_file() -> Result<(), MyError> {
    // When this point fires it returns an `io::Error`, which `From`
    // turns into a `MyError::ReadError`.
    errsim_inject_err!(EP_READ_FILE, "", io::Error::from(io::ErrorKind::NotFound));

    Ok(read_file()?)
}

// This function can return a ParseIntError.
fn parse_file() -> Result<i32, ParseIntError> {
    "42".parse()
}

fn do_parse_file(name: &str) -> Result<i32, MyError> {
    // Carry the code the test chose into the error.  The file name is
    // the key, so a test can fail just one file.
    let code = EP_PARSE_FILE.check(name);
    if code != 0 {
        return Err(MyError::Injected(code));
    }

    Ok(parse_file()?)
}

fn load_file(name: &str) -> Result<i32, MyError> {
    do_read_file()?;

    do_parse_file(name)
}

fn main() {
    tracing_subscriber::fmt().with_target(true).init();

    assert_eq!(42, load_file("good.txt").unwrap());

    {
        let _g = ErrsimGuard::new(&EP_READ_FILE, 1);
        let err = load_file("good.txt").unwrap_err();
        println!("{err}");
        assert!(matches!(err, MyError::ReadError(_)));
    }

    {
        let _g = ErrsimGuard::activate(&EP_PARSE_FILE, 22, "good.txt", Times::Finite(1));
        assert!(matches!(load_file("good.txt"), Err(MyError::Injected(22))));
        assert_eq!(42, load_file("good.txt").unwrap());
    }

    assert_eq!(42, load_file("good.txt").unwrap());
}
