use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::Registry;

/// Name of the environment variable read by [`activate_from_env`].
pub const ENV_VAR: &str = "ERRSIM";

/// How many times an activated point fires before it switches itself
/// off.
///
/// `Finite` counts above `i32::MAX` are treated as `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Times {
    #[default]
    Infinite,
    Finite(u32),
}

// Counter value for an infinite budget.  Decrements past zero only ever
// leave small negative values behind, which must not read as infinite.
#[cfg_attr(not(all(feature = "errsim_enabled", debug_assertions)), allow(dead_code))]
pub(crate) const INFINITE_RAW: i32 = i32::MIN;

impl Times {
    // Encoding stored in the point's atomic counter: `INFINITE_RAW` for
    // infinite, otherwise the remaining count.
    #[cfg_attr(not(all(feature = "errsim_enabled", debug_assertions)), allow(dead_code))]
    pub(crate) fn to_raw(self) -> i32 {
        match self {
            Times::Infinite => INFINITE_RAW,
            Times::Finite(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }
}

impl From<u32> for Times {
    fn from(n: u32) -> Self {
        Times::Finite(n)
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Times::Infinite => f.write_str("*"),
            Times::Finite(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Times {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" | "-1" => Ok(Times::Infinite),
            n => n.parse().map(Times::Finite),
        }
    }
}

/// One activation: the code to inject, the key filter and the fire
/// budget.
///
/// ```rust
/// use errsim::{Times, Trigger};
///
/// let t = Trigger::new(5).with_key("k2").with_times(3);
/// assert_eq!(t.code, 5);
/// assert_eq!(t.match_key, "k2");
/// assert_eq!(t.times, Times::Finite(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub code: i32,
    /// Empty matches every key.
    pub match_key: String,
    pub times: Times,
}

impl Trigger {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            match_key: String::new(),
            times: Times::Infinite,
        }
    }

    pub fn with_key(mut self, match_key: impl Into<String>) -> Self {
        self.match_key = match_key.into();
        self
    }

    pub fn with_times(mut self, times: impl Into<Times>) -> Self {
        self.times = times.into();
        self
    }
}

/// Errors from parsing an activation string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("entry '{entry}' has no '=CODE' part")]
    MissingCode { entry: String },

    #[error("entry '{entry}' has an empty point name")]
    EmptyName { entry: String },

    #[error("entry '{entry}' has an invalid error code")]
    InvalidCode {
        entry: String,
        #[source]
        source: ParseIntError,
    },

    #[error("entry '{entry}' uses error code 0, which never fires")]
    ZeroCode { entry: String },

    #[error("entry '{entry}' has an invalid fire count")]
    InvalidTimes {
        entry: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parses an activation string of the form
/// `NAME=CODE[@TIMES][:KEY];NAME=CODE...`.
///
/// `TIMES` is a count, or `*` / `-1` for infinite (the default).
/// `KEY` is everything after the first `:`, so it may itself contain
/// `:` or `@` but not `;`.  Nothing is looked up; unknown names are
/// only detected when the result is applied.
///
/// ```rust
/// use errsim::{parse_config, Times};
///
/// let entries = parse_config("EP_WRITE=7@2; EP_OFFLOAD=5:k2").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].0, "EP_WRITE");
/// assert_eq!(entries[0].1.times, Times::Finite(2));
/// assert_eq!(entries[1].1.match_key, "k2");
/// ```
pub fn parse_config(s: &str) -> Result<Vec<(String, Trigger)>, ConfigError> {
    s.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Result<(String, Trigger), ConfigError> {
    let (name, rest) = entry.split_once('=').ok_or_else(|| ConfigError::MissingCode {
        entry: entry.to_string(),
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyName {
            entry: entry.to_string(),
        });
    }

    let (code_times, match_key) = match rest.split_once(':') {
        Some((ct, key)) => (ct, key),
        None => (rest, ""),
    };

    let (code, times) = match code_times.split_once('@') {
        Some((code, times)) => (code, Some(times)),
        None => (code_times, None),
    };

    let code: i32 = code
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidCode {
            entry: entry.to_string(),
            source,
        })?;
    if code == 0 {
        return Err(ConfigError::ZeroCode {
            entry: entry.to_string(),
        });
    }

    let times = match times {
        Some(t) => t.parse().map_err(|source| ConfigError::InvalidTimes {
            entry: entry.to_string(),
            source,
        })?,
        None => Times::Infinite,
    };

    Ok((
        name.to_string(),
        Trigger {
            code,
            match_key: match_key.to_string(),
            times,
        },
    ))
}

/// Activates the points listed in the `ERRSIM` environment variable
/// in the global registry.
///
/// Returns the number of entries applied, `Ok(0)` when the variable is
/// not set.  If any entry is malformed nothing is activated.
pub fn activate_from_env() -> Result<usize, ConfigError> {
    match std::env::var(ENV_VAR) {
        Ok(s) => Registry::global().apply_config(&s),
        Err(_) => Ok(0),
    }
}
