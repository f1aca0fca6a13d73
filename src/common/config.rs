use std::{
    fmt::{
        self,
        Display,
        Formatter,
    },
    str::FromStr,
};

use crate::common::error::Error;

/// Decides what happens to an error reported by a core operation.
/// The policy belongs to a session: it is set when the `Universe` is built,
/// and may be switched at runtime with `Universe::set_policy`.
/// Configuration errors ignore the policy and are always returned as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Abort the current call chain by returning `Err`.
    #[default]
    Raise,
    /// Hand the error back as a token typed as the built-in `error` type.
    Pass,
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Policy, Error> {
        match s {
            "raise" => Ok(Policy::Raise),
            "pass" => Ok(Policy::Pass),
            other => Err(Error::InvalidArgument {
                expected: "error policy `raise` or `pass`".to_string(),
                got: format!("`{}`", other),
            }),
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Raise => write!(f, "raise"),
            Policy::Pass => write!(f, "pass"),
        }
    }
}

/// Session-wide settings, fixed when a `Universe` is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub policy: Policy,
    /// Character surrounding field names in parser format strings.
    pub marker: char,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            policy: Policy::Raise,
            marker: '$',
        }
    }
}

impl Config {
    pub fn policy(mut self, policy: Policy) -> Config {
        self.policy = policy;
        self
    }

    pub fn marker(mut self, marker: char) -> Config {
        self.marker = marker;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn policy_from_str() {
        assert_eq!("raise".parse::<Policy>(), Ok(Policy::Raise));
        assert_eq!("pass".parse::<Policy>(), Ok(Policy::Pass));
        assert!("ignore".parse::<Policy>().is_err());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.policy, Policy::Raise);
        assert_eq!(config.marker, '$');
        assert_eq!(config.marker('%').marker, '%');
    }
}
