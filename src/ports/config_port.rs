//! Configuration access port trait.
//!
//! Adapters only supply raw strings. Typed lookups fall back to the default
//! when a key is absent or blank, and fail with `ConfigInvalid` when a value
//! is present but does not parse.

use std::str::FromStr;

use crate::domain::error::TradelabError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TradelabError> {
        parse_or(self.get_string(section, key), section, key, default, "an integer")
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, TradelabError> {
        let value = parse_or(self.get_string(section, key), section, key, default, "a number")?;
        if !value.is_finite() {
            return Err(invalid(section, key, "expected a finite number"));
        }
        Ok(value)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, TradelabError> {
        match self.get_string(section, key) {
            None => Ok(default),
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "" => Ok(default),
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                other => Err(invalid(
                    section,
                    key,
                    &format!("expected true or false, got '{}'", other),
                )),
            },
        }
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradelabError {
    TradelabError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    default: T,
    expected: &str,
) -> Result<T, TradelabError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| invalid(section, key, &format!("expected {}, got '{}'", expected, s))),
    }
}
