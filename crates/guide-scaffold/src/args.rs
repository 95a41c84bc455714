//! Flag tokenizer
//!
//! Turns the raw guide flags (`--id foo --single-page --pages ...`) into a
//! [`FlagMap`]. A flag takes the following token as its value unless that
//! token is itself a flag, in which case the flag is a switch.
//! Nothing here knows which flags are required.

use std::collections::HashMap;

/// Prefix marking a token as a flag name
pub const FLAG_PREFIX: &str = "--";

/// Value bound to a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Text(String),
    Switch,
}

impl FlagValue {
    /// Text value, `None` for a bare switch
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Switch => None,
        }
    }
}

/// Flag name -> value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    flags: HashMap<String, FlagValue>,
}

impl FlagMap {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Non-empty text value of a flag
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(FlagValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether the flag was given at all, with or without a value
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.flags.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Parse a flat token list into a [`FlagMap`]
pub fn parse_flags<S: AsRef<str>>(tokens: &[S]) -> FlagMap {
    let mut map = FlagMap::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_ref();

        let Some(name) = token.strip_prefix(FLAG_PREFIX) else {
            tracing::debug!(token, "ignoring stray token");
            i += 1;
            continue;
        };

        match tokens.get(i + 1).map(AsRef::as_ref) {
            Some(next) if !next.starts_with(FLAG_PREFIX) => {
                map.insert(name, FlagValue::Text(next.to_string()));
                i += 2;
            }
            _ => {
                map.insert(name, FlagValue::Switch);
                i += 1;
            }
        }
    }

    map
}
