//! Airport registry: code allocation, name uniqueness, listing
use std::fmt::Display;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{AeronavError, AeronavResult};

/// A registered airport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Sequential code assigned at registration, starting at 1
    pub code: u32,
    pub name: String,
    pub location: String,
}

impl Display for Airport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [#{}]", self.name, self.code)
    }
}

/// Owns all airport records and assigns their codes.
///
/// Codes are allocated sequentially from 1 and never reused; the counter
/// only advances on successful registration. Names are unique
/// (case-sensitive exact match), locations are free-form.
#[derive(Debug, Clone)]
pub struct Registry {
    airports: Vec<Airport>,
    by_name: FxHashMap<String, u32>,
    next_code: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            airports: Vec::new(),
            by_name: FxHashMap::default(),
            next_code: 1,
        }
    }
}

impl Registry {
    pub fn add(&mut self, name: &str, location: &str) -> AeronavResult<u32> {
        if name.is_empty() {
            return Err(AeronavError::EmptyField("name"));
        }
        if location.is_empty() {
            return Err(AeronavError::EmptyField("location"));
        }
        if self.by_name.contains_key(name) {
            return Err(AeronavError::DuplicateName(name.to_owned()));
        }
        let code = self.next_code;
        self.next_code += 1;
        self.by_name.insert(name.to_owned(), code);
        self.airports.push(Airport {
            code,
            name: name.to_owned(),
            location: location.to_owned(),
        });
        debug!("Registered airport {name:?} as #{code}");
        Ok(code)
    }

    pub fn get(&self, code: u32) -> AeronavResult<&Airport> {
        // codes are dense and start at 1, so the record index is code - 1
        code.checked_sub(1)
            .and_then(|idx| self.airports.get(idx as usize))
            .ok_or(AeronavError::UnknownAirport(code))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Airport> {
        let &code = self.by_name.get(name)?;
        self.airports.get((code - 1) as usize)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.get(code).is_ok()
    }

    /// All registered airports in insertion order
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
