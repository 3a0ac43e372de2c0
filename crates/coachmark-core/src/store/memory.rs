//! In-memory flag backend.

use std::collections::HashMap;

use super::FlagBackend;
use crate::error::{Result, TourError};

/// Flags kept in process memory.
///
/// Doubles as a test fake: [`MemoryBackend::set_available`] makes every
/// operation fail, the way a browser with storage disabled behaves.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    flags: HashMap<String, bool>,
    slots: HashMap<String, String>,
    available: bool,
    writes: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            flags: HashMap::new(),
            slots: HashMap::new(),
            available: true,
            writes: 0,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Seeds a flag directly, bypassing availability.
    pub fn set_flag_value(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    /// Seeds a slot directly, bypassing availability.
    pub fn set_slot_value(&mut self, name: &str, value: &str) {
        self.slots.insert(name.to_string(), value.to_string());
    }

    /// Number of successful writes, flags and slots combined.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn check(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(TourError::PersistenceUnavailable {
                message: "memory backend disabled".to_string(),
            })
        }
    }
}

impl FlagBackend for MemoryBackend {
    fn read_flag(&self, key: &str) -> Result<Option<bool>> {
        self.check()?;
        Ok(self.flags.get(key).copied())
    }

    fn write_flag(&mut self, key: &str, value: bool) -> Result<()> {
        self.check()?;
        self.flags.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn read_slot(&self, name: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.slots.get(name).cloned())
    }

    fn write_slot(&mut self, name: &str, value: &str) -> Result<()> {
        self.check()?;
        self.slots.insert(name.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove_slot(&mut self, name: &str) -> Result<()> {
        self.check()?;
        if self.slots.remove(name).is_some() {
            self.writes += 1;
        }
        Ok(())
    }
}
