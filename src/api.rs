/*
 * This file is part of lmsensors.
 *
 * Copyright (C) 2025 lmsensors contributors
 *
 * lmsensors is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * lmsensors is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with lmsensors. If not, see <https://www.gnu.org/licenses/>.
 */

//! The boundary between the navigation layer and the native sensor library
//!
//! [`SensorsApi`] is the functional surface of libsensors that this crate
//! consumes: global init/cleanup, cursor-driven enumeration, label and name
//! formatting, value I/O and error text. [`crate::LibSensors`] implements it
//! against the real shared library; [`crate::fake::FakeSensors`] implements it
//! in memory.
//!
//! Records are owned copies of the native descriptors. Each carries a
//! [`NativeRef`] so the backend can find its own record again; a record is
//! only meaningful to the backend while the initialization that produced it
//! is alive. Records can only be built inside this crate, so the backends
//! here are the only ones that can hand them out.

use std::fs::File;
use std::sync::Arc;

/// Opaque address of a record inside the backend that produced it.
///
/// Only this crate's backends mint these, so a record can only name
/// something a backend actually handed out:
///
/// ```compile_fail
/// let forged = lmsensors::NativeRef::new(0x10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeRef(usize);

impl NativeRef {
    pub(crate) const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// `sensors_bus_id`: adapter type and bus number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusRecord {
    pub kind: i16,
    pub nr: i16,
}

/// `sensors_chip_name`
///
/// Records are produced by backends only:
///
/// ```compile_fail
/// use lmsensors::{BusRecord, ChipRecord, NativeRef};
///
/// let forged = ChipRecord {
///     native: NativeRef::new(0x10),
///     prefix: String::new(),
///     bus: BusRecord { kind: 0, nr: 0 },
///     addr: 0,
///     path: String::new(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipRecord {
    pub(crate) native: NativeRef,
    pub prefix: String,
    pub bus: BusRecord,
    pub addr: i32,
    pub path: String,
}

/// `sensors_feature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub(crate) native: NativeRef,
    pub name: String,
    pub number: i32,
    pub kind: i32,
}

/// `sensors_subfeature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfeatureRecord {
    pub(crate) native: NativeRef,
    pub name: String,
    pub number: i32,
    pub kind: i32,
    pub mapping: i32,
    pub flags: u32,
}

/// Native sensor library surface.
///
/// Error returns are raw library error numbers; turning them into
/// [`crate::SensorsError`] is the caller's business, via [`Self::error_text`].
#[cfg_attr(test, mockall::automock)]
pub trait SensorsApi {
    /// Initialize global library state, optionally from a configuration stream
    fn init(&self, config: Option<File>) -> Result<(), i32>;

    /// Release everything `init` acquired
    fn cleanup(&self);

    /// Next detected chip at `cursor`, advancing it; `None` ends the sequence
    fn next_chip(&self, cursor: &mut i32) -> Option<ChipRecord>;

    fn next_feature(&self, chip: &ChipRecord, cursor: &mut i32) -> Option<FeatureRecord>;

    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        cursor: &mut i32,
    ) -> Option<SubfeatureRecord>;

    /// snprintf-style: writes at most `buf.len() - 1` bytes plus a NUL and
    /// returns the full name length, or a negative error number. An empty
    /// `buf` is a size query.
    fn format_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32;

    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String>;

    fn value(&self, chip: &ChipRecord, number: i32) -> Result<f64, i32>;

    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> Result<(), i32>;

    fn adapter_name(&self, bus: &BusRecord) -> Option<String>;

    fn error_text(&self, code: i32) -> String;
}

/// A backend shared between a context and everything resolved through it
pub type SharedApi = Arc<dyn SensorsApi + Send + Sync>;

/// Drive a cursor-based enumeration primitive as an iterator.
///
/// The cursor is private to the iterator and the sequence ends for good at
/// the first `None`.
pub(crate) fn cursor_iter<T>(
    mut next: impl FnMut(&mut i32) -> Option<T>,
) -> impl Iterator<Item = T> {
    let mut nr = 0;
    std::iter::from_fn(move || next(&mut nr)).fuse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_iter_stops_at_first_none() {
        let items = [Some(1), Some(2), None, Some(4)];
        let collected: Vec<i32> = cursor_iter(|nr| {
            let item = items.get(*nr as usize).copied().flatten();
            *nr += 1;
            item
        })
        .collect();
        assert_eq!(collected, vec![1, 2]);
    }

    #[test]
    fn test_cursor_iter_is_lazy() {
        let mut calls = 0;
        let first = cursor_iter(|nr| {
            calls += 1;
            *nr += 1;
            Some(*nr)
        })
        .next();
        assert_eq!(first, Some(1));
        assert_eq!(calls, 1);
    }
}
