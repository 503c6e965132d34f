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

//! Chip names, the root of the chip -> feature -> subfeature hierarchy

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::api::{cursor_iter, ChipRecord};
use crate::bus::BusId;
use crate::context::Sensors;
use crate::error::{ErrorKind, Result};
use crate::handle::Handle;
use crate::Feature;

/// A detected sensor chip
#[derive(Clone)]
pub struct ChipName {
    handle: Handle<ChipRecord, Arc<Sensors>>,
}

impl ChipName {
    /// Chip at a hwmon path such as `/sys/class/hwmon/hwmon0`, resolved
    /// through the system libsensors.
    ///
    /// Any path below the chip directory resolves to the chip as well.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Sensors::system()?.chip_name(path)
    }

    pub(crate) fn from_record(sensors: Arc<Sensors>, record: ChipRecord) -> Self {
        trace!(chip = %record.prefix, path = %record.path, "Chip record");
        Self {
            handle: Handle::new(record, sensors),
        }
    }

    pub(crate) fn record(&self) -> &ChipRecord {
        self.handle.record()
    }

    /// Context this chip was resolved through
    pub fn sensors(&self) -> &Arc<Sensors> {
        self.handle.parent()
    }

    pub fn address(&self) -> i32 {
        self.record().addr
    }

    pub fn bus(&self) -> BusId {
        BusId::from_record(Arc::clone(self.sensors()), self.record().bus.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.record().prefix
    }

    pub fn path(&self) -> &str {
        &self.record().path
    }

    /// Full chip name as libsensors prints it, e.g. `coretemp-isa-0000`
    pub fn name(&self) -> Result<String> {
        let api = self.sensors().api();
        let size = api.format_chip_name(self.record(), &mut [0u8; 0]);
        if size < 0 {
            return Err(self.sensors().native_error(ErrorKind::Io, size));
        }

        let len = size as usize;
        let mut buf = vec![0u8; len + 1];
        let written = api.format_chip_name(self.record(), &mut buf);
        if written < 0 {
            return Err(self.sensors().native_error(ErrorKind::Io, written));
        }
        buf.truncate(len.min(written as usize));
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Features of this chip in library order
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        let api = self.sensors().api();
        cursor_iter(move |nr| api.next_feature(self.record(), nr))
            .map(move |record| Feature::from_record(self.clone(), record))
    }

    /// Whether `other` is a copy of this very chip handle
    pub fn shares_handle_with(&self, other: &Self) -> bool {
        self.handle.shares_with(&other.handle)
    }
}

impl PartialEq for ChipName {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.record(), other.record());
        a.prefix == b.prefix && a.path == b.path && a.addr == b.addr && a.bus == b.bus
    }
}

impl Eq for ChipName {}

impl fmt::Debug for ChipName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChipName")
            .field("prefix", &self.prefix())
            .field("path", &self.path())
            .field("address", &self.address())
            .field("bus", &self.record().bus)
            .finish()
    }
}

impl fmt::Display for ChipName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.prefix(), self.path())
    }
}
