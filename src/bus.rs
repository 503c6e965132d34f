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

//! Bus identifier of a chip

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::BusRecord;
use crate::constants::bus;
use crate::context::Sensors;
use crate::handle::Handle;

/// Adapter type a chip sits behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusType {
    Any,
    I2c,
    Isa,
    Pci,
    Spi,
    Virtual,
    Acpi,
    Hid,
    Mdio,
    Scsi,
}

impl BusType {
    /// Translate a native `SENSORS_BUS_TYPE_*` code; unknown codes are `Any`
    pub fn from_raw(code: i16) -> Self {
        match code {
            bus::I2C => Self::I2c,
            bus::ISA => Self::Isa,
            bus::PCI => Self::Pci,
            bus::SPI => Self::Spi,
            bus::VIRTUAL => Self::Virtual,
            bus::ACPI => Self::Acpi,
            bus::HID => Self::Hid,
            bus::MDIO => Self::Mdio,
            bus::SCSI => Self::Scsi,
            _ => Self::Any,
        }
    }
}

/// Bus type and number of a chip. Only obtainable from [`crate::ChipName::bus`].
#[derive(Clone)]
pub struct BusId {
    handle: Handle<BusRecord, Arc<Sensors>>,
}

impl BusId {
    pub(crate) fn from_record(sensors: Arc<Sensors>, record: BusRecord) -> Self {
        Self {
            handle: Handle::new(record, sensors),
        }
    }

    /// Adapter description such as "PCI adapter", empty when the library
    /// has none
    pub fn adapter_name(&self) -> String {
        self.handle
            .parent()
            .api()
            .adapter_name(self.handle.record())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> BusType {
        BusType::from_raw(self.handle.record().kind)
    }

    pub fn nr(&self) -> i16 {
        self.handle.record().nr
    }
}

impl PartialEq for BusId {
    fn eq(&self, other: &Self) -> bool {
        self.handle.record() == other.handle.record()
    }
}

impl Eq for BusId {}

impl fmt::Debug for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusId")
            .field("kind", &self.kind())
            .field("nr", &self.nr())
            .finish()
    }
}
