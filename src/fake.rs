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

//! In-memory sensors backend
//!
//! [`FakeSensors`] implements [`SensorsApi`] over a hand-built chip tree so the
//! navigation layer can be exercised without libsensors or hwmon hardware.
//! It follows the library's conventions: cursor enumeration, negated error
//! numbers, snprintf-style chip names, per-chip subfeature numbering. Every
//! boundary call is counted.
//!
//! ```
//! use std::sync::Arc;
//! use lmsensors::fake::{FakeChip, FakeFeature, FakeSensors};
//! use lmsensors::constants::{feature, flags, subfeature};
//! use lmsensors::Sensors;
//!
//! let fake = Arc::new(FakeSensors::new(vec![FakeChip::new("coretemp", "/sys/class/hwmon/hwmon0")
//!     .feature(FakeFeature::new("temp1", feature::TEMP)
//!         .subfeature("temp1_input", subfeature::TEMP_INPUT, flags::MODE_R, 42.0))]));
//! let sensors = Sensors::new(fake.clone());
//! let input = sensors.subfeature("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
//! assert_eq!(input.read().unwrap(), 42.0);
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use parking_lot::Mutex;
use tracing::trace;

use crate::api::{BusRecord, ChipRecord, FeatureRecord, NativeRef, SensorsApi, SubfeatureRecord};
use crate::constants::{bus, feature, flags, subfeature};
use crate::error::{code, describe_code};

/// Number of calls made to each backend primitive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub init: usize,
    pub cleanup: usize,
    pub next_chip: usize,
    pub next_feature: usize,
    pub next_subfeature: usize,
    pub format_chip_name: usize,
    pub label: usize,
    pub value: usize,
    pub set_value: usize,
    pub adapter_name: usize,
}

impl CallCounts {
    /// Calls to the three enumeration primitives
    pub fn enumerations(&self) -> usize {
        self.next_chip + self.next_feature + self.next_subfeature
    }
}

#[derive(Debug, Clone)]
enum FakeLabel {
    Name,
    Text(String),
    Missing,
}

/// A chip to place in a [`FakeSensors`] tree
#[derive(Debug, Clone)]
pub struct FakeChip {
    prefix: String,
    path: String,
    bus: BusRecord,
    addr: i32,
    formattable: bool,
    features: Vec<FakeFeature>,
}

impl FakeChip {
    /// ISA chip at address 0 unless told otherwise
    pub fn new(prefix: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            path: path.into(),
            bus: BusRecord { kind: bus::ISA, nr: 0 },
            addr: 0,
            formattable: true,
            features: Vec::new(),
        }
    }

    pub fn bus(mut self, kind: i16, nr: i16) -> Self {
        self.bus = BusRecord { kind, nr };
        self
    }

    pub fn address(mut self, addr: i32) -> Self {
        self.addr = addr;
        self
    }

    /// Make name formatting fail with `SENSORS_ERR_CHIP_NAME`
    pub fn unformattable(mut self) -> Self {
        self.formattable = false;
        self
    }

    pub fn feature(mut self, feature: FakeFeature) -> Self {
        self.features.push(feature);
        self
    }
}

/// A feature of a [`FakeChip`]
#[derive(Debug, Clone)]
pub struct FakeFeature {
    name: String,
    kind: i32,
    label: FakeLabel,
    subfeatures: Vec<FakeSubfeature>,
}

#[derive(Debug, Clone)]
struct FakeSubfeature {
    name: String,
    kind: i32,
    flags: u32,
    value: f64,
}

impl FakeFeature {
    /// Labelled with its own name, as libsensors does when nothing else is known
    pub fn new(name: impl Into<String>, kind: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            label: FakeLabel::Name,
            subfeatures: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = FakeLabel::Text(label.into());
        self
    }

    /// Make the label lookup fail
    pub fn without_label(mut self) -> Self {
        self.label = FakeLabel::Missing;
        self
    }

    pub fn subfeature(mut self, name: impl Into<String>, kind: i32, flags: u32, value: f64) -> Self {
        self.subfeatures.push(FakeSubfeature {
            name: name.into(),
            kind,
            flags,
            value,
        });
        self
    }
}

struct FeatureEntry {
    record: FeatureRecord,
    label: FakeLabel,
    subfeatures: Vec<SubfeatureRecord>,
}

struct ChipEntry {
    record: ChipRecord,
    formattable: bool,
    features: Vec<FeatureEntry>,
}

#[derive(Debug, Default)]
struct FakeState {
    initialized: bool,
    generation: u64,
    config: Option<String>,
    values: HashMap<(usize, i32), f64>,
    calls: CallCounts,
}

/// In-memory [`SensorsApi`]
pub struct FakeSensors {
    chips: Vec<ChipEntry>,
    rejected_marker: Option<(String, i32)>,
    state: Mutex<FakeState>,
}

impl FakeSensors {
    pub fn new(chips: Vec<FakeChip>) -> Self {
        let mut values = HashMap::new();
        let entries = chips
            .into_iter()
            .enumerate()
            .map(|(chip_index, chip)| {
                let mut next_number = 0;
                let features = chip
                    .features
                    .into_iter()
                    .enumerate()
                    .map(|(feature_index, feat)| {
                        let subfeatures = feat
                            .subfeatures
                            .into_iter()
                            .enumerate()
                            .map(|(sub_index, sub)| {
                                let number = next_number;
                                next_number += 1;
                                values.insert((chip_index, number), sub.value);
                                SubfeatureRecord {
                                    native: NativeRef::new(sub_index),
                                    name: sub.name,
                                    number,
                                    kind: sub.kind,
                                    mapping: feature_index as i32,
                                    flags: sub.flags,
                                }
                            })
                            .collect();
                        FeatureEntry {
                            record: FeatureRecord {
                                native: NativeRef::new(feature_index),
                                name: feat.name,
                                number: feature_index as i32,
                                kind: feat.kind,
                            },
                            label: feat.label,
                            subfeatures,
                        }
                    })
                    .collect();
                ChipEntry {
                    record: ChipRecord {
                        native: NativeRef::new(chip_index),
                        prefix: chip.prefix,
                        bus: chip.bus,
                        addr: chip.addr,
                        path: chip.path,
                    },
                    formattable: chip.formattable,
                    features,
                }
            })
            .collect();

        Self {
            chips: entries,
            rejected_marker: None,
            state: Mutex::new(FakeState {
                values,
                ..FakeState::default()
            }),
        }
    }

    /// Two chips resembling a desktop board: `coretemp` at hwmon0 and an
    /// `nct6775` super-I/O at hwmon1 with writable fan limits
    pub fn sample() -> Self {
        Self::new(vec![
            FakeChip::new("coretemp", "/sys/class/hwmon/hwmon0")
                .feature(
                    FakeFeature::new("temp1", feature::TEMP)
                        .label("Package id 0")
                        .subfeature("temp1_input", subfeature::TEMP_INPUT, flags::MODE_R, 45.0)
                        .subfeature("temp1_max", subfeature::TEMP_MAX, flags::MODE_R, 80.0)
                        .subfeature("temp1_crit", subfeature::TEMP_CRIT, flags::MODE_R, 100.0)
                        .subfeature(
                            "temp1_crit_alarm",
                            subfeature::TEMP_CRIT_ALARM,
                            flags::MODE_R,
                            0.0,
                        ),
                )
                .feature(
                    FakeFeature::new("temp2", feature::TEMP)
                        .label("Core 0")
                        .subfeature("temp2_input", subfeature::TEMP_INPUT, flags::MODE_R, 43.0),
                ),
            FakeChip::new("nct6775", "/sys/class/hwmon/hwmon1")
                .address(0x290)
                .feature(
                    FakeFeature::new("in0", feature::IN)
                        .label("Vcore")
                        .subfeature(
                            "in0_input",
                            subfeature::IN_INPUT,
                            flags::MODE_R | flags::COMPUTE_MAPPING,
                            0.92,
                        )
                        .subfeature(
                            "in0_min",
                            subfeature::IN_MIN,
                            flags::MODE_R | flags::MODE_W | flags::COMPUTE_MAPPING,
                            0.0,
                        ),
                )
                .feature(
                    FakeFeature::new("fan1", feature::FAN)
                        .subfeature("fan1_input", subfeature::FAN_INPUT, flags::MODE_R, 1200.0)
                        .subfeature(
                            "fan1_min",
                            subfeature::FAN_MIN,
                            flags::MODE_R | flags::MODE_W,
                            300.0,
                        )
                        .subfeature("fan1_alarm", subfeature::FAN_ALARM, flags::MODE_R, 0.0),
                )
                .feature(
                    FakeFeature::new("intrusion0", feature::INTRUSION)
                        .without_label()
                        .subfeature(
                            "intrusion0_alarm",
                            subfeature::INTRUSION_ALARM,
                            flags::MODE_R | flags::MODE_W,
                            0.0,
                        ),
                ),
        ])
    }

    /// Fail `init` with `code` when the configuration contains `marker`
    pub fn reject_configs_containing(mut self, marker: impl Into<String>, code: i32) -> Self {
        self.rejected_marker = Some((marker.into(), code));
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Number of successful `init` calls so far
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Text of the configuration the live initialization was given
    pub fn config(&self) -> Option<String> {
        self.state.lock().config.clone()
    }

    fn chip(&self, record: &ChipRecord) -> Option<&ChipEntry> {
        self.chips.get(record.native.get())
    }

    fn subfeature_by_number(&self, chip: &ChipRecord, number: i32) -> Option<&SubfeatureRecord> {
        self.chip(chip)?
            .features
            .iter()
            .flat_map(|feature| feature.subfeatures.iter())
            .find(|sub| sub.number == number)
    }
}

fn chip_name(record: &ChipRecord) -> Option<String> {
    let ChipRecord {
        prefix, bus, addr, ..
    } = record;
    let name = match bus.kind {
        bus::ISA => format!("{}-isa-{:04x}", prefix, addr),
        bus::PCI => format!("{}-pci-{:04x}", prefix, addr),
        bus::I2C => format!("{}-i2c-{}-{:02x}", prefix, bus.nr, addr),
        bus::SPI => format!("{}-spi-{}-{:x}", prefix, bus.nr, addr),
        bus::VIRTUAL => format!("{}-virtual-{:x}", prefix, addr),
        bus::ACPI => format!("{}-acpi-{:x}", prefix, addr),
        bus::HID => format!("{}-hid-{}-{:x}", prefix, bus.nr, addr),
        bus::MDIO => format!("{}-mdio-{:x}", prefix, addr),
        bus::SCSI => format!("{}-scsi-{}-{:x}", prefix, bus.nr, addr),
        _ => return None,
    };
    Some(name)
}

impl SensorsApi for FakeSensors {
    fn init(&self, config: Option<File>) -> Result<(), i32> {
        let mut state = self.state.lock();
        state.calls.init += 1;

        let text = match config {
            Some(mut file) => {
                let mut text = String::new();
                file.read_to_string(&mut text).map_err(|_| -code::IO)?;
                Some(text)
            }
            None => None,
        };
        if let (Some(text), Some((marker, code))) = (&text, &self.rejected_marker) {
            if text.contains(marker.as_str()) {
                return Err(*code);
            }
        }

        state.initialized = true;
        state.generation += 1;
        state.config = text;
        Ok(())
    }

    fn cleanup(&self) {
        let mut state = self.state.lock();
        state.calls.cleanup += 1;
        state.initialized = false;
        state.config = None;
    }

    fn next_chip(&self, cursor: &mut i32) -> Option<ChipRecord> {
        let mut state = self.state.lock();
        state.calls.next_chip += 1;
        if !state.initialized {
            return None;
        }
        let entry = self.chips.get(usize::try_from(*cursor).ok()?)?;
        *cursor += 1;
        trace!(chip = %entry.record.prefix, "Fake chip");
        Some(entry.record.clone())
    }

    fn next_feature(&self, chip: &ChipRecord, cursor: &mut i32) -> Option<FeatureRecord> {
        self.state.lock().calls.next_feature += 1;
        let entry = self.chip(chip)?.features.get(usize::try_from(*cursor).ok()?)?;
        *cursor += 1;
        Some(entry.record.clone())
    }

    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        cursor: &mut i32,
    ) -> Option<SubfeatureRecord> {
        self.state.lock().calls.next_subfeature += 1;
        let record = self
            .chip(chip)?
            .features
            .get(feature.native.get())?
            .subfeatures
            .get(usize::try_from(*cursor).ok()?)?;
        *cursor += 1;
        Some(record.clone())
    }

    fn format_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32 {
        self.state.lock().calls.format_chip_name += 1;
        let name = match self.chip(chip) {
            Some(entry) if entry.formattable => chip_name(&entry.record),
            _ => None,
        };
        let Some(name) = name else {
            return -code::CHIP_NAME;
        };

        if let Some(room) = buf.len().checked_sub(1) {
            let n = room.min(name.len());
            buf[..n].copy_from_slice(&name.as_bytes()[..n]);
            buf[n] = 0;
        }
        name.len() as i32
    }

    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String> {
        self.state.lock().calls.label += 1;
        let entry = self.chip(chip)?.features.get(feature.native.get())?;
        match &entry.label {
            FakeLabel::Name => Some(entry.record.name.clone()),
            FakeLabel::Text(text) => Some(text.clone()),
            FakeLabel::Missing => None,
        }
    }

    fn value(&self, chip: &ChipRecord, number: i32) -> Result<f64, i32> {
        let sub = self.subfeature_by_number(chip, number);
        let mut state = self.state.lock();
        state.calls.value += 1;
        let sub = sub.ok_or(-code::NO_ENTRY)?;
        if sub.flags & flags::MODE_R == 0 {
            return Err(-code::ACCESS_R);
        }
        state
            .values
            .get(&(chip.native.get(), number))
            .copied()
            .ok_or(-code::NO_ENTRY)
    }

    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> Result<(), i32> {
        let sub = self.subfeature_by_number(chip, number);
        let mut state = self.state.lock();
        state.calls.set_value += 1;
        let sub = sub.ok_or(-code::NO_ENTRY)?;
        if sub.flags & flags::MODE_W == 0 {
            return Err(-code::ACCESS_W);
        }
        state.values.insert((chip.native.get(), number), value);
        Ok(())
    }

    fn adapter_name(&self, bus: &BusRecord) -> Option<String> {
        self.state.lock().calls.adapter_name += 1;
        let name = match bus.kind {
            bus::ISA => "ISA adapter",
            bus::PCI => "PCI adapter",
            bus::SPI => "SPI adapter",
            bus::VIRTUAL => "Virtual device",
            bus::ACPI => "ACPI interface",
            bus::HID => "HID adapter",
            bus::MDIO => "MDIO adapter",
            bus::SCSI => "SCSI adapter",
            _ => return None,
        };
        Some(name.to_string())
    }

    fn error_text(&self, code: i32) -> String {
        describe_code(code).to_string()
    }
}
