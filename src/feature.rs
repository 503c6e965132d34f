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

//! Features: named measurement groups on a chip, such as `temp1` or `fan2`

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{cursor_iter, FeatureRecord};
use crate::chip::ChipName;
use crate::constants::feature;
use crate::context::Sensors;
use crate::error::{Result, SensorsError};
use crate::handle::Handle;
use crate::subfeature::{Subfeature, SubfeatureType};

/// What a feature measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    In,
    Fan,
    Temp,
    Power,
    Energy,
    Current,
    Humidity,
    Vid,
    Intrusion,
    Beep,
    Unknown,
}

impl FeatureType {
    /// Translate a native `SENSORS_FEATURE_*` code
    pub fn from_raw(code: i32) -> Self {
        match code {
            feature::IN => Self::In,
            feature::FAN => Self::Fan,
            feature::TEMP => Self::Temp,
            feature::POWER => Self::Power,
            feature::ENERGY => Self::Energy,
            feature::CURR => Self::Current,
            feature::HUMIDITY => Self::Humidity,
            feature::VID => Self::Vid,
            feature::INTRUSION => Self::Intrusion,
            feature::BEEP_ENABLE => Self::Beep,
            _ => Self::Unknown,
        }
    }
}

/// A feature together with its parent chip
#[derive(Clone)]
pub struct Feature {
    handle: Handle<FeatureRecord, ChipName>,
}

impl Feature {
    /// Feature from its full path, with or without a subfeature suffix:
    /// `/sys/class/hwmon/hwmon0/temp1` or `/sys/class/hwmon/hwmon0/temp1_input`
    pub fn new(full_path: impl AsRef<Path>) -> Result<Self> {
        Sensors::system()?.feature(full_path)
    }

    /// Feature `feature_name` of the chip at `chip_path`, e.g.
    /// `/sys/class/hwmon/hwmon0` and `temp1`
    pub fn on_chip(chip_path: impl AsRef<Path>, feature_name: &str) -> Result<Self> {
        Sensors::system()?.feature_on(chip_path, feature_name)
    }

    pub(crate) fn from_record(chip: ChipName, record: FeatureRecord) -> Self {
        Self {
            handle: Handle::new(record, chip),
        }
    }

    pub(crate) fn record(&self) -> &FeatureRecord {
        self.handle.record()
    }

    pub fn chip(&self) -> &ChipName {
        self.handle.parent()
    }

    pub fn name(&self) -> &str {
        &self.record().name
    }

    pub fn number(&self) -> i32 {
        self.record().number
    }

    pub fn kind(&self) -> FeatureType {
        FeatureType::from_raw(self.record().kind)
    }

    /// Label from the library; equals `name()` unless the configuration or
    /// the driver provides one
    pub fn label(&self) -> Result<String> {
        let chip = self.chip();
        chip.sensors()
            .api()
            .label(chip.record(), self.record())
            .ok_or_else(|| {
                SensorsError::io(format!("No label available for feature {}", self.name()))
            })
    }

    /// Subfeatures of this feature in library order
    pub fn subfeatures(&self) -> impl Iterator<Item = Subfeature> + '_ {
        let chip = self.chip();
        let api = chip.sensors().api();
        cursor_iter(move |nr| api.next_subfeature(chip.record(), self.record(), nr))
            .map(move |record| Subfeature::from_record(self.clone(), record))
    }

    /// First subfeature of the given type, if the feature has one
    pub fn subfeature(&self, kind: SubfeatureType) -> Option<Subfeature> {
        self.subfeatures().find(|sub| sub.kind() == kind)
    }

    /// Whether `other` is a copy of this very feature handle
    pub fn shares_handle_with(&self, other: &Self) -> bool {
        self.handle.shares_with(&other.handle)
    }
}

impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.chip() == other.chip()
            && self.number() == other.number()
            && self.name() == other.name()
    }
}

impl Eq for Feature {}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name())
            .field("number", &self.number())
            .field("kind", &self.kind())
            .field("chip", self.chip())
            .finish()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_type_translation() {
        let table = [
            (feature::IN, FeatureType::In),
            (feature::FAN, FeatureType::Fan),
            (feature::TEMP, FeatureType::Temp),
            (feature::POWER, FeatureType::Power),
            (feature::ENERGY, FeatureType::Energy),
            (feature::CURR, FeatureType::Current),
            (feature::HUMIDITY, FeatureType::Humidity),
            (feature::VID, FeatureType::Vid),
            (feature::INTRUSION, FeatureType::Intrusion),
            (feature::BEEP_ENABLE, FeatureType::Beep),
            (feature::UNKNOWN, FeatureType::Unknown),
            (0x07, FeatureType::Unknown),
        ];
        for (code, expected) in table {
            assert_eq!(FeatureType::from_raw(code), expected, "code {code:#x}");
        }
    }

    #[test]
    fn test_feature_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&FeatureType::Current).unwrap(), "\"current\"");
        let parsed: FeatureType = serde_json::from_str("\"intrusion\"").unwrap();
        assert_eq!(parsed, FeatureType::Intrusion);
    }
}
