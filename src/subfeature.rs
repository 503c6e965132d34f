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

//! Subfeatures: the individual readable or writable quantities of a feature

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::SubfeatureRecord;
use crate::constants::{flags, subfeature as sf};
use crate::context::Sensors;
use crate::error::{ErrorKind, Result};
use crate::feature::Feature;
use crate::handle::Handle;

/// Role of a subfeature within its feature, independent of the feature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubfeatureType {
    Input,
    InputLowest,
    InputHighest,
    Cap,
    CapHyst,
    CapAlarm,
    Min,
    MinHyst,
    MinAlarm,
    Max,
    MaxHyst,
    MaxAlarm,
    Average,
    Lowest,
    Highest,
    AverageLowest,
    AverageHighest,
    AverageInterval,
    Crit,
    CritHyst,
    CritAlarm,
    LCrit,
    LCritHyst,
    LCritAlarm,
    Alarm,
    Fault,
    Emergency,
    EmergencyHyst,
    EmergencyAlarm,
    Type,
    Offset,
    Div,
    Beep,
    Pulses,
    Vid,
    Enable,
    Unknown,
}

impl SubfeatureType {
    /// Translate a native `SENSORS_SUBFEATURE_*` code. Codes of different
    /// feature types with the same role collapse onto one variant.
    pub fn from_raw(code: i32) -> Self {
        match code {
            sf::IN_INPUT | sf::FAN_INPUT | sf::TEMP_INPUT | sf::POWER_INPUT | sf::ENERGY_INPUT
            | sf::CURR_INPUT | sf::HUMIDITY_INPUT => Self::Input,
            sf::POWER_INPUT_LOWEST => Self::InputLowest,
            sf::POWER_INPUT_HIGHEST => Self::InputHighest,
            sf::POWER_CAP => Self::Cap,
            sf::POWER_CAP_HYST => Self::CapHyst,
            sf::POWER_CAP_ALARM => Self::CapAlarm,

            sf::IN_MIN | sf::FAN_MIN | sf::TEMP_MIN | sf::POWER_MIN | sf::CURR_MIN => Self::Min,
            sf::TEMP_MIN_HYST => Self::MinHyst,
            sf::IN_MIN_ALARM
            | sf::FAN_MIN_ALARM
            | sf::TEMP_MIN_ALARM
            | sf::POWER_MIN_ALARM
            | sf::CURR_MIN_ALARM => Self::MinAlarm,

            sf::IN_MAX | sf::FAN_MAX | sf::TEMP_MAX | sf::POWER_MAX | sf::CURR_MAX => Self::Max,
            sf::TEMP_MAX_HYST => Self::MaxHyst,
            sf::IN_MAX_ALARM
            | sf::FAN_MAX_ALARM
            | sf::TEMP_MAX_ALARM
            | sf::POWER_MAX_ALARM
            | sf::CURR_MAX_ALARM => Self::MaxAlarm,

            sf::IN_LOWEST | sf::TEMP_LOWEST | sf::CURR_LOWEST => Self::Lowest,
            sf::IN_HIGHEST | sf::TEMP_HIGHEST | sf::CURR_HIGHEST => Self::Highest,
            sf::IN_AVERAGE | sf::POWER_AVERAGE | sf::CURR_AVERAGE => Self::Average,
            sf::POWER_AVERAGE_LOWEST => Self::AverageLowest,
            sf::POWER_AVERAGE_HIGHEST => Self::AverageHighest,
            sf::POWER_AVERAGE_INTERVAL => Self::AverageInterval,

            sf::IN_LCRIT | sf::TEMP_LCRIT | sf::POWER_LCRIT | sf::CURR_LCRIT => Self::LCrit,
            sf::TEMP_LCRIT_HYST => Self::LCritHyst,
            sf::IN_LCRIT_ALARM
            | sf::TEMP_LCRIT_ALARM
            | sf::POWER_LCRIT_ALARM
            | sf::CURR_LCRIT_ALARM => Self::LCritAlarm,

            sf::IN_CRIT | sf::TEMP_CRIT | sf::POWER_CRIT | sf::CURR_CRIT => Self::Crit,
            sf::TEMP_CRIT_HYST => Self::CritHyst,
            sf::IN_CRIT_ALARM | sf::TEMP_CRIT_ALARM | sf::POWER_CRIT_ALARM | sf::CURR_CRIT_ALARM => {
                Self::CritAlarm
            }

            sf::IN_BEEP | sf::FAN_BEEP | sf::TEMP_BEEP | sf::CURR_BEEP | sf::INTRUSION_BEEP => {
                Self::Beep
            }
            sf::FAN_DIV => Self::Div,
            sf::FAN_PULSES => Self::Pulses,
            sf::BEEP_ENABLE => Self::Enable,
            sf::TEMP_TYPE => Self::Type,
            sf::TEMP_OFFSET => Self::Offset,
            sf::VID => Self::Vid,

            sf::IN_ALARM
            | sf::FAN_ALARM
            | sf::TEMP_ALARM
            | sf::POWER_ALARM
            | sf::CURR_ALARM
            | sf::INTRUSION_ALARM => Self::Alarm,
            sf::FAN_FAULT | sf::TEMP_FAULT => Self::Fault,

            sf::TEMP_EMERGENCY => Self::Emergency,
            sf::TEMP_EMERGENCY_ALARM => Self::EmergencyAlarm,
            sf::TEMP_EMERGENCY_HYST => Self::EmergencyHyst,

            _ => Self::Unknown,
        }
    }
}

/// A subfeature together with its parent feature (and, through it, its chip)
#[derive(Clone)]
pub struct Subfeature {
    handle: Handle<SubfeatureRecord, Feature>,
}

impl Subfeature {
    /// Subfeature from its hwmon path, e.g. `/sys/class/hwmon/hwmon0/temp1_input`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Sensors::system()?.subfeature(path)
    }

    pub(crate) fn from_record(feature: Feature, record: SubfeatureRecord) -> Self {
        Self {
            handle: Handle::new(record, feature),
        }
    }

    fn record(&self) -> &SubfeatureRecord {
        self.handle.record()
    }

    pub fn feature(&self) -> &Feature {
        self.handle.parent()
    }

    pub fn name(&self) -> &str {
        &self.record().name
    }

    /// Library-wide number of this subfeature on its chip, the key for
    /// value I/O
    pub fn number(&self) -> i32 {
        self.record().number
    }

    pub fn kind(&self) -> SubfeatureType {
        SubfeatureType::from_raw(self.record().kind)
    }

    /// Number of the main subfeature this one refers to
    pub fn mapping(&self) -> i32 {
        self.record().mapping
    }

    pub fn readable(&self) -> bool {
        self.record().flags & flags::MODE_R != 0
    }

    pub fn writable(&self) -> bool {
        self.record().flags & flags::MODE_W != 0
    }

    /// Whether the compute rules of the parent feature apply to this value
    pub fn compute_mapping(&self) -> bool {
        self.record().flags & flags::COMPUTE_MAPPING != 0
    }

    /// Current value, after any compute rules from the configuration
    pub fn read(&self) -> Result<f64> {
        let chip = self.feature().chip();
        chip.sensors()
            .api()
            .value(chip.record(), self.number())
            .map_err(|code| chip.sensors().native_error(ErrorKind::Io, code))
    }

    pub fn write(&self, value: f64) -> Result<()> {
        let chip = self.feature().chip();
        chip.sensors()
            .api()
            .set_value(chip.record(), self.number(), value)
            .map_err(|code| chip.sensors().native_error(ErrorKind::Io, code))
    }

    /// Whether `other` is a copy of this very subfeature handle
    pub fn shares_handle_with(&self, other: &Self) -> bool {
        self.handle.shares_with(&other.handle)
    }
}

impl PartialEq for Subfeature {
    fn eq(&self, other: &Self) -> bool {
        self.feature() == other.feature()
            && self.number() == other.number()
            && self.name() == other.name()
            && self.record().kind == other.record().kind
    }
}

impl Eq for Subfeature {}

impl fmt::Debug for Subfeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subfeature")
            .field("name", &self.name())
            .field("number", &self.number())
            .field("kind", &self.kind())
            .field("flags", &self.record().flags)
            .field("feature", &self.feature().name())
            .finish()
    }
}

impl fmt::Display for Subfeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
