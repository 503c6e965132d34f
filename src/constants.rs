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

//! Native constants of the libsensors ABI
//!
//! Bus, feature and subfeature type codes and the subfeature flag bits, as
//! published in `<sensors/sensors.h>`. Nothing else in the crate spells these
//! numbers out.

/// Shared objects tried, in order, when loading libsensors
pub mod library {
    pub const SONAMES: &[&str] = &["libsensors.so.5", "libsensors.so"];
}

/// `sensors_subfeature.flags` bits
pub mod flags {
    pub const MODE_R: u32 = 0x01;
    pub const MODE_W: u32 = 0x02;
    pub const COMPUTE_MAPPING: u32 = 0x04;
}

/// `SENSORS_BUS_TYPE_*`
pub mod bus {
    pub const ANY: i16 = -1;
    pub const I2C: i16 = 0;
    pub const ISA: i16 = 1;
    pub const PCI: i16 = 2;
    pub const SPI: i16 = 3;
    pub const VIRTUAL: i16 = 4;
    pub const ACPI: i16 = 5;
    pub const HID: i16 = 6;
    pub const MDIO: i16 = 7;
    pub const SCSI: i16 = 8;
}

/// `SENSORS_FEATURE_*`
pub mod feature {
    pub const IN: i32 = 0x00;
    pub const FAN: i32 = 0x01;
    pub const TEMP: i32 = 0x02;
    pub const POWER: i32 = 0x03;
    pub const ENERGY: i32 = 0x04;
    pub const CURR: i32 = 0x05;
    pub const HUMIDITY: i32 = 0x06;
    pub const VID: i32 = 0x10;
    pub const INTRUSION: i32 = 0x11;
    pub const BEEP_ENABLE: i32 = 0x18;
    pub const UNKNOWN: i32 = i32::MAX;
}

/// `SENSORS_SUBFEATURE_*`
///
/// Codes are `feature type << 8` plus an index; alarms and other
/// non-value attributes start at index `0x80`.
pub mod subfeature {
    pub const IN_INPUT: i32 = 0x000;
    pub const IN_MIN: i32 = 0x001;
    pub const IN_MAX: i32 = 0x002;
    pub const IN_LCRIT: i32 = 0x003;
    pub const IN_CRIT: i32 = 0x004;
    pub const IN_AVERAGE: i32 = 0x005;
    pub const IN_LOWEST: i32 = 0x006;
    pub const IN_HIGHEST: i32 = 0x007;
    pub const IN_ALARM: i32 = 0x080;
    pub const IN_MIN_ALARM: i32 = 0x081;
    pub const IN_MAX_ALARM: i32 = 0x082;
    pub const IN_BEEP: i32 = 0x083;
    pub const IN_LCRIT_ALARM: i32 = 0x084;
    pub const IN_CRIT_ALARM: i32 = 0x085;

    pub const FAN_INPUT: i32 = 0x100;
    pub const FAN_MIN: i32 = 0x101;
    pub const FAN_MAX: i32 = 0x102;
    pub const FAN_ALARM: i32 = 0x180;
    pub const FAN_FAULT: i32 = 0x181;
    pub const FAN_DIV: i32 = 0x182;
    pub const FAN_BEEP: i32 = 0x183;
    pub const FAN_PULSES: i32 = 0x184;
    pub const FAN_MIN_ALARM: i32 = 0x185;
    pub const FAN_MAX_ALARM: i32 = 0x186;

    pub const TEMP_INPUT: i32 = 0x200;
    pub const TEMP_MAX: i32 = 0x201;
    pub const TEMP_MAX_HYST: i32 = 0x202;
    pub const TEMP_MIN: i32 = 0x203;
    pub const TEMP_CRIT: i32 = 0x204;
    pub const TEMP_CRIT_HYST: i32 = 0x205;
    pub const TEMP_LCRIT: i32 = 0x206;
    pub const TEMP_EMERGENCY: i32 = 0x207;
    pub const TEMP_EMERGENCY_HYST: i32 = 0x208;
    pub const TEMP_LOWEST: i32 = 0x209;
    pub const TEMP_HIGHEST: i32 = 0x20a;
    pub const TEMP_MIN_HYST: i32 = 0x20b;
    pub const TEMP_LCRIT_HYST: i32 = 0x20c;
    pub const TEMP_ALARM: i32 = 0x280;
    pub const TEMP_MAX_ALARM: i32 = 0x281;
    pub const TEMP_MIN_ALARM: i32 = 0x282;
    pub const TEMP_CRIT_ALARM: i32 = 0x283;
    pub const TEMP_FAULT: i32 = 0x284;
    pub const TEMP_TYPE: i32 = 0x285;
    pub const TEMP_OFFSET: i32 = 0x286;
    pub const TEMP_BEEP: i32 = 0x287;
    pub const TEMP_EMERGENCY_ALARM: i32 = 0x288;
    pub const TEMP_LCRIT_ALARM: i32 = 0x289;

    pub const POWER_AVERAGE: i32 = 0x300;
    pub const POWER_AVERAGE_HIGHEST: i32 = 0x301;
    pub const POWER_AVERAGE_LOWEST: i32 = 0x302;
    pub const POWER_INPUT: i32 = 0x303;
    pub const POWER_INPUT_HIGHEST: i32 = 0x304;
    pub const POWER_INPUT_LOWEST: i32 = 0x305;
    pub const POWER_CAP: i32 = 0x306;
    pub const POWER_CAP_HYST: i32 = 0x307;
    pub const POWER_MAX: i32 = 0x308;
    pub const POWER_CRIT: i32 = 0x309;
    pub const POWER_MIN: i32 = 0x30a;
    pub const POWER_LCRIT: i32 = 0x30b;
    pub const POWER_AVERAGE_INTERVAL: i32 = 0x380;
    pub const POWER_ALARM: i32 = 0x381;
    pub const POWER_CAP_ALARM: i32 = 0x382;
    pub const POWER_MAX_ALARM: i32 = 0x383;
    pub const POWER_CRIT_ALARM: i32 = 0x384;
    pub const POWER_MIN_ALARM: i32 = 0x385;
    pub const POWER_LCRIT_ALARM: i32 = 0x386;

    pub const ENERGY_INPUT: i32 = 0x400;

    pub const CURR_INPUT: i32 = 0x500;
    pub const CURR_MIN: i32 = 0x501;
    pub const CURR_MAX: i32 = 0x502;
    pub const CURR_LCRIT: i32 = 0x503;
    pub const CURR_CRIT: i32 = 0x504;
    pub const CURR_AVERAGE: i32 = 0x505;
    pub const CURR_LOWEST: i32 = 0x506;
    pub const CURR_HIGHEST: i32 = 0x507;
    pub const CURR_ALARM: i32 = 0x580;
    pub const CURR_MIN_ALARM: i32 = 0x581;
    pub const CURR_MAX_ALARM: i32 = 0x582;
    pub const CURR_BEEP: i32 = 0x583;
    pub const CURR_LCRIT_ALARM: i32 = 0x584;
    pub const CURR_CRIT_ALARM: i32 = 0x585;

    pub const HUMIDITY_INPUT: i32 = 0x600;

    pub const VID: i32 = 0x1000;

    pub const INTRUSION_ALARM: i32 = 0x1100;
    pub const INTRUSION_BEEP: i32 = 0x1101;

    pub const BEEP_ENABLE: i32 = 0x1800;

    pub const UNKNOWN: i32 = i32::MAX;
}
