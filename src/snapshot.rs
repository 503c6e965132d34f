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

//! Sensor tree snapshots
//!
//! Walks every detected chip and records its features, subfeatures and their
//! current values in plain serializable structs. Used for diagnostics and
//! for exporting what the library sees.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, trace};

use crate::bus::BusType;
use crate::chip::ChipName;
use crate::context::Sensors;
use crate::error::{Result, SensorsError};
use crate::feature::{Feature, FeatureType};
use crate::subfeature::{Subfeature, SubfeatureType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub timestamp_ms: u64,
    pub chips: Vec<ChipSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipSnapshot {
    /// Formatted name, absent when the library cannot format it
    pub name: Option<String>,
    pub prefix: String,
    pub path: String,
    pub address: i32,
    pub bus: BusSnapshot,
    pub features: Vec<FeatureSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusSnapshot {
    pub kind: BusType,
    pub nr: i16,
    pub adapter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSnapshot {
    pub name: String,
    pub number: i32,
    pub kind: FeatureType,
    pub label: Option<String>,
    pub subfeatures: Vec<SubfeatureSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubfeatureSnapshot {
    pub name: String,
    pub number: i32,
    pub kind: SubfeatureType,
    pub readable: bool,
    pub writable: bool,
    /// Current value; absent for write-only entries and failed reads
    pub value: Option<f64>,
}

impl SensorSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SensorsError::io(format!("Failed to serialize snapshot: {}", e)))
    }

    pub fn to_json_compact(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SensorsError::io(format!("Failed to serialize snapshot: {}", e)))
    }

    pub fn subfeature_count(&self) -> usize {
        self.chips
            .iter()
            .flat_map(|chip| &chip.features)
            .map(|feature| feature.subfeatures.len())
            .sum()
    }
}

/// Capture every chip the context can see
pub fn capture(sensors: &Arc<Sensors>) -> Result<SensorSnapshot> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let chips: Vec<ChipSnapshot> = sensors.detected_chips()?.map(|chip| capture_chip(&chip)).collect();

    debug!(
        chips = chips.len(),
        timestamp = timestamp_ms,
        "Captured sensors snapshot"
    );

    Ok(SensorSnapshot {
        timestamp_ms,
        chips,
    })
}

pub fn capture_chip(chip: &ChipName) -> ChipSnapshot {
    let name = match chip.name() {
        Ok(name) => Some(name),
        Err(e) => {
            trace!(chip = %chip, error = %e, "Chip name unavailable");
            None
        }
    };
    let bus = chip.bus();
    let features: Vec<FeatureSnapshot> = chip.features().map(|f| capture_feature(&f)).collect();

    trace!(chip = %chip, features = features.len(), "Captured chip data");

    ChipSnapshot {
        name,
        prefix: chip.prefix().to_string(),
        path: chip.path().to_string(),
        address: chip.address(),
        bus: BusSnapshot {
            kind: bus.kind(),
            nr: bus.nr(),
            adapter: bus.adapter_name(),
        },
        features,
    }
}

fn capture_feature(feature: &Feature) -> FeatureSnapshot {
    FeatureSnapshot {
        name: feature.name().to_string(),
        number: feature.number(),
        kind: feature.kind(),
        label: feature.label().ok(),
        subfeatures: feature.subfeatures().map(|s| capture_subfeature(&s)).collect(),
    }
}

fn capture_subfeature(subfeature: &Subfeature) -> SubfeatureSnapshot {
    let value = if subfeature.readable() {
        match subfeature.read() {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(subfeature = subfeature.name(), error = %e, "Read failed");
                None
            }
        }
    } else {
        None
    };

    SubfeatureSnapshot {
        name: subfeature.name().to_string(),
        number: subfeature.number(),
        kind: subfeature.kind(),
        readable: subfeature.readable(),
        writable: subfeature.writable(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSensors;

    #[test]
    fn test_capture_sample() {
        let sensors = Sensors::new(Arc::new(FakeSensors::sample()));
        let snapshot = capture(&sensors).unwrap();

        assert_eq!(snapshot.chips.len(), 2);
        assert_eq!(snapshot.subfeature_count(), 11);

        let coretemp = &snapshot.chips[0];
        assert_eq!(coretemp.name.as_deref(), Some("coretemp-isa-0000"));
        assert_eq!(coretemp.bus.adapter, "ISA adapter");
        assert_eq!(coretemp.features[0].label.as_deref(), Some("Package id 0"));
        assert_eq!(coretemp.features[0].subfeatures[0].value, Some(45.0));

        let intrusion = &snapshot.chips[1].features[2];
        assert_eq!(intrusion.label, None);
        assert_eq!(intrusion.kind, FeatureType::Intrusion);
    }

    #[test]
    fn test_snapshot_json() {
        let sensors = Sensors::new(Arc::new(FakeSensors::sample()));
        let snapshot = capture(&sensors).unwrap();
        let json = snapshot.to_json_compact().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["chips"][1]["prefix"], "nct6775");
        assert_eq!(parsed["chips"][1]["address"], 0x290);
        assert_eq!(parsed["chips"][0]["bus"]["kind"], "isa");
        assert_eq!(parsed["chips"][0]["features"][0]["kind"], "temp");
        assert_eq!(
            parsed["chips"][0]["features"][0]["subfeatures"][3]["kind"],
            "crit_alarm"
        );
        assert!(snapshot.to_json().unwrap().contains('\n'));
    }
}
