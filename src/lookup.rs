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

//! Path resolution
//!
//! Maps hwmon-style paths onto chips, features and subfeatures by scanning
//! what the backend enumerates. Nothing here trusts the shape of a path on
//! its own: every split only produces a candidate name, and a lookup
//! succeeds only when an enumerated record matches it exactly.
//!
//! - chip: first detected chip whose path is a leading part of the given path
//! - feature: `<chip dir>/<feature>[_<suffix>]`, the feature candidate being
//!   the file name up to its last underscore; when no feature has that name,
//!   shorter underscore-delimited prefixes are tried (`temp1_crit_alarm` ->
//!   `temp1_crit`, then `temp1`) and finally the whole file name
//! - subfeature: the full file name, looked up on the feature resolved from
//!   the same path

use std::path::{Path, MAIN_SEPARATOR};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::api::cursor_iter;
use crate::context::Sensors;
use crate::error::{Result, SensorsError};
use crate::{ChipName, Feature, Subfeature};

pub(crate) fn find_chip(sensors: &Arc<Sensors>, path: &Path) -> Result<ChipName> {
    sensors.ensure_init()?;
    let api = sensors.api();
    let found = cursor_iter(|nr| api.next_chip(nr)).find(|record| {
        trace!(chip = %record.prefix, path = %record.path, "Checking chip");
        path.starts_with(&record.path)
    });

    match found {
        Some(record) => {
            debug!(chip = %record.prefix, path = %path.display(), "Resolved chip");
            Ok(ChipName::from_record(Arc::clone(sensors), record))
        }
        None => {
            warn!(path = %path.display(), "No chip found");
            Err(SensorsError::parse(format!(
                "No chip found at {}",
                path.display()
            )))
        }
    }
}

pub(crate) fn find_feature(
    sensors: &Arc<Sensors>,
    chip_path: &Path,
    feature_name: &str,
) -> Result<Feature> {
    let chip = find_chip(sensors, chip_path)?;
    match_feature(&chip, std::iter::once(feature_name))
}

pub(crate) fn find_feature_by_path(sensors: &Arc<Sensors>, full_path: &Path) -> Result<Feature> {
    let (chip_path, file_name) = split_path(full_path)?;
    let chip = find_chip(sensors, chip_path)?;
    match_feature(&chip, feature_candidates(file_name))
}

/// First feature of `chip` named exactly like one of `candidates`, trying
/// candidates in order
fn match_feature<'a>(
    chip: &ChipName,
    mut candidates: impl Iterator<Item = &'a str>,
) -> Result<Feature> {
    let Some(primary) = candidates.next() else {
        return Err(SensorsError::parse("Empty feature name"));
    };
    let features: Vec<Feature> = chip.features().collect();

    for name in std::iter::once(primary).chain(candidates) {
        if let Some(feature) = features.iter().find(|feature| feature.name() == name) {
            debug!(chip = %chip.prefix(), feature = name, "Resolved feature");
            return Ok(feature.clone());
        }
        trace!(chip = %chip.prefix(), candidate = name, "No feature with this name");
    }

    warn!(chip = %chip.prefix(), feature = primary, "Feature not found");
    Err(SensorsError::parse(format!(
        "Feature {} not found on chip {}",
        primary,
        chip.prefix()
    )))
}

pub(crate) fn find_subfeature(sensors: &Arc<Sensors>, path: &Path) -> Result<Subfeature> {
    let (_, sub_name) = split_path(path)?;
    let feature = find_feature_by_path(sensors, path)?;
    let found = feature.subfeatures().find(|sub| sub.name() == sub_name);

    match found {
        Some(sub) => {
            debug!(feature = %feature.name(), subfeature = sub_name, "Resolved subfeature");
            Ok(sub)
        }
        None => {
            warn!(feature = %feature.name(), subfeature = sub_name, "Subfeature not found");
            Err(SensorsError::parse(format!("Subfeature not found: {}", sub_name)))
        }
    }
}

/// Split `path` into its directory and a non-empty file name
fn split_path(path: &Path) -> Result<(&Path, &str)> {
    let no_filename =
        || SensorsError::parse(format!("Path does not contain filename: {}", path.display()));

    if path.as_os_str().to_string_lossy().ends_with(MAIN_SEPARATOR) {
        return Err(no_filename());
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(no_filename)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok((dir, file_name))
}

/// Every feature name a file name may belong to, most likely first: the
/// prefixes before each underscore from the last one backwards, then the
/// file name itself. `temp1_input` -> `temp1`, `fan1` -> `fan1`.
pub(crate) fn feature_candidates(file_name: &str) -> impl Iterator<Item = &str> {
    file_name
        .rmatch_indices('_')
        .map(move |(pos, _)| &file_name[..pos])
        .chain(std::iter::once(file_name))
}
