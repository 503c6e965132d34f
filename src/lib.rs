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

//! lmsensors - safe access to the Linux lm-sensors library
//!
//! libsensors is loaded at runtime and exposed as a tree of chips, features
//! and subfeatures, each of which can be located from its sysfs path:
//!
//! ```no_run
//! let input = lmsensors::Subfeature::new("/sys/class/hwmon/hwmon0/temp1_input")?;
//! println!("{} = {}", input, input.read()?);
//! # Ok::<(), lmsensors::SensorsError>(())
//! ```
//!
//! The library is process-global state. It is initialized lazily with the
//! default configuration on the first lookup and released when the last
//! handle to the context goes away. [`Sensors::new`] builds an independent
//! context over any [`SensorsApi`] backend, such as [`fake::FakeSensors`].

pub mod api;
pub mod bus;
pub mod chip;
pub mod constants;
pub mod context;
pub mod error;
pub mod fake;
pub mod feature;
mod handle;
pub mod libsensors;
mod lookup;
pub mod snapshot;
pub mod subfeature;

use std::path::Path;

pub use api::{
    BusRecord, ChipRecord, FeatureRecord, NativeRef, SensorsApi, SharedApi, SubfeatureRecord,
};
pub use bus::{BusId, BusType};
pub use chip::ChipName;
pub use context::Sensors;
pub use error::{ErrorKind, Result, SensorsError};
pub use feature::{Feature, FeatureType};
pub use libsensors::LibSensors;
pub use subfeature::{Subfeature, SubfeatureType};

/// Reload the system library with the configuration file at `path`.
///
/// An empty path selects the default configuration.
///
/// # Safety
///
/// See [`Sensors::load_config`]: every entity obtained from the system
/// context before the call is invalidated.
pub unsafe fn load_config(path: impl AsRef<Path>) -> Result<()> {
    Sensors::system()?.load_config(path)
}

/// Every chip the system library detects
pub fn get_detected_chips() -> Result<Vec<ChipName>> {
    Ok(Sensors::system()?.detected_chips()?.collect())
}
