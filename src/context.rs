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

//! Library lifecycle and the explicit context object
//!
//! libsensors keeps one process-wide configuration. [`Sensors`] owns that
//! state for one backend: it initializes lazily with the default
//! configuration on first use, swaps configurations on request and tears
//! everything down when dropped. Every entity holds an `Arc<Sensors>`, so a
//! context outlives everything resolved through it.
//!
//! [`Sensors::system`] is the default process-wide instance backed by the real
//! libsensors, used by the free functions and the path constructors.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::{cursor_iter, SensorsApi, SharedApi};
use crate::error::{ErrorKind, Result, SensorsError};
use crate::libsensors::LibSensors;
use crate::lookup;
use crate::{ChipName, Feature, Subfeature};

lazy_static! {
    static ref SYSTEM: Mutex<Option<Arc<Sensors>>> = Mutex::new(None);
}

#[derive(Debug, Default)]
struct Lifecycle {
    /// Configuration of the live initialization; empty for the default
    active: Option<PathBuf>,
}

/// Owner of one backend's global state
pub struct Sensors {
    api: SharedApi,
    state: Mutex<Lifecycle>,
}

impl Sensors {
    /// Wrap a backend. Nothing is initialized until the first lookup.
    pub fn new(api: SharedApi) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: Mutex::new(Lifecycle::default()),
        })
    }

    /// The process-wide instance backed by the system libsensors.
    ///
    /// Loading the shared library is retried on every call until it succeeds.
    pub fn system() -> Result<Arc<Self>> {
        let mut slot = SYSTEM.lock();
        if let Some(sensors) = slot.as_ref() {
            return Ok(Arc::clone(sensors));
        }
        let library = LibSensors::open()?;
        let sensors = Self::new(Arc::new(library));
        *slot = Some(Arc::clone(&sensors));
        Ok(sensors)
    }

    pub(crate) fn api(&self) -> &(dyn SensorsApi + Send + Sync) {
        self.api.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().active.is_some()
    }

    /// Configuration file of the live initialization.
    ///
    /// `Some` of an empty path means the library default.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.state.lock().active.clone()
    }

    /// Initialize with the default configuration unless already initialized
    pub fn ensure_init(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.active.is_some() {
            return Ok(());
        }
        self.start(&mut state, Path::new(""))
    }

    /// (Re)load the library with the configuration file at `path`.
    ///
    /// An empty path selects the default configuration. Asking for the
    /// configuration that is already active does nothing; anything else tears
    /// the library down and initializes it again. If that fails the context
    /// is left uninitialized and the next lookup starts over with the default.
    ///
    /// # Safety
    ///
    /// A reload invalidates every [`ChipName`], [`Feature`], [`Subfeature`]
    /// and [`crate::BusId`] obtained from this context before the call. The
    /// caller must not use any of them afterwards, and must not run this
    /// concurrently with any other use of the context.
    pub unsafe fn load_config(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut state = self.state.lock();
        if state.active.as_deref() == Some(path) {
            debug!(config = %path.display(), "Configuration already active");
            return Ok(());
        }
        if state.active.take().is_some() {
            info!("Releasing sensors library state for reconfiguration");
            self.api.cleanup();
        }
        self.start(&mut state, path)
    }

    fn start(&self, state: &mut Lifecycle, path: &Path) -> Result<()> {
        let config = if path.as_os_str().is_empty() {
            None
        } else {
            let file = File::open(path).map_err(|e| {
                warn!(config = %path.display(), error = %e, "Cannot open sensors configuration");
                SensorsError::init(format!("Failed to open config file ({})", e))
            })?;
            Some(file)
        };

        self.api
            .init(config)
            .map_err(|code| self.native_error(ErrorKind::Init, code))?;

        if path.as_os_str().is_empty() {
            info!("Sensors library initialized with the default configuration");
        } else {
            info!(config = %path.display(), "Sensors library initialized");
        }
        state.active = Some(path.to_path_buf());
        Ok(())
    }

    /// Build an error of `kind` from a backend error number
    pub(crate) fn native_error(&self, kind: ErrorKind, code: i32) -> SensorsError {
        SensorsError::from_code(kind, code, |c| self.api.error_text(c))
    }

    /// Every detected chip, in backend order
    pub fn detected_chips(self: &Arc<Self>) -> Result<impl Iterator<Item = ChipName>> {
        self.ensure_init()?;
        let sensors = Arc::clone(self);
        let api = Arc::clone(&self.api);
        Ok(cursor_iter(move |nr| api.next_chip(nr))
            .map(move |record| ChipName::from_record(Arc::clone(&sensors), record)))
    }

    /// Chip whose path is a prefix of `path`, e.g. `/sys/class/hwmon/hwmon0`
    pub fn chip_name(self: &Arc<Self>, path: impl AsRef<Path>) -> Result<ChipName> {
        lookup::find_chip(self, path.as_ref())
    }

    /// Feature from its full path, with or without a subfeature suffix,
    /// e.g. `/sys/class/hwmon/hwmon0/temp1_input`
    pub fn feature(self: &Arc<Self>, full_path: impl AsRef<Path>) -> Result<Feature> {
        lookup::find_feature_by_path(self, full_path.as_ref())
    }

    /// Feature named `feature_name` on the chip at `chip_path`
    pub fn feature_on(
        self: &Arc<Self>,
        chip_path: impl AsRef<Path>,
        feature_name: &str,
    ) -> Result<Feature> {
        lookup::find_feature(self, chip_path.as_ref(), feature_name)
    }

    /// Subfeature from its full path, e.g. `/sys/class/hwmon/hwmon0/temp1_input`
    pub fn subfeature(self: &Arc<Self>, path: impl AsRef<Path>) -> Result<Subfeature> {
        lookup::find_subfeature(self, path.as_ref())
    }
}

impl Drop for Sensors {
    fn drop(&mut self) {
        if self.state.get_mut().active.take().is_some() {
            info!("Sensors library state released");
            self.api.cleanup();
        }
    }
}

impl fmt::Debug for Sensors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensors")
            .field("config", &self.state.lock().active)
            .finish_non_exhaustive()
    }
}
