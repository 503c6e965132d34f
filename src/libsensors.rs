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

//! libsensors backend
//!
//! Loads the system libsensors at runtime and exposes it through
//! [`SensorsApi`]. Records handed out carry the address of the library's own
//! descriptor in their [`NativeRef`]; those descriptors live in arrays owned by
//! libsensors and stay put until `sensors_cleanup`.
//!
//! ## Safety
//!
//! Every call that passes a record back dereferences that address. The
//! owning [`crate::Sensors`] only lets records reach this backend while the
//! initialization that produced them is active, except across an explicit
//! (unsafe) reconfiguration.

use std::ffi::{c_char, c_double, c_int, c_short, c_uint, CStr};
use std::fs::File;
use std::os::fd::IntoRawFd;
use std::ptr;

use libloading::Library;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::api::{BusRecord, ChipRecord, FeatureRecord, NativeRef, SensorsApi, SubfeatureRecord};
use crate::constants::library;
use crate::error::{code, Result, SensorsError};

/// `sensors_bus_id`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct RawBusId {
    kind: c_short,
    nr: c_short,
}

/// `sensors_chip_name`
#[repr(C)]
#[derive(Debug)]
struct RawChipName {
    prefix: *mut c_char,
    bus: RawBusId,
    addr: c_int,
    path: *mut c_char,
}

/// `sensors_feature`
#[repr(C)]
#[derive(Debug)]
#[allow(dead_code)]
struct RawFeature {
    name: *mut c_char,
    number: c_int,
    kind: c_int,
    first_subfeature: c_int,
    padding1: c_int,
}

/// `sensors_subfeature`
#[repr(C)]
#[derive(Debug)]
struct RawSubfeature {
    name: *mut c_char,
    number: c_int,
    kind: c_int,
    mapping: c_int,
    flags: c_uint,
}

type InitFn = unsafe extern "C" fn(*mut libc::FILE) -> c_int;
type CleanupFn = unsafe extern "C" fn();
type DetectedChipsFn = unsafe extern "C" fn(*const RawChipName, *mut c_int) -> *const RawChipName;
type FeaturesFn = unsafe extern "C" fn(*const RawChipName, *mut c_int) -> *const RawFeature;
type SubfeaturesFn =
    unsafe extern "C" fn(*const RawChipName, *const RawFeature, *mut c_int) -> *const RawSubfeature;
type FormatChipNameFn = unsafe extern "C" fn(*mut c_char, libc::size_t, *const RawChipName) -> c_int;
type LabelFn = unsafe extern "C" fn(*const RawChipName, *const RawFeature) -> *mut c_char;
type GetValueFn = unsafe extern "C" fn(*const RawChipName, c_int, *mut c_double) -> c_int;
type SetValueFn = unsafe extern "C" fn(*const RawChipName, c_int, c_double) -> c_int;
type AdapterNameFn = unsafe extern "C" fn(*const RawBusId) -> *const c_char;
type StrerrorFn = unsafe extern "C" fn(c_int) -> *const c_char;

/// Resolved entry points; valid as long as the `Library` they came from
#[derive(Clone, Copy)]
struct Symbols {
    init: InitFn,
    cleanup: CleanupFn,
    get_detected_chips: DetectedChipsFn,
    get_features: FeaturesFn,
    get_all_subfeatures: SubfeaturesFn,
    snprintf_chip_name: FormatChipNameFn,
    get_label: LabelFn,
    get_value: GetValueFn,
    set_value: SetValueFn,
    get_adapter_name: AdapterNameFn,
    strerror: StrerrorFn,
}

impl Symbols {
    /// # Safety
    ///
    /// `lib` must be libsensors (ABI 5) and must outlive the returned table.
    unsafe fn resolve(lib: &Library) -> std::result::Result<Self, libloading::Error> {
        Ok(Self {
            init: *lib.get::<InitFn>(b"sensors_init\0")?,
            cleanup: *lib.get::<CleanupFn>(b"sensors_cleanup\0")?,
            get_detected_chips: *lib.get::<DetectedChipsFn>(b"sensors_get_detected_chips\0")?,
            get_features: *lib.get::<FeaturesFn>(b"sensors_get_features\0")?,
            get_all_subfeatures: *lib.get::<SubfeaturesFn>(b"sensors_get_all_subfeatures\0")?,
            snprintf_chip_name: *lib.get::<FormatChipNameFn>(b"sensors_snprintf_chip_name\0")?,
            get_label: *lib.get::<LabelFn>(b"sensors_get_label\0")?,
            get_value: *lib.get::<GetValueFn>(b"sensors_get_value\0")?,
            set_value: *lib.get::<SetValueFn>(b"sensors_set_value\0")?,
            get_adapter_name: *lib.get::<AdapterNameFn>(b"sensors_get_adapter_name\0")?,
            strerror: *lib.get::<StrerrorFn>(b"sensors_strerror\0")?,
        })
    }
}

/// Configuration stream handed to `sensors_init`, closed at cleanup
struct ConfigStream(*mut libc::FILE);

// SAFETY: the stream is only touched under the `config` mutex.
unsafe impl Send for ConfigStream {}

/// The system libsensors, loaded with `libloading`.
///
/// libsensors state is process-global, so the only instance lives behind
/// [`crate::Sensors::system`]:
///
/// ```compile_fail
/// let second = lmsensors::LibSensors::open();
/// ```
pub struct LibSensors {
    symbols: Symbols,
    config: Mutex<Option<ConfigStream>>,
    _library: Library,
}

impl LibSensors {
    /// Load libsensors from the default sonames
    pub(crate) fn open() -> Result<Self> {
        Self::open_from(library::SONAMES)
    }

    /// Load libsensors from the first of `candidates` that loads and exports
    /// the full API
    pub(crate) fn open_from(candidates: &[&str]) -> Result<Self> {
        let mut last_error = String::from("no library candidates given");
        for candidate in candidates {
            // SAFETY: loading libsensors runs no initialization code with
            // preconditions; symbols are checked against the expected names.
            match unsafe { Self::try_load(candidate) } {
                Ok(lib) => {
                    debug!(library = candidate, "Loaded libsensors");
                    return Ok(lib);
                }
                Err(e) => {
                    debug!(library = candidate, error = %e, "Cannot load libsensors candidate");
                    last_error = format!("{}: {}", candidate, e);
                }
            }
        }
        warn!(error = %last_error, "libsensors is not available");
        Err(SensorsError::init(format!(
            "Failed to load libsensors ({})",
            last_error
        )))
    }

    unsafe fn try_load(path: &str) -> std::result::Result<Self, libloading::Error> {
        let library = Library::new(path)?;
        let symbols = Symbols::resolve(&library)?;
        Ok(Self {
            symbols,
            config: Mutex::new(None),
            _library: library,
        })
    }
}

fn chip_ptr(chip: &ChipRecord) -> *const RawChipName {
    chip.native.get() as *const RawChipName
}

fn feature_ptr(feature: &FeatureRecord) -> *const RawFeature {
    feature.native.get() as *const RawFeature
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

impl SensorsApi for LibSensors {
    fn init(&self, config: Option<File>) -> std::result::Result<(), i32> {
        let stream = match config {
            Some(file) => {
                let fd = file.into_raw_fd();
                // SAFETY: `fd` is an open descriptor we own; on success the
                // FILE takes it over.
                let stream = unsafe { libc::fdopen(fd, b"r\0".as_ptr() as *const c_char) };
                if stream.is_null() {
                    // SAFETY: fdopen failed, so the descriptor is still ours.
                    unsafe { libc::close(fd) };
                    return Err(-code::IO);
                }
                stream
            }
            None => ptr::null_mut(),
        };

        // SAFETY: `stream` is null or a valid readable FILE.
        let rc = unsafe { (self.symbols.init)(stream) };
        if rc != 0 {
            if !stream.is_null() {
                // SAFETY: the stream was opened above and is not stored.
                unsafe { libc::fclose(stream) };
            }
            return Err(rc);
        }
        if !stream.is_null() {
            *self.config.lock() = Some(ConfigStream(stream));
        }
        Ok(())
    }

    fn cleanup(&self) {
        // SAFETY: releases library state; no descriptors are used afterwards.
        unsafe { (self.symbols.cleanup)() };
        if let Some(ConfigStream(stream)) = self.config.lock().take() {
            // SAFETY: the stream came from fdopen in `init`.
            unsafe { libc::fclose(stream) };
        }
    }

    fn next_chip(&self, cursor: &mut i32) -> Option<ChipRecord> {
        // SAFETY: a null match pattern selects every chip; the returned
        // descriptor is owned by libsensors.
        let raw = unsafe { (self.symbols.get_detected_chips)(ptr::null(), cursor) };
        // SAFETY: non-null results point into libsensors' chip array.
        let chip = unsafe { raw.as_ref() }?;
        // SAFETY: prefix and path are NUL-terminated strings owned by the chip.
        unsafe {
            Some(ChipRecord {
                native: NativeRef::new(raw as usize),
                prefix: owned_string(chip.prefix),
                bus: BusRecord {
                    kind: chip.bus.kind,
                    nr: chip.bus.nr,
                },
                addr: chip.addr,
                path: owned_string(chip.path),
            })
        }
    }

    fn next_feature(&self, chip: &ChipRecord, cursor: &mut i32) -> Option<FeatureRecord> {
        // SAFETY: see module docs.
        let raw = unsafe { (self.symbols.get_features)(chip_ptr(chip), cursor) };
        // SAFETY: non-null results point into the chip's feature array.
        let feature = unsafe { raw.as_ref() }?;
        Some(FeatureRecord {
            native: NativeRef::new(raw as usize),
            // SAFETY: feature names are NUL-terminated strings.
            name: unsafe { owned_string(feature.name) },
            number: feature.number,
            kind: feature.kind,
        })
    }

    fn next_subfeature(
        &self,
        chip: &ChipRecord,
        feature: &FeatureRecord,
        cursor: &mut i32,
    ) -> Option<SubfeatureRecord> {
        // SAFETY: see module docs.
        let raw = unsafe {
            (self.symbols.get_all_subfeatures)(chip_ptr(chip), feature_ptr(feature), cursor)
        };
        // SAFETY: non-null results point into the chip's subfeature array.
        let sub = unsafe { raw.as_ref() }?;
        Some(SubfeatureRecord {
            native: NativeRef::new(raw as usize),
            // SAFETY: subfeature names are NUL-terminated strings.
            name: unsafe { owned_string(sub.name) },
            number: sub.number,
            kind: sub.kind,
            mapping: sub.mapping,
            flags: sub.flags,
        })
    }

    fn format_chip_name(&self, chip: &ChipRecord, buf: &mut [u8]) -> i32 {
        let out = if buf.is_empty() {
            ptr::null_mut()
        } else {
            buf.as_mut_ptr() as *mut c_char
        };
        // SAFETY: `out` is null with size 0, or valid for `buf.len()` bytes.
        unsafe { (self.symbols.snprintf_chip_name)(out, buf.len(), chip_ptr(chip)) }
    }

    fn label(&self, chip: &ChipRecord, feature: &FeatureRecord) -> Option<String> {
        // SAFETY: see module docs; the result is malloc'd and ours to free.
        let raw = unsafe { (self.symbols.get_label)(chip_ptr(chip), feature_ptr(feature)) };
        if raw.is_null() {
            return None;
        }
        // SAFETY: `raw` is a NUL-terminated heap string from libsensors.
        let label = unsafe { owned_string(raw) };
        // SAFETY: allocated with malloc by sensors_get_label.
        unsafe { libc::free(raw as *mut libc::c_void) };
        Some(label)
    }

    fn value(&self, chip: &ChipRecord, number: i32) -> std::result::Result<f64, i32> {
        let mut value: c_double = 0.0;
        // SAFETY: see module docs; `value` is a valid out pointer.
        let rc = unsafe { (self.symbols.get_value)(chip_ptr(chip), number, &mut value) };
        if rc != 0 {
            return Err(rc);
        }
        Ok(value)
    }

    fn set_value(&self, chip: &ChipRecord, number: i32, value: f64) -> std::result::Result<(), i32> {
        // SAFETY: see module docs.
        let rc = unsafe { (self.symbols.set_value)(chip_ptr(chip), number, value) };
        if rc != 0 {
            return Err(rc);
        }
        Ok(())
    }

    fn adapter_name(&self, bus: &BusRecord) -> Option<String> {
        let raw_bus = RawBusId {
            kind: bus.kind,
            nr: bus.nr,
        };
        // SAFETY: the function only reads type and nr from the pointer.
        let raw = unsafe { (self.symbols.get_adapter_name)(&raw_bus) };
        if raw.is_null() {
            return None;
        }
        // SAFETY: adapter names are static NUL-terminated strings.
        Some(unsafe { owned_string(raw) })
    }

    fn error_text(&self, code: i32) -> String {
        // SAFETY: sensors_strerror accepts any value and returns a static string.
        unsafe { owned_string((self.symbols.strerror)(code)) }
    }
}
