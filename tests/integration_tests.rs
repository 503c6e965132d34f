/*
 * Integration tests for lmsensors
 *
 * These drive the public lookup and navigation surface against the
 * in-memory backend, plus the process-wide context where it can be
 * exercised without real hardware.
 */

use std::io::Write;
use std::sync::Arc;

use lmsensors::constants::{bus, feature, flags, subfeature};
use lmsensors::error::code;
use lmsensors::fake::{FakeChip, FakeFeature, FakeSensors};
use lmsensors::snapshot;
use lmsensors::{BusType, ErrorKind, FeatureType, Sensors, SubfeatureType};
use serial_test::serial;
use tempfile::NamedTempFile;

// Test utilities
fn sample() -> (Arc<FakeSensors>, Arc<Sensors>) {
    let fake = Arc::new(FakeSensors::sample());
    let sensors = Sensors::new(fake.clone());
    (fake, sensors)
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_every_subfeature_path_round_trips() {
    let (_, sensors) = sample();
    let mut seen = 0;

    for chip in sensors.detected_chips().unwrap() {
        for feat in chip.features() {
            for sub in feat.subfeatures() {
                let path = format!("{}/{}", chip.path(), sub.name());
                let found = sensors.subfeature(&path).unwrap();
                assert_eq!(found, sub, "{path}");
                assert_eq!(found.feature(), &feat);
                assert_eq!(found.feature().chip(), &chip);

                let by_path = sensors.feature(&path).unwrap();
                assert_eq!(by_path, feat, "{path}");
                seen += 1;
            }
        }
    }
    assert_eq!(seen, 11);
}

#[test]
fn test_chip_lookup_by_prefix() {
    let (_, sensors) = sample();

    let chip = sensors.chip_name("/sys/class/hwmon/hwmon1").unwrap();
    assert_eq!(chip.prefix(), "nct6775");

    let deeper = sensors.chip_name("/sys/class/hwmon/hwmon1/device/fan1_input").unwrap();
    assert_eq!(deeper, chip);
}

#[test]
fn test_chip_prefix_matches_whole_components() {
    let fake = Arc::new(FakeSensors::new(vec![
        FakeChip::new("it8728", "/sys/class/hwmon/hwmon1"),
        FakeChip::new("amdgpu", "/sys/class/hwmon/hwmon10").bus(bus::PCI, 0).address(0x300),
    ]));
    let sensors = Sensors::new(fake);

    let chip = sensors.chip_name("/sys/class/hwmon/hwmon10/temp1_input").unwrap();
    assert_eq!(chip.prefix(), "amdgpu");
    let chip = sensors.chip_name("/sys/class/hwmon/hwmon1/temp1_input").unwrap();
    assert_eq!(chip.prefix(), "it8728");
}

#[test]
fn test_feature_resolution_from_file_names() {
    let (_, sensors) = sample();

    let temp = sensors.feature("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
    assert_eq!(temp.name(), "temp1");
    assert_eq!(temp.kind(), FeatureType::Temp);

    let alarm = sensors.feature("/sys/class/hwmon/hwmon0/temp1_crit_alarm").unwrap();
    assert_eq!(alarm, temp);

    let intrusion = sensors.feature("/sys/class/hwmon/hwmon1/intrusion0_alarm").unwrap();
    assert_eq!(intrusion.name(), "intrusion0");

    let fan = sensors.feature_on("/sys/class/hwmon/hwmon1", "fan1").unwrap();
    assert_eq!(fan.kind(), FeatureType::Fan);
    assert_eq!(fan.chip().prefix(), "nct6775");
}

#[test]
fn test_feature_path_without_underscore() {
    let fake = Arc::new(FakeSensors::new(vec![FakeChip::new("acpitz", "/sys/class/hwmon/hwmon2")
        .bus(bus::ACPI, 0)
        .feature(FakeFeature::new("fan1", feature::FAN).subfeature(
            "fan1",
            subfeature::FAN_INPUT,
            flags::MODE_R,
            900.0,
        ))]));
    let sensors = Sensors::new(fake);

    let fan = sensors.feature("/sys/class/hwmon/hwmon2/fan1").unwrap();
    assert_eq!(fan.name(), "fan1");
    let input = sensors.subfeature("/sys/class/hwmon/hwmon2/fan1").unwrap();
    assert_eq!(input.read().unwrap(), 900.0);
}

#[test]
fn test_lookup_errors_are_parse_errors() {
    let (_, sensors) = sample();

    let err = sensors.chip_name("/sys/class/hwmon/hwmon7").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.message(), "No chip found at /sys/class/hwmon/hwmon7");

    let err = sensors.feature("/sys/class/hwmon/hwmon0/fan9_input").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.message(), "Feature fan9 not found on chip coretemp");

    let err = sensors.feature_on("/sys/class/hwmon/hwmon0", "temp9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.message(), "Feature temp9 not found on chip coretemp");

    let err = sensors.subfeature("/sys/class/hwmon/hwmon0/temp1_lowest").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.message(), "Subfeature not found: temp1_lowest");

    let err = sensors.subfeature("/sys/class/hwmon/hwmon0/").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.message().starts_with("Path does not contain filename"));

    let err = sensors.feature("/sys/class/hwmon/hwmon9/temp1_input").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_clones_share_handles_without_library_calls() {
    let (fake, sensors) = sample();
    let input = sensors.subfeature("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
    let before = fake.calls();

    let copy = input.clone();
    let chip = copy.feature().chip().clone();
    let _ = format!("{copy} {chip:?}");

    assert_eq!(fake.calls(), before);
    assert!(copy.shares_handle_with(&input));
    assert!(copy.feature().shares_handle_with(input.feature()));
    assert!(chip.shares_handle_with(input.feature().chip()));

    // A fresh lookup is equal but owns a new handle
    let again = sensors.subfeature("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
    assert_eq!(again, input);
    assert!(!again.shares_handle_with(&input));
    assert!(fake.calls().enumerations() > before.enumerations());
}

#[test]
fn test_entities_keep_context_alive() {
    let fake = Arc::new(FakeSensors::sample());
    let input = {
        let sensors = Sensors::new(fake.clone());
        sensors.subfeature("/sys/class/hwmon/hwmon1/fan1_input").unwrap()
    };

    assert!(fake.is_initialized());
    assert_eq!(input.read().unwrap(), 1200.0);

    drop(input);
    assert!(!fake.is_initialized());
    assert_eq!(fake.calls().cleanup, 1);
}

#[test]
fn test_lazy_initialization_happens_once() {
    let (fake, sensors) = sample();
    assert!(!sensors.is_initialized());

    sensors.chip_name("/sys/class/hwmon/hwmon0").unwrap();
    sensors.feature("/sys/class/hwmon/hwmon1/fan1_input").unwrap();
    let _: Vec<_> = sensors.detected_chips().unwrap().collect();

    assert_eq!(fake.calls().init, 1);
    assert_eq!(sensors.config_path(), Some("".into()));
    assert_eq!(fake.config(), None);
}

#[test]
fn test_reconfiguration() {
    let (fake, sensors) = sample();
    sensors.ensure_init().unwrap();

    let first = config_file("chip \"coretemp-*\"\n    label temp1 \"CPU\"\n");
    unsafe { sensors.load_config(first.path()) }.unwrap();
    assert_eq!(fake.calls().cleanup, 1);
    assert_eq!(fake.generation(), 2);
    assert!(fake.config().unwrap().contains("label temp1"));
    assert_eq!(sensors.config_path().as_deref(), Some(first.path()));

    // Same configuration again leaves the library alone
    unsafe { sensors.load_config(first.path()) }.unwrap();
    assert_eq!(fake.calls().init, 2);
    assert_eq!(fake.calls().cleanup, 1);

    let second = config_file("chip \"nct6775-*\"\n    ignore fan1\n");
    unsafe { sensors.load_config(second.path()) }.unwrap();
    assert_eq!(fake.calls().cleanup, 2);
    assert!(fake.config().unwrap().contains("ignore fan1"));

    unsafe { sensors.load_config("") }.unwrap();
    assert_eq!(fake.config(), None);
    assert_eq!(fake.generation(), 4);

    let chips: Vec<_> = sensors.detected_chips().unwrap().collect();
    assert_eq!(chips.len(), 2);
}

#[test]
fn test_rejected_configuration() {
    let fake = Arc::new(FakeSensors::sample().reject_configs_containing("bogus", -code::PARSE));
    let sensors = Sensors::new(fake.clone());
    sensors.ensure_init().unwrap();

    let bad = config_file("bogus statement\n");
    let err = unsafe { sensors.load_config(bad.path()) }.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Init);
    assert_eq!(err.message(), "General parse error");
    assert!(!sensors.is_initialized());

    // The next lookup starts over with the default configuration
    sensors.chip_name("/sys/class/hwmon/hwmon0").unwrap();
    assert!(sensors.is_initialized());
    assert_eq!(fake.config(), None);
}

#[test]
fn test_missing_configuration_file() {
    let (fake, sensors) = sample();
    let dir = tempfile::tempdir().unwrap();

    let err = unsafe { sensors.load_config(dir.path().join("sensors3.conf")) }.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Init);
    assert!(err.message().starts_with("Failed to open config file"));
    assert_eq!(fake.calls().init, 0);
}

#[test]
fn test_value_read_write() {
    let (_, sensors) = sample();
    let min = sensors.subfeature("/sys/class/hwmon/hwmon1/fan1_min").unwrap();
    assert!(min.readable());
    assert!(min.writable());
    assert_eq!(min.read().unwrap(), 300.0);

    min.write(42.0).unwrap();
    assert_eq!(min.read().unwrap(), 42.0);

    // Another handle to the same subfeature sees the new value
    let again = sensors.subfeature("/sys/class/hwmon/hwmon1/fan1_min").unwrap();
    assert_eq!(again.read().unwrap(), 42.0);
}

#[test]
fn test_value_write_rejected() {
    let (_, sensors) = sample();
    let input = sensors.subfeature("/sys/class/hwmon/hwmon0/temp1_input").unwrap();
    assert!(!input.writable());

    let err = input.write(42.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), "Can't write");
    assert_eq!(input.read().unwrap(), 45.0);
}

#[test]
fn test_write_only_subfeature() {
    let fake = Arc::new(FakeSensors::new(vec![FakeChip::new("w83627ehf", "/sys/class/hwmon/hwmon3")
        .feature(FakeFeature::new("beep_enable", feature::BEEP_ENABLE).subfeature(
            "beep_enable",
            subfeature::BEEP_ENABLE,
            flags::MODE_W,
            0.0,
        ))]));
    let sensors = Sensors::new(fake);

    let beep = sensors.subfeature("/sys/class/hwmon/hwmon3/beep_enable").unwrap();
    assert_eq!(beep.kind(), SubfeatureType::Enable);
    beep.write(1.0).unwrap();
    let err = beep.read().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), "Can't read");
}

#[test]
fn test_chip_names_and_buses() {
    let fake = Arc::new(FakeSensors::new(vec![
        FakeChip::new("coretemp", "/sys/class/hwmon/hwmon0"),
        FakeChip::new("lm75", "/sys/class/hwmon/hwmon1").bus(bus::I2C, 3).address(0x48),
        FakeChip::new("nvme", "/sys/class/hwmon/hwmon2").bus(bus::PCI, 0).address(0x100),
        FakeChip::new("mystery", "/sys/class/hwmon/hwmon3").unformattable(),
    ]));
    let sensors = Sensors::new(fake);
    let chips: Vec<_> = sensors.detected_chips().unwrap().collect();

    assert_eq!(chips[0].name().unwrap(), "coretemp-isa-0000");
    assert_eq!(chips[1].name().unwrap(), "lm75-i2c-3-48");
    assert_eq!(chips[2].name().unwrap(), "nvme-pci-0100");

    let err = chips[3].name().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), "Can't parse chip name");

    assert_eq!(chips[0].bus().kind(), BusType::Isa);
    assert_eq!(chips[0].bus().adapter_name(), "ISA adapter");
    assert_eq!(chips[1].bus().kind(), BusType::I2c);
    assert_eq!(chips[1].bus().nr(), 3);
    assert_eq!(chips[1].bus().adapter_name(), "");
    assert_eq!(chips[1].address(), 0x48);
    assert_eq!(chips[1].to_string(), "lm75@/sys/class/hwmon/hwmon1");
}

#[test]
fn test_labels() {
    let (_, sensors) = sample();

    let temp = sensors.feature_on("/sys/class/hwmon/hwmon0", "temp1").unwrap();
    assert_eq!(temp.label().unwrap(), "Package id 0");

    let fan = sensors.feature_on("/sys/class/hwmon/hwmon1", "fan1").unwrap();
    assert_eq!(fan.label().unwrap(), "fan1");

    let intrusion = sensors.feature_on("/sys/class/hwmon/hwmon1", "intrusion0").unwrap();
    let err = intrusion.label().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.message(), "No label available for feature intrusion0");
}

#[test]
fn test_subfeature_by_type() {
    let (_, sensors) = sample();
    let temp = sensors.feature_on("/sys/class/hwmon/hwmon0", "temp1").unwrap();

    let crit = temp.subfeature(SubfeatureType::Crit).unwrap();
    assert_eq!(crit.name(), "temp1_crit");
    assert_eq!(crit.read().unwrap(), 100.0);
    assert_eq!(crit.mapping(), temp.number());
    assert!(temp.subfeature(SubfeatureType::Lowest).is_none());

    let vcore = sensors.subfeature("/sys/class/hwmon/hwmon1/in0_input").unwrap();
    assert!(vcore.compute_mapping());
    assert_eq!(vcore.feature().kind(), FeatureType::In);
}

#[test]
fn test_snapshot_export() {
    let (_, sensors) = sample();
    let fan_min = sensors.subfeature("/sys/class/hwmon/hwmon1/fan1_min").unwrap();
    fan_min.write(600.0).unwrap();

    let snap = snapshot::capture(&sensors).unwrap();
    let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();

    let fan = &json["chips"][1]["features"][1];
    assert_eq!(fan["name"], "fan1");
    assert_eq!(fan["subfeatures"][1]["value"], 600.0);
    assert_eq!(fan["subfeatures"][1]["writable"], true);
    assert_eq!(json["chips"][1]["name"], "nct6775-isa-0290");
}

#[test]
#[serial]
fn test_system_context_without_hardware() {
    // Either the library is missing or no chip lives at this path
    match lmsensors::ChipName::new("/nonexistent/hwmon0") {
        Ok(chip) => panic!("unexpected chip {chip}"),
        Err(err) => assert!(matches!(err.kind(), ErrorKind::Init | ErrorKind::Parse), "{err}"),
    }
}

#[test]
#[serial]
fn test_system_detected_chips_are_consistent() {
    let Ok(chips) = lmsensors::get_detected_chips() else {
        return;
    };
    for chip in chips {
        let again = lmsensors::ChipName::new(chip.path()).unwrap();
        assert_eq!(again, chip);
    }
}

#[test]
#[serial]
fn test_system_context_is_shared() {
    let Ok(first) = Sensors::system() else {
        return;
    };
    let second = Sensors::system().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
