//! Platform snapshot: the device state the diagnostic commands report on.
//!
//! The production management stack reads module state through a platform
//! driver. Here the same reports run against a validated in-memory
//! snapshot, loaded from a TOML file (`--platform`) or a built-in sample,
//! so every command is executable and deterministic.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the reporting commands can observe about the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemSnapshot {
    pub dimms: Vec<Dimm>,
    pub memory_resources: MemoryResources,
    pub capabilities: SystemCapabilities,
    #[serde(default)]
    pub sensors: Vec<SensorReading>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// One installed persistent-memory module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimm {
    /// Module identifier in `0x`-prefixed hex form (e.g. `0x0001`).
    pub dimm_id: String,
    pub socket_id: String,
    pub memory_controller_id: String,
    pub channel_id: String,
    pub slot_id: String,
    pub capacity_gib: f64,
    pub health: HealthState,
    pub fw_version: String,
    pub lock_state: LockState,
    pub form_factor: String,
    pub part_number: String,
    pub serial_number: String,
    pub device_locator: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    NonCritical,
    Critical,
    Fatal,
    Unknown,
}

impl HealthState {
    pub fn is_healthy(self) -> bool {
        self == HealthState::Healthy
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthState::Healthy => "Healthy",
            HealthState::NonCritical => "Non-Critical",
            HealthState::Critical => "Critical",
            HealthState::Fatal => "Fatal",
            HealthState::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Disabled,
    Unlocked,
    Locked,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LockState::Disabled => "Disabled",
            LockState::Unlocked => "Unlocked",
            LockState::Locked => "Locked",
        };
        f.write_str(label)
    }
}

/// Capacity allocation across provisioning modes, in GiB.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryResources {
    pub volatile_gib: f64,
    pub app_direct_gib: f64,
    pub unconfigured_gib: f64,
    pub reserved_gib: f64,
}

impl MemoryResources {
    pub fn total_gib(&self) -> f64 {
        self.volatile_gib + self.app_direct_gib + self.unconfigured_gib + self.reserved_gib
    }
}

/// Platform-level provisioning capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemCapabilities {
    pub platform_config_supported: bool,
    pub alignment_gib: f64,
    pub allowed_volatile_mode: String,
    pub current_volatile_mode: String,
    pub allowed_app_direct_mode: String,
}

/// One sensor reading on one module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorReading {
    pub dimm_id: String,
    pub sensor: SensorType,
    pub current_value: String,
    pub state: SensorState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Health,
    MediaTemperature,
    ControllerTemperature,
    PercentageRemaining,
    PowerOnTime,
    DirtyShutdownCount,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SensorType::Health => "Health",
            SensorType::MediaTemperature => "MediaTemperature",
            SensorType::ControllerTemperature => "ControllerTemperature",
            SensorType::PercentageRemaining => "PercentageRemaining",
            SensorType::PowerOnTime => "PowerOnTime",
            SensorType::DirtyShutdownCount => "DirtyShutdownCount",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SensorState {
    Normal,
    NonCritical,
    Critical,
    Unknown,
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SensorState::Normal => "Normal",
            SensorState::NonCritical => "Non-Critical",
            SensorState::Critical => "Critical",
            SensorState::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// One stored platform event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventRecord {
    /// RFC 3339 timestamp (quoted string in TOML).
    pub time: DateTime<Utc>,
    pub severity: EventSeverity,
    pub code: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventSeverity::Info => "Info",
            EventSeverity::Warning => "Warning",
            EventSeverity::Error => "Error",
        };
        f.write_str(label)
    }
}

impl SystemSnapshot {
    /// Load and validate a snapshot from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read platform snapshot {}", path.display()))?;
        let snapshot: SystemSnapshot = toml::from_str(&contents)
            .with_context(|| format!("parse platform snapshot {}", path.display()))?;
        snapshot
            .validate()
            .with_context(|| format!("validate platform snapshot {}", path.display()))?;
        debug!(path = %path.display(), dimms = snapshot.dimms.len(), "platform snapshot loaded");
        Ok(snapshot)
    }

    /// Load from `path` when given, otherwise fall back to the built-in
    /// sample.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::sample()),
        }
    }

    /// Deterministic two-module snapshot used when no `--platform` file is
    /// supplied.
    pub fn sample() -> Self {
        let dimms = vec![
            Dimm {
                dimm_id: "0x0001".to_string(),
                socket_id: "0x0000".to_string(),
                memory_controller_id: "0x0000".to_string(),
                channel_id: "0x0000".to_string(),
                slot_id: "0x0000".to_string(),
                capacity_gib: 126.4,
                health: HealthState::Healthy,
                fw_version: "01.02.00.5446".to_string(),
                lock_state: LockState::Disabled,
                form_factor: "DIMM".to_string(),
                part_number: "PM-9010-126".to_string(),
                serial_number: "8089-a2-1746-00000001".to_string(),
                device_locator: "CPU1_DIMM_A1".to_string(),
            },
            Dimm {
                dimm_id: "0x0011".to_string(),
                socket_id: "0x0000".to_string(),
                memory_controller_id: "0x0001".to_string(),
                channel_id: "0x0000".to_string(),
                slot_id: "0x0000".to_string(),
                capacity_gib: 126.4,
                health: HealthState::Healthy,
                fw_version: "01.02.00.5446".to_string(),
                lock_state: LockState::Disabled,
                form_factor: "DIMM".to_string(),
                part_number: "PM-9010-126".to_string(),
                serial_number: "8089-a2-1746-00000002".to_string(),
                device_locator: "CPU1_DIMM_D1".to_string(),
            },
        ];

        let mut sensors = Vec::new();
        for (dimm_id, media, controller) in [("0x0001", "31 C", "33 C"), ("0x0011", "32 C", "34 C")]
        {
            sensors.push(SensorReading {
                dimm_id: dimm_id.to_string(),
                sensor: SensorType::Health,
                current_value: "Healthy".to_string(),
                state: SensorState::Normal,
            });
            sensors.push(SensorReading {
                dimm_id: dimm_id.to_string(),
                sensor: SensorType::MediaTemperature,
                current_value: media.to_string(),
                state: SensorState::Normal,
            });
            sensors.push(SensorReading {
                dimm_id: dimm_id.to_string(),
                sensor: SensorType::ControllerTemperature,
                current_value: controller.to_string(),
                state: SensorState::Normal,
            });
            sensors.push(SensorReading {
                dimm_id: dimm_id.to_string(),
                sensor: SensorType::PercentageRemaining,
                current_value: "100 %".to_string(),
                state: SensorState::Normal,
            });
        }

        let events = vec![
            EventRecord {
                time: ts("2026-01-12T08:30:11Z"),
                severity: EventSeverity::Info,
                code: 1,
                message: "Platform configuration applied".to_string(),
            },
            EventRecord {
                time: ts("2026-01-12T08:30:42Z"),
                severity: EventSeverity::Info,
                code: 104,
                message: "Boot status check passed on all modules".to_string(),
            },
        ];

        Self {
            dimms,
            memory_resources: MemoryResources {
                volatile_gib: 0.0,
                app_direct_gib: 252.0,
                unconfigured_gib: 0.0,
                reserved_gib: 0.8,
            },
            capabilities: SystemCapabilities {
                platform_config_supported: true,
                alignment_gib: 1.0,
                allowed_volatile_mode: "Memory Mode".to_string(),
                current_volatile_mode: "App Direct".to_string(),
                allowed_app_direct_mode: "App Direct".to_string(),
            },
            sensors,
            events,
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for dimm in &self.dimms {
            validate_module_id(&dimm.dimm_id)?;
            if !seen.insert(dimm.dimm_id.as_str()) {
                bail!("duplicate dimm_id {}", dimm.dimm_id);
            }
            if dimm.capacity_gib < 0.0 {
                bail!("dimm {} capacity_gib must be >= 0", dimm.dimm_id);
            }
            if dimm.fw_version.trim().is_empty() {
                bail!("dimm {} fw_version must be non-empty", dimm.dimm_id);
            }
        }
        for sensor in &self.sensors {
            if !seen.contains(sensor.dimm_id.as_str()) {
                bail!("sensor references unknown dimm_id {}", sensor.dimm_id);
            }
        }
        let resources = &self.memory_resources;
        for (label, value) in [
            ("volatile_gib", resources.volatile_gib),
            ("app_direct_gib", resources.app_direct_gib),
            ("unconfigured_gib", resources.unconfigured_gib),
            ("reserved_gib", resources.reserved_gib),
        ] {
            if value < 0.0 {
                bail!("memory_resources.{label} must be >= 0");
            }
        }
        if self.capabilities.alignment_gib <= 0.0 {
            bail!("capabilities.alignment_gib must be > 0");
        }
        Ok(())
    }
}

/// Format a GiB capacity figure the way every listing prints it.
pub fn fmt_gib(gib: f64) -> String {
    format!("{gib:.1} GiB")
}

fn validate_module_id(id: &str) -> Result<()> {
    let valid = id
        .strip_prefix("0x")
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|ch| ch.is_ascii_hexdigit()));
    if !valid {
        bail!("dimm_id {id:?} must be 0x-prefixed hex");
    }
    Ok(())
}

fn ts(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|time| time.with_timezone(&Utc))
        .unwrap_or_default()
}
