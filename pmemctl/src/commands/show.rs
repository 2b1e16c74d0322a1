//! Reporting commands over the platform snapshot.
//!
//! Attribute labels (`DimmID`, `Capacity`, `HealthState`, ...) are the
//! stable display vocabulary of the management surface; scripts grep for
//! them, so they change only deliberately.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::OutputMode;
use crate::context::CommandContext;
use crate::platform::{SensorType, fmt_gib};

pub fn memory_resources(ctx: &CommandContext) -> Result<()> {
    let resources = &ctx.snapshot().memory_resources;
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, resources);
    }
    let mut out = ctx.out();
    writeln!(out, "Capacity={}", fmt_gib(resources.total_gib()))?;
    writeln!(out, "MemoryCapacity={}", fmt_gib(resources.volatile_gib))?;
    writeln!(out, "AppDirectCapacity={}", fmt_gib(resources.app_direct_gib))?;
    writeln!(
        out,
        "UnconfiguredCapacity={}",
        fmt_gib(resources.unconfigured_gib)
    )?;
    writeln!(out, "ReservedCapacity={}", fmt_gib(resources.reserved_gib))?;
    Ok(())
}

pub fn dimms(ctx: &CommandContext, all: bool) -> Result<()> {
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, &ctx.snapshot().dimms);
    }
    if all { dimm_details(ctx) } else { dimm_table(ctx) }
}

fn dimm_table(ctx: &CommandContext) -> Result<()> {
    let mut out = ctx.out();
    writeln!(
        out,
        " DimmID | Capacity  | HealthState | LockState | FWVersion"
    )?;
    writeln!(out, "{}", "=".repeat(60))?;
    for dimm in &ctx.snapshot().dimms {
        writeln!(
            out,
            " {} | {:>9} | {:<11} | {:<9} | {}",
            dimm.dimm_id,
            fmt_gib(dimm.capacity_gib),
            dimm.health.to_string(),
            dimm.lock_state.to_string(),
            dimm.fw_version
        )?;
    }
    Ok(())
}

fn dimm_details(ctx: &CommandContext) -> Result<()> {
    let mut out = ctx.out();
    for dimm in &ctx.snapshot().dimms {
        writeln!(out, "---DimmID={}---", dimm.dimm_id)?;
        writeln!(out, "   SocketID={}", dimm.socket_id)?;
        writeln!(out, "   Capacity={}", fmt_gib(dimm.capacity_gib))?;
        writeln!(out, "   HealthState={}", dimm.health)?;
        writeln!(out, "   FWVersion={}", dimm.fw_version)?;
        writeln!(out, "   LockState={}", dimm.lock_state)?;
        writeln!(out, "   FormFactor={}", dimm.form_factor)?;
        writeln!(out, "   PartNumber={}", dimm.part_number)?;
        writeln!(out, "   SerialNumber={}", dimm.serial_number)?;
        writeln!(out, "   DeviceLocator={}", dimm.device_locator)?;
        writeln!(out, "   MemControllerID={}", dimm.memory_controller_id)?;
        writeln!(out, "   ChannelID={}", dimm.channel_id)?;
        writeln!(out, "   SlotID={}", dimm.slot_id)?;
    }
    Ok(())
}

pub fn system(ctx: &CommandContext, all: bool) -> Result<()> {
    let capabilities = &ctx.snapshot().capabilities;
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, capabilities);
    }
    let mut out = ctx.out();
    writeln!(
        out,
        "AllowedVolatileMode={}",
        capabilities.allowed_volatile_mode
    )?;
    writeln!(
        out,
        "CurrentVolatileMode={}",
        capabilities.current_volatile_mode
    )?;
    writeln!(
        out,
        "AllowedAppDirectMode={}",
        capabilities.allowed_app_direct_mode
    )?;
    if all {
        writeln!(
            out,
            "PlatformConfigSupported={}",
            u8::from(capabilities.platform_config_supported)
        )?;
        writeln!(out, "Alignment={}", fmt_gib(capabilities.alignment_gib))?;
    }
    Ok(())
}

pub fn topology(ctx: &CommandContext, all: bool) -> Result<()> {
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, &ctx.snapshot().dimms);
    }
    let mut out = ctx.out();
    if all {
        for dimm in &ctx.snapshot().dimms {
            writeln!(out, "---DimmID={}---", dimm.dimm_id)?;
            writeln!(out, "   SocketID={}", dimm.socket_id)?;
            writeln!(out, "   MemControllerID={}", dimm.memory_controller_id)?;
            writeln!(out, "   ChannelID={}", dimm.channel_id)?;
            writeln!(out, "   SlotID={}", dimm.slot_id)?;
            writeln!(out, "   DeviceLocator={}", dimm.device_locator)?;
        }
        return Ok(());
    }
    writeln!(out, " DimmID | SocketID | ChannelID | SlotID | DeviceLocator")?;
    writeln!(out, "{}", "=".repeat(58))?;
    for dimm in &ctx.snapshot().dimms {
        writeln!(
            out,
            " {} | {} | {} | {} | {}",
            dimm.dimm_id, dimm.socket_id, dimm.channel_id, dimm.slot_id, dimm.device_locator
        )?;
    }
    Ok(())
}

pub fn sensors(ctx: &CommandContext, all: bool) -> Result<()> {
    let readings: Vec<_> = ctx
        .snapshot()
        .sensors
        .iter()
        .filter(|reading| all || reading.sensor == SensorType::Health)
        .collect();
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, &readings);
    }
    let mut out = ctx.out();
    writeln!(out, " DimmID | Type | CurrentValue | State")?;
    writeln!(out, "{}", "=".repeat(48))?;
    for reading in readings {
        writeln!(
            out,
            " {} | {} | {} | {}",
            reading.dimm_id, reading.sensor, reading.current_value, reading.state
        )?;
    }
    Ok(())
}

pub fn events(ctx: &CommandContext) -> Result<()> {
    if ctx.output() == OutputMode::Json {
        return write_json(ctx, &ctx.snapshot().events);
    }
    let mut out = ctx.out();
    writeln!(out, " Time | Severity | Code | Message")?;
    writeln!(out, "{}", "=".repeat(56))?;
    for event in &ctx.snapshot().events {
        writeln!(
            out,
            " {} | {} | {:03} | {}",
            event.time.format("%Y-%m-%d %H:%M:%S"),
            event.severity,
            event.code,
            event.message
        )?;
    }
    Ok(())
}

fn write_json<T: Serialize>(ctx: &CommandContext, value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize listing")?;
    writeln!(ctx.out(), "{payload}")?;
    Ok(())
}
