// permkit-cli — Permission table inspection and device simulation
//
// Diagnostic driver for the permkit permission layer: prints the resolved
// identifier tables and replays check/request/foreground cycles against a
// simulated device.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use permkit_core::{
    consolidate, resolve, AppState, DeviceInfo, PermissionHook, PermissionId, PermissionStatus,
    PermissionType, Platform, RawPermissionResult, SimulatedBinding, SimulatedLifecycle,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "permkit")]
#[command(about = "Permkit — Mobile Permission State Toolkit", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identifier table for every permission type
    Table {
        #[arg(long, default_value = "android")]
        platform: Platform,
        /// Android API level (ignored on iOS)
        #[arg(long, default_value_t = 34)]
        api_level: u32,
        /// Treat the device as the iOS simulator
        #[arg(long)]
        simulator: bool,
        #[arg(long)]
        json: bool,
    },
    /// Resolve the identifiers for one permission type
    Resolve {
        permission: PermissionType,
        #[arg(long, default_value = "android")]
        platform: Platform,
        #[arg(long, default_value_t = 34)]
        api_level: u32,
        #[arg(long)]
        simulator: bool,
        #[arg(long)]
        json: bool,
    },
    /// Consolidate raw results into a single status
    Consolidate {
        /// Raw results (granted, denied, blocked, limited, unavailable)
        results: Vec<RawPermissionResult>,
    },
    /// Replay a check/request/foreground cycle on a simulated device
    Simulate {
        permission: PermissionType,
        #[arg(long, default_value = "android")]
        platform: Platform,
        #[arg(long, default_value_t = 34)]
        api_level: u32,
        #[arg(long)]
        simulator: bool,
        /// Scripted check result, e.g. android.permission.CAMERA=granted
        #[arg(long = "check", value_parser = parse_scripted)]
        check: Vec<(PermissionId, RawPermissionResult)>,
        /// Scripted request result, e.g. android.permission.CAMERA=granted
        #[arg(long = "request", value_parser = parse_scripted)]
        request: Vec<(PermissionId, RawPermissionResult)>,
    },
}

fn parse_scripted(s: &str) -> Result<(PermissionId, RawPermissionResult), String> {
    let (id, result) = s
        .split_once('=')
        .ok_or_else(|| format!("expected IDENTIFIER=RESULT, got: {s}"))?;
    Ok((id.parse()?, result.parse()?))
}

fn device_from(platform: Platform, api_level: u32, simulator: bool) -> DeviceInfo {
    match platform {
        Platform::Android => DeviceInfo::android(api_level),
        Platform::Ios if simulator => DeviceInfo::ios_simulator(),
        Platform::Ios => DeviceInfo::ios(),
    }
}

fn paint(status: PermissionStatus) -> ColoredString {
    match status {
        PermissionStatus::Initialising => status.as_str().dimmed(),
        PermissionStatus::Granted => status.as_str().green(),
        PermissionStatus::Requestable => status.as_str().yellow(),
        PermissionStatus::Blocked => status.as_str().red(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Table {
            platform,
            api_level,
            simulator,
            json,
        } => cmd_table(device_from(platform, api_level, simulator), json),
        Commands::Resolve {
            permission,
            platform,
            api_level,
            simulator,
            json,
        } => cmd_resolve(permission, device_from(platform, api_level, simulator), json),
        Commands::Consolidate { results } => cmd_consolidate(&results),
        Commands::Simulate {
            permission,
            platform,
            api_level,
            simulator,
            check,
            request,
        } => {
            cmd_simulate(
                permission,
                device_from(platform, api_level, simulator),
                check,
                request,
            )
            .await
        }
    }
}

fn cmd_table(device: DeviceInfo, json: bool) -> Result<()> {
    if json {
        let table: serde_json::Map<String, serde_json::Value> = PermissionType::ALL
            .iter()
            .map(|permission| {
                let ids: Vec<&str> = resolve(*permission, &device)
                    .iter()
                    .map(|id| id.as_str())
                    .collect();
                (permission.as_str().to_string(), serde_json::json!(ids))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!(
        "{} {} (api level {}{})",
        "permission table for".bold(),
        device.platform,
        device.api_level,
        if device.is_simulator { ", simulator" } else { "" }
    );
    for permission in PermissionType::ALL {
        let ids = resolve(permission, &device);
        if ids.is_empty() {
            println!("  {:<14} {}", permission.to_string(), "(none, treated as granted)".dimmed());
        } else {
            for (index, id) in ids.iter().enumerate() {
                if index == 0 {
                    println!("  {:<14} {}", permission.to_string(), id);
                } else {
                    println!("  {:<14} {}", "", id);
                }
            }
        }
    }
    Ok(())
}

fn cmd_resolve(permission: PermissionType, device: DeviceInfo, json: bool) -> Result<()> {
    let ids = resolve(permission, &device);
    if json {
        let strings: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&strings)?);
        return Ok(());
    }

    if ids.is_empty() {
        println!("{}", "(none, treated as granted)".dimmed());
    } else {
        for id in ids {
            println!("{id}");
        }
    }
    Ok(())
}

fn cmd_consolidate(results: &[RawPermissionResult]) -> Result<()> {
    if results.is_empty() {
        println!(
            "{} {}",
            "(no results)".dimmed(),
            paint(consolidate(results))
        );
    } else {
        println!("{}", paint(consolidate(results)));
    }
    Ok(())
}

async fn cmd_simulate(
    permission: PermissionType,
    device: DeviceInfo,
    check: Vec<(PermissionId, RawPermissionResult)>,
    request: Vec<(PermissionId, RawPermissionResult)>,
) -> Result<()> {
    let binding = Arc::new(SimulatedBinding::new());
    for (id, result) in check {
        binding.set_check_result(id, result);
    }
    for (id, result) in request {
        binding.set_request_result(id, result);
    }

    let lifecycle = SimulatedLifecycle::new(AppState::Active);
    tracing::debug!(%permission, ?device, "binding simulated hook");
    let hook = PermissionHook::bind(permission, device, binding.clone(), &lifecycle).await?;

    println!("{} {}", "initial check:".bold(), paint(hook.status()));

    if hook.is_requestable() {
        let status = hook.request().await?;
        println!("{} {}", "request:".bold(), paint(status));
    } else {
        println!(
            "{} {}",
            "request:".bold(),
            "skipped (status not requestable)".dimmed()
        );
    }

    // Round-trip through the background, as if the user visited settings.
    lifecycle.set_state(AppState::Background);
    lifecycle.set_state(AppState::Active);
    tokio::time::sleep(Duration::from_millis(20)).await;

    println!("{} {}", "foreground re-check:".bold(), paint(hook.status()));
    Ok(())
}
