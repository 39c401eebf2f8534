mod args;

use anyhow::{anyhow, bail, Context, Result};
use args::{BundleArgs, Cli, Command, DevicesArgs, ListArgs, OsArgs};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xcsim_bundles::scan_installed_bundles;
use xcsim_core::{SimulatorConfig, XcsimError};
use xcsim_device_set::DeviceSet;
use xcsim_query::{BundleQuery, QueryEngine};
use xcsim_report::{list_output_json, summarize};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("xcsim: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<XcsimError>().map_or(1, exit_code_of)
}

fn exit_code_of(err: &XcsimError) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(1)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let set = DeviceSet::from_config(&config)?;

    match cli.command {
        Command::List(args) => list(&set, args),
        Command::Bundle(args) => bundle(&set, args),
        Command::Os(args) => oses(&set, args),
        Command::Devices(args) => devices(&set, args),
    }
}

fn load_config(cli: &Cli) -> Result<SimulatorConfig> {
    let root = cli
        .root
        .clone()
        .or_else(SimulatorConfig::default_root)
        .ok_or_else(|| anyhow!("cannot locate the home directory; pass --root"))?;
    let config = SimulatorConfig::new(root);
    Ok(match &cli.default_device {
        Some(name) => config.with_default_device(name),
        None => config,
    })
}

fn list(set: &DeviceSet, args: ListArgs) -> Result<ExitCode> {
    let pattern = args.pattern.join(" ");
    let items = QueryEngine::new(set).query_by_pattern(&pattern)?;

    if items.is_empty() {
        eprintln!("No simulators matching '{pattern}'");
        eprintln!("Available simulator OS:");
        for os in set.oses() {
            eprintln!(" {os}");
        }
        return Ok(ExitCode::from(1));
    }

    let report = summarize(items)?;
    if args.json {
        println!("{}", list_output_json(&pattern, &report, true)?);
    } else {
        print!("{report}");
    }
    Ok(ExitCode::SUCCESS)
}

fn bundle(set: &DeviceSet, args: BundleArgs) -> Result<ExitCode> {
    let query = BundleQuery {
        bundle_id: Some(args.bundle_id),
        os: args.os,
        device: args.device,
    };
    let info = match QueryEngine::new(set).query_by_bundle_id(&query) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("xcsim: {err}");
            print_choices(set, &err)?;
            return Ok(ExitCode::from(exit_code_of(&err)));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(ExitCode::SUCCESS);
    }

    let path = if args.bundle_dir && !args.data {
        info.bundle_path.clone()
    } else {
        match &info.data_path {
            Some(path) => path.clone(),
            None => {
                eprintln!(
                    "{} has no data directory yet (bundle directory: {})",
                    info.bundle_id,
                    info.bundle_path.display()
                );
                return Ok(ExitCode::from(1));
            }
        }
    };

    if args.open {
        open_path(&path)?;
    } else {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

/// Lists what the lookup could have matched instead.
fn print_choices(set: &DeviceSet, err: &XcsimError) -> Result<()> {
    match err {
        XcsimError::OsNotFound { .. } => {
            eprintln!("Available simulator OS:");
            for os in set.oses() {
                eprintln!(" {}", os.id);
            }
        }
        XcsimError::DeviceNotFound { os, .. } => {
            if let Some(os_devices) = set.get(os) {
                eprintln!("Available simulators for {os}:");
                for name in os_devices.device_names() {
                    eprintln!(" {name}");
                }
            }
        }
        XcsimError::BundleNotFound { os, device, .. } => {
            if let Some(device_id) = set.get(os).and_then(|os_devices| os_devices.device(device)) {
                eprintln!("Applications installed on {device} {os} simulator:");
                for bundle_id in scan_installed_bundles(device_id)?.keys() {
                    eprintln!(" {bundle_id}");
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn oses(set: &DeviceSet, args: OsArgs) -> Result<ExitCode> {
    if args.default {
        let name = set
            .default_os_name()
            .ok_or_else(|| anyhow!("no simulator OS with provisioned devices"))?;
        println!("{name}");
        return Ok(ExitCode::SUCCESS);
    }
    for os in set.oses() {
        println!("{}", os.id);
    }
    Ok(ExitCode::SUCCESS)
}

fn devices(set: &DeviceSet, args: DevicesArgs) -> Result<ExitCode> {
    let os = match &args.os {
        Some(name) => set.find_os(name)?,
        None => set
            .default_os()
            .ok_or_else(|| anyhow!("no simulator OS with provisioned devices"))?,
    };
    for name in os.device_names() {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}

fn open_path(path: &Path) -> Result<()> {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    debug!(opener, path = %path.display(), "opening directory");
    let status = std::process::Command::new(opener)
        .arg(path)
        .status()
        .with_context(|| format!("launch {opener}"))?;
    if !status.success() {
        bail!("{opener} exited with {status}");
    }
    Ok(())
}
