use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "xcsim",
    version,
    about = "Locate apps installed on iOS, watchOS and tvOS simulators"
)]
pub struct Cli {
    /// Simulator devices directory (default: ~/Library/Developer/CoreSimulator/Devices)
    #[arg(long, global = true, env = "XCSIM_SIMULATORS_ROOT")]
    pub root: Option<PathBuf>,

    /// Device used by `bundle` when --device is omitted
    #[arg(long, global = true, env = "XCSIM_DEFAULT_DEVICE")]
    pub default_device: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "XCSIM_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List simulators matching '<os>, <device>', '<os>' or '<device>'
    List(ListArgs),
    /// Print the data or bundle directory of an installed app
    Bundle(BundleArgs),
    /// List installed simulator OS versions
    Os(OsArgs),
    /// List devices available for an OS version
    Devices(DevicesArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pattern words, joined with spaces (e.g. `iOS 9.2, iPhone 5s`)
    pub pattern: Vec<String>,

    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Bundle ID or a suffix of it (e.g. `MyApp` for `com.acme.MyApp`)
    pub bundle_id: String,

    /// Exact OS name such as 'iOS 9.2' (default: the newest)
    #[arg(short, long)]
    pub os: Option<String>,

    /// Exact device name such as 'iPad Air 2'
    #[arg(short, long)]
    pub device: Option<String>,

    /// Print the application data directory (default)
    #[arg(long, conflicts_with = "bundle_dir")]
    pub data: bool,

    /// Print the bundle directory instead of the data directory
    #[arg(long)]
    pub bundle_dir: bool,

    /// Open the directory in the desktop file manager instead of printing it
    #[arg(long)]
    pub open: bool,

    /// Print the resolved bundle as JSON
    #[arg(long, conflicts_with = "open")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OsArgs {
    /// Print only the default (newest) OS
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Exact OS name such as 'iOS 9.2' (default: the newest)
    #[arg(short, long)]
    pub os: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_words_are_collected() {
        let cli = Cli::try_parse_from(["xcsim", "list", "iOS", "9.2,", "iPhone", "5s"]).unwrap();
        match cli.command {
            Command::List(args) => assert_eq!(args.pattern.join(" "), "iOS 9.2, iPhone 5s"),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn bundle_path_flags_conflict() {
        assert!(Cli::try_parse_from(["xcsim", "bundle", "App", "--data", "--bundle-dir"]).is_err());
    }

    #[test]
    fn bundle_options_parse() {
        let cli = Cli::try_parse_from([
            "xcsim", "bundle", "App", "-o", "iOS 9.2", "-d", "iPad Air", "--bundle-dir",
        ])
        .unwrap();
        match cli.command {
            Command::Bundle(args) => {
                assert_eq!(args.bundle_id, "App");
                assert_eq!(args.os.as_deref(), Some("iOS 9.2"));
                assert_eq!(args.device.as_deref(), Some("iPad Air"));
                assert!(args.bundle_dir);
            }
            other => panic!("expected bundle, got {other:?}"),
        }
    }
}
