//! CLI application for controlling the lights behind a gateway.
//!
//! Authenticate once with the setup code printed on the gateway; the issued
//! credentials are stored in the user's config directory and reused by
//! every other command.
//!
//! Run with: cargo run --example lightctl -- --help

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use directories::{BaseDirs, ProjectDirs};
use lightctl::{
    Client, Credentials, DEFAULT_TIMEOUT, DtlsDialer, DtlsTransport, Gateway, Intent, Root,
    bootstrap,
};

const DEFAULT_GATEWAY: &str = "udp://10.0.1.11:5684";

#[derive(Parser)]
#[command(name = "lightctl")]
#[command(about = "Control gateway-connected lights from the command line", long_about = None)]
struct Cli {
    /// Gateway address, e.g. coaps://10.0.1.11:5684
    #[arg(short, long, global = true, env = "LIGHTCTL_GATEWAY")]
    gateway: Option<Gateway>,

    /// Time allowed for connecting and for each request (e.g. 3s, 500ms)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange the gateway's setup code for stored credentials
    Auth {
        /// Name to register with the gateway
        #[arg(short, long, default_value = "lightctl")]
        username: String,

        /// Security code printed on the gateway
        #[arg(short, long)]
        code: String,
    },

    /// Inspect and control devices
    Device {
        #[command(subcommand)]
        action: Action,
    },

    /// Inspect and control groups
    Group {
        #[command(subcommand)]
        action: Action,
    },

    /// Print the raw payload of any resource path, e.g. /15011/15012
    Debug { path: String },
}

#[derive(Subcommand)]
enum Action {
    /// List all entries with a one-line summary each
    List,

    /// Show everything known about one entry
    Get { id: u32 },

    /// Change an entry
    Set {
        id: u32,

        #[command(subcommand)]
        target: Target,
    },
}

#[derive(Subcommand)]
enum Target {
    /// Light output
    Light {
        #[command(subcommand)]
        setting: LightSetting,
    },
}

#[derive(Subcommand)]
enum LightSetting {
    /// Switch on or off
    State {
        #[arg(value_parser = parse_on_off)]
        state: bool,
    },

    /// Brightness in percent (clamped to 0-100)
    Level {
        #[arg(allow_negative_numbers = true)]
        level: i32,

        /// Fade duration, e.g. 500ms or 2s
        #[arg(short, long, default_value = "0s", value_parser = humantime::parse_duration)]
        transition: Duration,
    },

    /// White temperature in percent, 0 warmest to 100 coolest (clamped)
    White {
        #[arg(allow_negative_numbers = true)]
        white: i32,

        /// Fade duration, e.g. 500ms or 2s
        #[arg(short, long, default_value = "0s", value_parser = humantime::parse_duration)]
        transition: Duration,
    },
}

impl LightSetting {
    fn intent(&self) -> (Intent, Duration) {
        match *self {
            LightSetting::State { state } => (Intent::Power(state), Duration::ZERO),
            LightSetting::Level { level, transition } => (Intent::Level(level), transition),
            LightSetting::White { white, transition } => (Intent::White(white), transition),
        }
    }
}

fn parse_on_off(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(format!("expected on or off, got {other:?}")),
    }
}

/// `<config dir>/lightctl/lightctl.conf`
fn credentials_path() -> PathBuf {
    ProjectDirs::from("", "", "lightctl").map_or_else(
        || {
            BaseDirs::new().map_or_else(
                || PathBuf::from("lightctl.conf"),
                |base| base.home_dir().join(".lightctl").join("lightctl.conf"),
            )
        },
        |dirs| dirs.config_dir().join("lightctl.conf"),
    )
}

fn load_credentials() -> Result<Credentials, Box<dyn std::error::Error>> {
    let path = credentials_path();
    let raw = fs::read_to_string(&path).map_err(|e| {
        format!(
            "cannot read credentials from {} ({e}); run `lightctl auth --code <code>` first",
            path.display()
        )
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn save_credentials(creds: &Credentials) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = credentials_path();
    let mut dir = fs::DirBuilder::new();
    dir.recursive(true);
    let mut file = fs::OpenOptions::new();
    file.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
        dir.mode(0o700);
        file.mode(0o600);
    }

    if let Some(parent) = path.parent() {
        dir.create(parent)?;
    }
    let mut out = file.open(&path)?;
    out.write_all(serde_json::to_string_pretty(creds)?.as_bytes())?;
    Ok(path)
}

async fn connect(
    cli_gateway: Option<Gateway>,
    timeout: Duration,
) -> Result<Client<DtlsTransport>, Box<dyn std::error::Error>> {
    let creds = load_credentials()?;
    let gateway = match cli_gateway.or_else(|| creds.gateway().cloned()) {
        Some(gateway) => gateway,
        None => DEFAULT_GATEWAY.parse()?,
    };
    Ok(Client::connect(&DtlsDialer, &gateway, &creds, timeout).await?)
}

async fn run_action(
    client: &Client<DtlsTransport>,
    root: Root,
    action: Action,
) -> Result<(), Box<dyn std::error::Error>> {
    match (action, root) {
        (Action::List, Root::Groups) => {
            for group in client.list_groups().await? {
                println!("{}", group.summary());
            }
        }
        (Action::List, _) => {
            for device in client.list_devices().await? {
                println!("{}", device.summary());
            }
        }
        (Action::Get { id }, Root::Groups) => {
            println!("{}", client.get_group(id).await?.details());
        }
        (Action::Get { id }, _) => {
            println!("{}", client.get_device(id).await?.details());
        }
        (
            Action::Set {
                id,
                target: Target::Light { setting },
            },
            root,
        ) => {
            let (intent, transition) = setting.intent();
            intent.apply(client, root, id, transition).await?;
            println!("{root} {id}: {intent:?} applied");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let timeout = cli.timeout.unwrap_or(DEFAULT_TIMEOUT);

    match cli.command {
        Commands::Auth { username, code } => {
            let gateway = match cli.gateway {
                Some(gateway) => gateway,
                None => DEFAULT_GATEWAY.parse()?,
            };
            println!("Requesting a key for {username} from {gateway}...");
            let creds = bootstrap(&DtlsDialer, &gateway, &username, &code, timeout).await?;
            let path = save_credentials(&creds)?;
            println!("Credentials stored in {}", path.display());
        }

        Commands::Device { action } => {
            let client = connect(cli.gateway, timeout).await?;
            run_action(&client, Root::Devices, action).await?;
        }

        Commands::Group { action } => {
            let client = connect(cli.gateway, timeout).await?;
            run_action(&client, Root::Groups, action).await?;
        }

        Commands::Debug { path } => {
            let client = connect(cli.gateway, timeout).await?;
            let payload = client.get_raw(&path).await?;
            match serde_json::from_slice::<serde_json::Value>(&payload) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(_) => println!("{}", String::from_utf8_lossy(&payload)),
            }
        }
    }

    Ok(())
}
