//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use invctl_core::ResourceId;
use invctl_core::config;
use invctl_core::session::Role;
use invctl_core::users::{NewUser, UserId};
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter (e.g. `invctl_core=debug`).
const LOG_ENV: &str = "INVCTL_LOG";

#[derive(Parser)]
#[command(name = "invctl")]
#[command(version)]
#[command(about = "Inventory API client: sessions, resources and users")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long, env = "INVCTL_USERNAME")]
        username: Option<String>,

        /// Password (prompted without echo when omitted)
        #[arg(short, long, env = "INVCTL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the current user and what they may do
    Whoami,

    /// Manage inventory resources
    Resources {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Show inventory statistics
    Dashboard,

    /// Manage user accounts (security admins only)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ResourceCommands {
    /// Lists all resources
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Creates a resource
    Create {
        #[command(flatten)]
        fields: ResourceFields,
    },
    /// Updates a resource; omitted flags keep their current value
    Update {
        /// The ID of the resource to update
        #[arg(value_name = "ID")]
        id: ResourceId,

        #[command(flatten)]
        fields: ResourceFields,
    },
    /// Deletes a resource after confirmation
    Delete {
        /// The ID of the resource to delete
        #[arg(value_name = "ID")]
        id: ResourceId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Resource form fields. Empty strings clear optional fields on update.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct ResourceFields {
    /// Resource name
    #[arg(long)]
    pub name: Option<String>,

    /// equipment, vehicle, security_device or tool
    #[arg(long = "type", value_name = "TYPE")]
    pub resource_type: Option<String>,

    /// Serial number
    #[arg(long = "serial")]
    pub serial_number: Option<String>,

    /// License plate (vehicles)
    #[arg(long)]
    pub plate: Option<String>,

    /// Where the resource is kept
    #[arg(long)]
    pub location: Option<String>,

    /// Status, e.g. available, in_use, under_maintenance
    #[arg(long)]
    pub status: Option<String>,

    /// Acquisition date (YYYY-MM-DD)
    #[arg(long = "acquired", value_name = "DATE")]
    pub acquisition_date: Option<String>,

    /// Last maintenance date (YYYY-MM-DD)
    #[arg(long = "last-maintenance", value_name = "DATE")]
    pub last_maintenance_date: Option<String>,
}

#[derive(clap::Subcommand)]
enum UserCommands {
    /// Lists user accounts
    List,
    /// Creates a user account
    Create {
        #[arg(long)]
        username: String,

        #[arg(long, env = "INVCTL_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// admin_security, manager or employee
        #[arg(long)]
        role: Role,

        /// Display name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,
    },
    /// Deletes a user account after confirmation
    Delete {
        /// The ID of the user to delete
        #[arg(value_name = "USER_ID")]
        id: UserId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
    /// Save the API base URL to the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

/// Logs go to stderr so stdout stays clean for `--json`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config() -> Result<config::Config> {
    config::Config::load().context("load config")
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&load_config()?, username, password).await
        }
        Commands::Logout => commands::auth::logout(&load_config()?),
        Commands::Whoami => commands::auth::whoami(&load_config()?),

        Commands::Resources { command } => {
            let config = load_config()?;
            match command {
                ResourceCommands::List { json } => commands::resources::list(&config, json).await,
                ResourceCommands::Create { fields } => {
                    commands::resources::create(&config, &fields).await
                }
                ResourceCommands::Update { id, fields } => {
                    commands::resources::update(&config, id, &fields).await
                }
                ResourceCommands::Delete { id, yes } => {
                    commands::resources::delete(&config, id, yes).await
                }
            }
        }

        Commands::Dashboard => commands::dashboard::show(&load_config()?).await,

        Commands::Users { command } => {
            let config = load_config()?;
            match command {
                UserCommands::List => commands::users::list(&config).await,
                UserCommands::Create {
                    username,
                    password,
                    role,
                    name,
                    email,
                } => {
                    let new_user = NewUser {
                        username,
                        password,
                        role: Some(role),
                        display_name: name,
                        email,
                    };
                    commands::users::create(&config, &new_user).await
                }
                UserCommands::Delete { id, yes } => {
                    commands::users::delete(&config, id, yes).await
                }
            }
        }

        // Config commands must work even when the config file is broken.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
