use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use scimctl::{
    config::Config,
    directory::{DirectoryError, ScimGroupClient},
    observability::init_tracing,
    scim::{Group, GroupListQuery, GroupPatchRequest, PatchOp, PatchRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// CLI arguments for scimctl
#[derive(Parser, Debug)]
#[command(version, about = "SCIM 2.0 group directory client", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./scimctl.toml, then
    /// ~/.config/scimctl/scimctl.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Manage groups
    #[command(subcommand)]
    Groups(GroupsCommand),
}

#[derive(clap::Subcommand, Debug)]
enum GroupsCommand {
    /// Show a group by display name
    Get {
        /// Group display name
        name: String,
    },
    /// List groups
    List {
        /// Attribute to sort by (e.g. displayName)
        #[arg(long)]
        sort: Option<String>,
        /// Maximum number of groups to return
        #[arg(long)]
        count: Option<u32>,
    },
    /// Create a group from a JSON file; members are given by username
    Create {
        /// Group JSON (displayName, members, ...)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a group by display name
    Delete {
        /// Group display name
        name: String,
    },
    /// Apply PATCH operations to a group; members are given by username
    Update {
        /// Group display name (optional when the file carries `displayName`)
        name: Option<String>,
        /// JSON array of operations, a PatchOp request body, or a
        /// `{"displayName", "scimPatch"}` update document
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Accepted shapes for `groups update --file`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OperationsFile {
    List(Vec<PatchOp>),
    Group(GroupPatchRequest),
    Request(PatchRequest),
}

impl OperationsFile {
    /// Pick the target group and operations. A name given on the command
    /// line takes precedence over the file's `displayName`.
    fn into_target(self, name: Option<String>) -> Result<(String, Vec<PatchOp>), String> {
        let (file_name, operations) = match self {
            OperationsFile::List(operations) => (None, operations),
            OperationsFile::Group(request) => {
                (Some(request.display_name), request.scim_patch.operations)
            }
            OperationsFile::Request(request) => (None, request.operations),
        };

        match (name, file_name) {
            (Some(name), Some(file_name)) if name != file_name => {
                tracing::warn!(
                    group = %name,
                    file_group = %file_name,
                    "Group name on the command line overrides displayName in the file"
                );
                Ok((name, operations))
            }
            (Some(name), _) => Ok((name, operations)),
            (None, Some(file_name)) if !file_name.is_empty() => Ok((file_name, operations)),
            (None, _) => {
                Err("No group name given; pass NAME or set displayName in the file".into())
            }
        }
    }
}

/// Get the default config file path.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("scimctl").join("scimctl.toml"))
}

/// Resolve the config path from the flag, the working directory, or the
/// user config directory, in that order.
fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(path) = explicit_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let cwd_config = PathBuf::from("scimctl.toml");
    if cwd_config.exists() {
        return Ok(cwd_config);
    }

    if let Some(default_path) = default_config_path()
        && default_path.exists()
    {
        return Ok(default_path);
    }

    Err(match default_config_path() {
        Some(path) => format!(
            "No config file found; pass --config or create {}",
            path.display()
        ),
        None => "No config file found; pass --config".to_string(),
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{out}");
    Ok(())
}

fn describe(err: &DirectoryError) -> String {
    match err {
        DirectoryError::DependencyResolution { username, source } => {
            format!("Unable to resolve member {username}: {source}")
        }
        other => other.to_string(),
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = Config::from_file(&config_path).map_err(|e| e.to_string())?;

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: {e}");
    }
    tracing::debug!(config = %config_path.display(), tenant = %config.auth.tenant, "Loaded configuration");

    let client = ScimGroupClient::from_config(&config.client).map_err(|e| e.to_string())?;
    let auth = &config.auth;

    let Command::Groups(command) = args.command;
    match command {
        GroupsCommand::Get { name } => {
            let (group, location) = client
                .get_group(auth, &name)
                .await
                .map_err(|e| describe(&e))?;
            print_json(&json!({ "location": location, "group": group }))
        }
        GroupsCommand::List { sort, count } => {
            let query = GroupListQuery {
                sort_by: sort,
                count,
            };
            let (groups, location) = client
                .get_groups(auth, &query)
                .await
                .map_err(|e| describe(&e))?;
            print_json(&json!({ "location": location, "groups": groups }))
        }
        GroupsCommand::Create { file } => {
            let group: Group = read_json(&file)?;
            let location = client
                .create_group(auth, group)
                .await
                .map_err(|e| describe(&e))?;
            print_json(&json!({ "location": location }))
        }
        GroupsCommand::Delete { name } => {
            client
                .delete_group(auth, &name)
                .await
                .map_err(|e| describe(&e))?;
            tracing::info!(group = %name, "Group deleted");
            Ok(())
        }
        GroupsCommand::Update { name, file } => {
            let (name, operations) = read_json::<OperationsFile>(&file)?.into_target(name)?;
            client
                .update_group(auth, &name, operations)
                .await
                .map_err(|e| describe(&e))?;
            tracing::info!(group = %name, "Group updated");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
