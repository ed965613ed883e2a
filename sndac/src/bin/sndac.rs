use clap::{
    Parser,
    Subcommand,
};
use sndac::{
    platform::Builder as PlatformBuilder,
    Platform,
};
use sndcore::{
    ac::{
        permission::{Action, Subject},
        principal::Principal,
        role::RoleName,
    },
    platform::ConnectorOption,
};
use snddb_sqlite::SqliteBackend;
use std::time::{
    Duration,
    Instant,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(long, value_name = "SNDAC_DB_URL", env = "SNDAC_DB_URL")]
    sndac_db_url: String,
    /// Seconds to wait for a database connection before giving up
    #[clap(long, default_value_t = 5)]
    db_timeout: u64,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    Role {
        #[command(subcommand)]
        cmd: RoleCmd,
    },
    #[command(arg_required_else_help = true)]
    Check {
        #[command(subcommand)]
        cmd: CheckCmd,
    },
    /// Roles and permissions held by the user, as JSON
    #[command(arg_required_else_help = true)]
    Status {
        user_id: String,
    },
}

#[derive(Debug, Subcommand)]
enum RoleCmd {
    /// Creates a role with the listed permissions
    #[command(arg_required_else_help = true)]
    Add {
        role: RoleName,
        /// Also record the role in the hierarchy for this invocation
        #[arg(long)]
        priority: Option<u32>,
        permissions: Vec<String>,
    },
    /// Assigns a role to a user
    #[command(arg_required_else_help = true)]
    Grant {
        user_id: i64,
        role: RoleName,
    },
    /// Removes a role from a user
    #[command(arg_required_else_help = true)]
    Revoke {
        user_id: i64,
        role: RoleName,
    },
    /// Attaches a permission to a role
    #[command(arg_required_else_help = true)]
    Permit {
        role: RoleName,
        permission: String,
    },
    /// Detaches a permission from a role
    #[command(arg_required_else_help = true)]
    Forbid {
        role: RoleName,
        permission: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum CheckCmd {
    #[command(arg_required_else_help = true)]
    Permission {
        user_id: String,
        /// The role cached on the user's session
        role: RoleName,
        #[arg(value_enum)]
        action: Action,
        subject: Subject,
    },
    #[command(arg_required_else_help = true)]
    Route {
        user_id: String,
        /// The role cached on the user's session
        role: RoleName,
        route: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("sndac")
        .module("snddb_sqlite")
        .module("sndrbac")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let platform = PlatformBuilder::new()
        .ac_platform(
            SqliteBackend::ac(
                ConnectorOption::from(args.sndac_db_url)
                    .auto_create_db(true)
                    .acquire_timeout(Duration::from_secs(args.db_timeout))
            ).await?
        )
        .build()?;

    match args.command {
        Commands::Role { cmd } => {
            parse_role(&platform, cmd).await?;
        },
        Commands::Check { cmd } => {
            parse_check(&platform, cmd).await?;
        },
        Commands::Status { user_id } => {
            let principal = Principal::new(user_id, RoleName::default());
            let status = platform.user_status(&principal).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        },
    }

    Ok(())
}

async fn parse_role<'p>(
    platform: &'p Platform,
    arg: RoleCmd,
) -> anyhow::Result<()> {
    match arg {
        RoleCmd::Add { role, priority, permissions } => {
            let id = platform.create_role(&role, priority, &permissions).await?;
            println!("role {role} created with id {id} and {} permission(s)", permissions.len());
        }
        RoleCmd::Grant { user_id, role } => {
            if platform.grant_role_to_user(user_id, &role).await? {
                println!("role {role} granted to user {user_id}");
            } else {
                println!("role {role} was already granted to user {user_id}");
            }
        }
        RoleCmd::Revoke { user_id, role } => {
            if platform.revoke_role_from_user(user_id, &role).await? {
                println!("role {role} revoked from user {user_id}");
            } else {
                println!("user {user_id} has no role {role} to be revoked");
            }
        }
        RoleCmd::Permit { role, permission } => {
            if platform.grant_permission_to_role(&role, &permission).await? {
                println!("permission {permission:?} attached to role {role}");
            } else {
                println!("role {role} already has permission {permission:?}");
            }
        }
        RoleCmd::Forbid { role, permission } => {
            if platform.revoke_permission_from_role(&role, &permission).await? {
                println!("permission {permission:?} detached from role {role}");
            } else {
                println!("role {role} has no permission {permission:?} to be detached");
            }
        }
        RoleCmd::List => {
            for role in platform.list_roles().await? {
                let priority = platform.rbac().hierarchy().priority(&role);
                println!("{role} (priority {priority})");
            }
        }
    }
    Ok(())
}

async fn parse_check<'p>(
    platform: &'p Platform,
    arg: CheckCmd,
) -> anyhow::Result<()> {
    match arg {
        CheckCmd::Permission { user_id, role, action, subject } => {
            let principal = Principal::new(user_id, role);
            let instant = Instant::now();
            let permit = platform.has_permission(&principal, action, &subject).await;
            let elapsed = instant.elapsed();
            let permit = if permit {
                "permitted"
            } else {
                "not permitted"
            };
            println!(
                "user {:?} {permit} to {action} {subject}; check took {elapsed:?}",
                principal.id,
            );
        }
        CheckCmd::Route { user_id, role, route } => {
            let principal = Principal::new(user_id, role);
            let instant = Instant::now();
            let permit = platform.check_route(&principal, &route).await;
            let elapsed = instant.elapsed();
            let permit = if permit {
                "permitted"
            } else {
                "not permitted"
            };
            if let Some(rule) = platform.rbac().route_permission(&route) {
                println!("{}", serde_json::to_string_pretty(&rule)?);
            }
            println!(
                "user {:?} {permit} access to route {route}; check took {elapsed:?}",
                principal.id,
            );
        }
    }
    Ok(())
}
