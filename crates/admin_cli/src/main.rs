use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod prompt;

#[derive(Parser, Debug)]
#[command(name = "divvy_admin")]
#[command(about = "Admin utilities for Divvy (bootstrap users and groups)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./divvy.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Group(Group),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user; the password is asked interactively.
    Create(UserCreateArgs),
    /// Print what a user paid, owes and is owed across all groups.
    Summary(UserSummaryArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Display name, defaults to the username.
    #[arg(long)]
    name: Option<String>,
    #[arg(long, default_value = "")]
    email: String,
    /// Read the password from the first line of stdin instead of prompting.
    #[arg(long)]
    password_stdin: bool,
}

#[derive(Args, Debug)]
struct UserSummaryArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// Create a group owned by an existing user.
    Create(GroupCreateArgs),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    /// Additional members, repeatable.
    #[arg(long = "member")]
    members: Vec<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = if args.password_stdin {
                prompt::password_from(std::io::stdin().lock())?
            } else {
                prompt::new_password()?
            };
            let name = args.name.as_deref().unwrap_or(&args.username);

            match engine
                .create_user(&args.username, name, &args.email, &password)
                .await
            {
                Ok(()) => println!("created user: {}", args.username),
                Err(EngineError::ExistingKey(username)) => {
                    eprintln!("user already exists: {username}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::User(User {
            command: UserCommand::Summary(args),
        }) => {
            let summary = engine.user_summary(&args.username).await?;
            println!("paid:       {}", summary.paid);
            println!("owed:       {}", summary.owed);
            println!("owed to me: {}", summary.owed_to_me);
            println!("balance:    {}", summary.balance);
        }
        Command::Group(Group {
            command: GroupCommand::Create(args),
        }) => {
            let group = match engine
                .new_group(
                    &args.name,
                    args.description.as_deref(),
                    &args.members,
                    &args.owner,
                )
                .await
            {
                Ok(group) => group,
                Err(EngineError::KeyNotFound(what)) => {
                    eprintln!("not found: {what}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            println!(
                "created group: {} ({}) with {} member(s)",
                group.name,
                group.id,
                group.members.len()
            );
        }
    }

    Ok(())
}
