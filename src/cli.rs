// Command-line surface. Parsing only; the flows live in `ui`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vapor")]
#[command(about = "Vapor toolbox: cloud account helpers and project scaffolding", version)]
pub struct Cli {
    /// Log requests and derived paths to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generates a new resource.
    #[command(long_about = RESOURCE_HELP)]
    Resource {
        /// Name of resource.
        name: String,

        /// Overwrite existing resources.
        #[arg(long)]
        force: bool,
    },
    /// Vapor Cloud account commands
    Cloud {
        #[command(subcommand)]
        command: CloudCommand,
    },
}

const RESOURCE_HELP: &str = "\
Generates a new resource.

This command will generate a new resource with the given name.
The resource will be created in the current directory.

example input:
vapor resource User

example output:
./Sources/App/Models/User.swift
./Sources/App/Controllers/UserController.swift
./Sources/App/Migrations/CreateUser.swift";

#[derive(Subcommand, Debug)]
pub enum CloudCommand {
    /// Create a Vapor Cloud account
    Signup(SignupArgs),
    /// Log in and show the session token details
    Login(LoginArgs),
    /// Show the profile of the logged in user
    Me(LoginArgs),
    /// Manage SSH keys used for git deploys
    Ssh {
        #[command(subcommand)]
        command: SshCommand,
    },
}

#[derive(Args, Debug, Default)]
pub struct LoginArgs {
    /// Account email; prompted when omitted
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub organization: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SshCommand {
    /// Push a public key to the account
    #[command(alias = "create")]
    Push {
        #[command(flatten)]
        login: LoginArgs,

        /// Name to store the key under
        #[arg(short, long)]
        name: String,

        /// Public key file (defaults to ~/.ssh/id_rsa.pub)
        #[arg(short, long, conflicts_with = "key")]
        path: Option<PathBuf>,

        /// Public key material to send as-is
        #[arg(short, long)]
        key: Option<String>,
    },
    /// List keys on the account
    List {
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Delete a key by name
    Delete {
        #[command(flatten)]
        login: LoginArgs,

        name: String,
    },
}
