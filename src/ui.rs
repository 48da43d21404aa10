// UI layer: turns parsed commands into calls on `api` and `resource`,
// prompting with `dialoguer` for anything not given on the command line.
// Each flow runs once and returns; nothing is kept between invocations.

use crate::api::{ApiClient, CloudUser, KeySource, NewUser, Token, DELETE_KEY_OP, LIST_KEYS_OP};
use crate::cli::{CloudCommand, LoginArgs, SignupArgs, SshCommand};
use crate::error::ToolboxError;
use crate::resource;
use anyhow::{Context, Result};
use chrono::Utc;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Run `vapor cloud ...`.
pub fn run_cloud(api: &ApiClient, command: CloudCommand) -> Result<()> {
    match command {
        CloudCommand::Signup(args) => handle_signup(api, args),
        CloudCommand::Login(args) => {
            let token = handle_login(api, args)?;
            println!("Logged in as user {}", token.user_id);
            println!("Session expires at {}", token.expires_at);
            Ok(())
        }
        CloudCommand::Me(args) => {
            let token = handle_login(api, args)?;
            let spinner = spinner("Fetching profile...")?;
            let me = api.me(&token);
            spinner.finish_and_clear();
            print_user(&me.context("Failed to fetch profile")?);
            Ok(())
        }
        CloudCommand::Ssh { command } => handle_ssh(api, command),
    }
}

/// Run `vapor resource <name>` against the project rooted at `root`.
pub fn run_resource(root: &Path, name: &str, force: bool) -> Result<()> {
    let paths = resource::plan(root, name)?;
    // TODO: write the model/migration/controller templates once their
    // contents are settled; until then only the plan is reported.
    println!("Resource {}:", paths.name);
    for path in paths.all() {
        let shown = Path::new(".").join(path.strip_prefix(root).unwrap_or(path));
        let note = match (path.exists(), force) {
            (false, _) => "",
            (true, true) => " (exists, will be overwritten)",
            (true, false) => " (exists, pass --force to overwrite)",
        };
        println!("  {}{}", shown.display(), note);
    }
    Ok(())
}

/// Collect signup fields and create the account.
fn handle_signup(api: &ApiClient, args: SignupArgs) -> Result<()> {
    let email = prompt_or(args.email, "Email")?;
    let first_name = prompt_or(args.first_name, "First name")?;
    let last_name = prompt_or(args.last_name, "Last name")?;
    let organization_name = prompt_or(args.organization, "Organization name")?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let user = NewUser {
        email,
        first_name,
        last_name,
        organization_name,
        password,
    };

    let spinner = spinner("Creating account...")?;
    let created = api.signup(&user);
    spinner.finish_and_clear();
    let created = created.context("Signup failed")?;
    println!("Account created, you can now log in.");
    print_user(&created);
    Ok(())
}

/// Ask for credentials and log in. The token lives for this invocation only.
fn handle_login(api: &ApiClient, args: LoginArgs) -> Result<Token> {
    let email = prompt_or(args.email, "Email")?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let spinner = spinner("Logging in...")?;
    let token = api.login(&email, &password);
    spinner.finish_and_clear();
    let token = token.context("Login failed")?;
    if token.is_expired(Utc::now()) {
        warn!(expires_at = %token.expires_at, "server returned an already expired token");
    }
    Ok(token)
}

fn handle_ssh(api: &ApiClient, command: SshCommand) -> Result<()> {
    match command {
        SshCommand::Push {
            login,
            name,
            path,
            key,
        } => {
            let source = match (path, key) {
                (_, Some(key)) => KeySource::Material(key),
                (Some(path), None) => KeySource::Path(path),
                (None, None) => KeySource::Path(default_key_path()?),
            };
            // Read the key before asking for credentials so a bad path fails fast.
            let source = KeySource::Material(source.load()?);
            let token = handle_login(api, login)?;

            let spinner = spinner("Pushing SSH key...")?;
            let res = api.push_ssh_key(&token, &name, source);
            spinner.finish_and_clear();
            let res = res.context("Failed to push SSH key")?;
            println!("{}", res.status);
            println!("{}", res.body);
            Ok(())
        }
        // Neither has a documented endpoint, so don't ask for credentials.
        SshCommand::List { .. } => Err(ToolboxError::Unspecified(LIST_KEYS_OP).into()),
        SshCommand::Delete { .. } => Err(ToolboxError::Unspecified(DELETE_KEY_OP).into()),
    }
}

fn default_key_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".ssh").join("id_rsa.pub"))
}

/// Use the flag value when present, otherwise prompt for it.
fn prompt_or(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

fn print_user(user: &CloudUser) {
    println!("{} {} <{}>", user.first_name, user.last_name, user.email);
    println!("id: {}", user.id);
}
