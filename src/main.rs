use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod config;
mod content;
mod error;
mod routes;
mod seed;
mod session;
mod state;
mod storage;
mod users;

use crate::content::ContentCache;
use crate::routes::AppRoute;
use crate::session::context::SessionContext;
use crate::session::identity::{IdentityUpdate, Role};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "markethub=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init()?;
    info!(store = %state.config.storage_path.display(), "markethub demo starting");

    let users = state.credential_service();
    users.initialize().await?;

    let session = state.session_context();
    match session.restore_on_startup().await {
        Some(identity) => println!("Restored session for {}.", identity.username),
        None => println!("No active session. Try `login demo demo123`."),
    }

    let content = ContentCache::new(state.store.clone());
    let lang = state.config.language.clone();
    let pack = content
        .get_or_build(&lang, || format!("MarketHub brand pack [{lang}]"))
        .await?;
    info!(lang = %lang, "content pack ready: {pack}");

    println!("Commands: register login logout whoami goto setup stats export remove reset quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt();
    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["register", email, password] => match users.register(email, password).await {
                Ok(user) => println!("Registered {} (id {}).", user.email, user.id),
                Err(e) => println!("! {e}"),
            },
            ["login", identifier, password] => {
                match session.login(identifier, password).await {
                    Ok(outcome) => println!("{}", outcome.message),
                    Err(e) => println!("! {e}"),
                }
            }
            ["logout"] => match session.logout().await {
                Ok(()) => println!("Logged out."),
                Err(e) => println!("! {e}"),
            },
            ["whoami"] => match session.current().await {
                Some(id) => println!(
                    "{} <{}> role={:?} profile_complete={}",
                    id.username, id.email, id.role, id.profile_setup_complete
                ),
                None => println!("Not signed in."),
            },
            ["goto", path] => goto(path, &session).await,
            ["setup"] => match session.update_identity(IdentityUpdate::profile_complete()).await {
                Ok(Some(_)) => println!("Profile setup complete."),
                Ok(None) => println!("Sign in first."),
                Err(e) => println!("! {e}"),
            },
            ["stats"] => {
                let stats = users.stats().await;
                println!(
                    "{} users ({} default, {} registered)",
                    stats.total_users, stats.default_users, stats.registered_users
                );
            }
            ["export"] => print!("{}", users.export_all().await),
            ["remove", email] => {
                if !is_admin(&session).await {
                    println!("Admin access required.");
                } else {
                    match users.remove_by_email(email).await {
                        Ok(true) => println!("Removed {email}."),
                        Ok(false) => println!("No record for {email}."),
                        Err(e) => println!("! {e}"),
                    }
                }
            }
            ["reset"] => {
                if !is_admin(&session).await {
                    println!("Admin access required.");
                } else {
                    match users.reset_to_default().await {
                        Ok(()) => println!("Store reset to the seed set."),
                        Err(e) => println!("! {e}"),
                    }
                }
            }
            _ => println!("Unrecognized command: {line}"),
        }
        print_prompt();
    }

    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn is_admin(session: &SessionContext) -> bool {
    matches!(session.current().await, Some(id) if id.role == Role::Admin)
}

async fn goto(path: &str, session: &SessionContext) {
    match path.parse::<AppRoute>() {
        Ok(route) => {
            if routes::can_navigate(route, session).await {
                println!("Navigated to {}.", route.path());
            } else {
                println!("Sign in to visit {}.", route.path());
            }
        }
        Err(e) => println!("! {e}"),
    }
}
