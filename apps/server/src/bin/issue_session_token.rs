//! CLI tool to mint a session token for an existing user.
//!
//! Usage:
//!   cargo run --bin issue-session-token -- --username alice

use std::env;

use test_framework_api_lib::auth::SessionKeys;
use test_framework_api_lib::config::Config;
use test_framework_api_lib::db::DbPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut username: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                if i < args.len() {
                    username = Some(args[i].clone());
                }
            }
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let username = match username {
        Some(u) => u,
        None => {
            eprintln!("Error: --username is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let user = match pool.find_user_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            eprintln!("Error: user '{}' not found", username);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error looking up user: {}", e);
            std::process::exit(1);
        }
    };

    let keys = SessionKeys::from_settings(&config.session);
    let token = match keys.issue(&user) {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Error issuing token: {}", e);
            std::process::exit(1);
        }
    };

    if quiet {
        println!("{}", token);
        return;
    }

    let roles: Vec<&str> = user.roles.iter().map(String::as_str).collect();

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  Session Token Issued");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  User:    {} (ID: {})", user.username, user.id);
    println!("  Roles:   {}", roles.join(", "));
    println!("  Expires: in {} seconds", config.session.ttl_secs);
    println!();
    println!("  Token:   {}", token);
    println!();
    println!("  Send as 'Authorization: Bearer <token>'.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: issue-session-token --username <name> [--quiet]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --username, -u  Existing user to issue the token for (required)");
    eprintln!("  --quiet, -q     Print only the token");
    eprintln!("  --help, -h      Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  issue-session-token --username alice");
    eprintln!("  export TOKEN=$(issue-session-token -u admin -q)");
    eprintln!();
}
