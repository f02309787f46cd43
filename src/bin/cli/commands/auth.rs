//! Authentication command handlers for the organizer CLI

use organizer_client::session::{OAuthCallback, SessionStatus};
use organizer_client::{ClientConfig, ClientResult};

use crate::cli::build_client;
use crate::AuthCommands;

pub async fn handle_auth_command(cmd: AuthCommands, config: &ClientConfig) -> ClientResult<()> {
    let client = build_client(config)?;
    let session = client.session();

    match cmd {
        AuthCommands::Login { token } => match session.login(token).await {
            Ok(user) => {
                println!("✓ Signed in as {} <{}>", user.display_name, user.email);
            }
            Err(e) => {
                eprintln!("✗ Login failed: {}", e.advisory());
                return Err(e.into());
            }
        },
        AuthCommands::Callback { url } => {
            let callback = OAuthCallback::from_redirect_url(&url)?;
            match session.complete_oauth(callback).await {
                Ok(user) => {
                    println!("✓ Signed in as {} <{}>", user.display_name, user.email);
                }
                Err(e) => {
                    eprintln!("✗ {}", e.message);
                    return Err(e.into());
                }
            }
        }
        AuthCommands::Logout => {
            session.logout();
            println!("✓ Signed out");
        }
        AuthCommands::Status => match session.restore().await {
            SessionStatus::Authenticated => {
                if let Some(user) = session.current_user() {
                    println!("✓ Signed in as {} <{}>", user.display_name, user.email);
                    println!("  User ID: {}", user.id);
                }
            }
            status => {
                println!("Not signed in ({})", status);
            }
        },
        AuthCommands::Refresh => {
            if session.restore().await != SessionStatus::Authenticated {
                println!("Not signed in");
                return Ok(());
            }
            match session.refresh().await {
                Ok(()) => println!("✓ Token refreshed"),
                Err(e) => {
                    eprintln!("✗ Failed to refresh token: {}", e.advisory());
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
