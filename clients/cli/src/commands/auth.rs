//! Account commands: register, login, logout, whoami

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};

use crate::{api::ApiClient, output, session::SessionContext};

fn prompt_text(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn prompt_password(value: Option<String>, confirm: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let prompt = Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Repeat password", "Passwords do not match")
    } else {
        prompt
    };
    Ok(prompt.interact()?)
}

/// Create an account and sign in with it
pub async fn register(
    client: &ApiClient,
    session: &mut SessionContext,
    display_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let display_name = prompt_text(display_name, "Display name")?;
    let email = prompt_text(email, "Email")?;
    let password = prompt_password(password, true)?;

    let user = client.register(&display_name, &email, &password).await?;
    output::success(&format!("Account created for {}", user.email));

    let response = client.login(&email, &password).await?;
    session.login(response.token, response.user)?;
    output::info(&format!("Logged in as {}", display_name));

    Ok(())
}

pub async fn login(
    client: &ApiClient,
    session: &mut SessionContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = prompt_text(email, "Email")?;
    let password = prompt_password(password, false)?;

    let response = client.login(&email, &password).await?;
    let name = response.user.display_name.clone();
    session.login(response.token, response.user)?;

    output::success(&format!("Logged in as {}", name));
    Ok(())
}

/// Forget the local session; the token itself stays valid until it expires
pub fn logout(session: &mut SessionContext) -> Result<()> {
    if !session.is_logged_in() {
        output::info("Not logged in");
        return Ok(());
    }

    session.clear()?;
    output::success("Logged out");
    Ok(())
}

pub fn whoami(session: &SessionContext) -> Result<()> {
    match session.user() {
        Some(user) => {
            println!("{} <{}>", user.display_name.bold(), user.email);
            println!("  Role: {}", user.role);
            println!("  Member since: {}", user.created_at.format("%Y-%m-%d"));
        }
        None => output::info("Not logged in"),
    }
    Ok(())
}
