use anyhow::{Result, bail};
use clinic_client::ClinicClient;
use clinic_core::models::LoginRequest;
use colored::Colorize;

use super::settled;
use crate::cli::{LoginArgs, OutputFormat, WhoamiArgs};
use crate::output::{print_error, print_fields, print_success};

pub async fn login(client: &ClinicClient, args: &LoginArgs, profile: &str) -> Result<()> {
    let response = client
        .auth()
        .login(&LoginRequest::new(&args.email, &args.password))
        .await?;
    print_success(&format!(
        "Logged in as {} ({}) on profile \"{profile}\"",
        response.user.email.cyan(),
        response.user.role
    ));
    Ok(())
}

pub async fn logout(client: &ClinicClient) -> Result<()> {
    let was_authenticated = client.session().await?.is_authenticated();
    client.auth().logout().await?;
    if was_authenticated {
        print_success("Logged out (session removed)");
    } else {
        println!("No stored session");
    }
    Ok(())
}

pub async fn whoami(
    client: &ClinicClient,
    args: &WhoamiArgs,
    profile: &str,
    format: OutputFormat,
) -> Result<()> {
    let session = client.session().await?;
    let Some(stored) = session.user().cloned() else {
        print_error(&format!("Not logged in (profile: \"{profile}\")"));
        return Ok(());
    };

    let user = if args.verify {
        match settled(client.auth().current_user().await?, "current user")? {
            Some(user) => user,
            None => bail!("Backend returned no user for the stored token"),
        }
    } else {
        stored
    };

    print_fields(&user, format, &[
        ("Profile", profile.to_string()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
        ("Id", user.id.clone().unwrap_or_else(|| "-".into())),
        ("Token", token_preview(session.token().unwrap_or_default())),
    ])
}

fn token_preview(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 20 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{head}...{tail}")
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_preview_shortens_long_tokens() {
        assert_eq!(token_preview("short-token"), "short-token");
        assert_eq!(
            token_preview("eyJhbGciOiJIUzI1NiJ9.payload.signature"),
            "eyJhbGci...ignature"
        );
    }

    #[test]
    fn test_token_preview_counts_characters() {
        let token = "é".repeat(30);
        assert_eq!(token_preview(&token), format!("{}...{}", "é".repeat(8), "é".repeat(8)));
        assert_eq!(token_preview("ключ"), "ключ");
    }
}
