//! Token commands - issue and verify bearer tokens

use super::{banner, print_json};
use crate::OutputFormat;
use anyhow::Result;
use calorie_auth::{Claims, TokenIssuer};
use calorie_core::config::Config;
use chrono::DateTime;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonTokenOutput<'a> {
    access_token: &'a str,
    token_type: &'static str,
    expires_in: i64,
}

fn issuer(config: &Config) -> Result<TokenIssuer> {
    config.require_jwt_secret()?;
    Ok(TokenIssuer::from_settings(&config.schema.auth)?)
}

/// Issue a token for `subject`
pub fn issue(config: &Config, subject: &str, format: OutputFormat) -> Result<()> {
    let issuer = issuer(config)?;
    let token = issuer.issue(subject)?;

    match format {
        OutputFormat::Json => print_json(&JsonTokenOutput {
            access_token: &token,
            token_type: "bearer",
            expires_in: issuer.ttl().num_seconds(),
        }),
        OutputFormat::Text => {
            // Bare token so the output can be captured by scripts
            println!("{token}");
            Ok(())
        }
    }
}

/// Verify `token` and print its claims
pub fn verify(config: &Config, token: &str, format: OutputFormat) -> Result<()> {
    let claims = issuer(config)?.verify(token)?;

    match format {
        OutputFormat::Json => print_json(&claims),
        OutputFormat::Text => {
            print_text(&claims);
            Ok(())
        }
    }
}

fn print_text(claims: &Claims) {
    banner("🔐 Token");

    let expires = DateTime::from_timestamp(claims.exp, 0)
        .map_or_else(|| claims.exp.to_string(), |at| at.to_rfc3339());

    println!("  {:<10} {}", "Status:".dimmed(), "✓ valid".green());
    println!("  {:<10} {}", "Subject:".dimmed(), claims.sub.bold());
    println!("  {:<10} {}", "Expires:".dimmed(), expires);
    println!();
}
