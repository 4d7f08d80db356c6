use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::services::SignupService;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signup token for a plan")]
    Sign {
        #[arg(help = "Billing plan id")]
        plan_id: String,
    },

    #[command(about = "Verify a signup token and print its payload")]
    Verify {
        #[arg(help = "Token to verify")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = SignupService::new(&config::config().signup);

    match cmd {
        TokenCommands::Sign { plan_id } => {
            let (token, payload) = service.issue(&plan_id)?;
            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Signup token issued",
                    Some(json!({ "token": token, "payload": payload })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Verify { token } => match service.verify(token.trim()) {
            Some(payload) => output_success(
                &output_format,
                &format!("Valid token for plan '{}' issued at {}", payload.plan_id, payload.iat),
                Some(json!(payload)),
            ),
            None => anyhow::bail!("Invalid token"),
        },
    }
}
