use std::io::Read;

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::ai::{AiError, GenerateOptions, analysis_prompt, summary_prompt};
use crate::context::Context;

#[derive(Debug, Args)]
pub struct AiArgs {
    #[command(subcommand)]
    command: AiSubcommand,
}

#[derive(Debug, Subcommand)]
enum AiSubcommand {
    #[command(about = "Chat with the configured model")]
    Chat {
        /// Prompt text; read from stdin when omitted.
        text: Option<String>,
    },
    #[command(about = "Analyze text and report insights")]
    Analyze { text: Option<String> },
    #[command(about = "Summarize text concisely")]
    Summarize { text: Option<String> },
    #[command(about = "Generate content from a prompt")]
    Generate {
        text: Option<String>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    #[command(about = "Show the configured model")]
    Models,
}

pub async fn run(ctx: &Context, scope: &CancellationToken, args: AiArgs) -> Result<(), String> {
    match args.command {
        AiSubcommand::Chat { text } => {
            let prompt = resolve_text(text)?;
            if ctx.dry_run {
                return print_request(ctx, &prompt, GenerateOptions::default());
            }
            let client = ctx.ai().await.map_err(|err| err.to_string())?;
            let response = client
                .chat(scope, &prompt)
                .await
                .map_err(|err| err.to_string())?;
            ctx.output.info(&response);
            Ok(())
        }
        AiSubcommand::Analyze { text } => {
            let text = resolve_text(text)?;
            if ctx.dry_run {
                return print_request(ctx, &analysis_prompt(&text), GenerateOptions::default());
            }
            let client = ctx.ai().await.map_err(|err| err.to_string())?;
            let analysis = client
                .analyze(scope, &text)
                .await
                .map_err(|err| err.to_string())?;
            ctx.output.info(&analysis);
            Ok(())
        }
        AiSubcommand::Summarize { text } => {
            let text = resolve_text(text)?;
            if ctx.dry_run {
                return print_request(ctx, &summary_prompt(&text), GenerateOptions::default());
            }
            let client = ctx.ai().await.map_err(|err| err.to_string())?;
            let summary = client
                .summarize(scope, &text)
                .await
                .map_err(|err| err.to_string())?;
            ctx.output.info(&summary);
            Ok(())
        }
        AiSubcommand::Generate {
            text,
            temperature,
            max_tokens,
        } => {
            let prompt = resolve_text(text)?;
            let options = GenerateOptions {
                temperature,
                max_tokens,
            };
            if ctx.dry_run {
                return print_request(ctx, &prompt, options);
            }
            let client = ctx.ai().await.map_err(|err| err.to_string())?;
            let content = client
                .generate(scope, &prompt, options)
                .await
                .map_err(|err| err.to_string())?;
            ctx.output.info(&content);
            Ok(())
        }
        AiSubcommand::Models => {
            let cfg = ctx
                .config
                .ai
                .as_ref()
                .ok_or_else(|| AiError::Disabled.to_string())?;
            ctx.output.info(&format!("Current model: {}", cfg.model()));
            Ok(())
        }
    }
}

/// Prints the fully-resolved request instead of calling the backend.
fn print_request(ctx: &Context, prompt: &str, options: GenerateOptions) -> Result<(), String> {
    let cfg = ctx
        .config
        .ai
        .as_ref()
        .ok_or_else(|| AiError::Disabled.to_string())?;

    let mut request = json!({
        "dry_run": true,
        "provider": cfg.provider.as_str(),
        "model": cfg.model(),
        "prompt": prompt,
    });
    if let Some(temperature) = options.temperature {
        request["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = options.max_tokens {
        request["max_tokens"] = json!(max_tokens);
    }

    let rendered = serde_json::to_string_pretty(&request)
        .map_err(|err| format!("failed to encode request: {err}"))?;
    println!("{rendered}");
    Ok(())
}

/// Positional text wins; otherwise the prompt is read from stdin.
fn resolve_text(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed to read prompt from stdin: {err}"))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("No prompt provided. Pass it as an argument or pipe it on stdin.".to_string());
    }
    Ok(trimmed.to_string())
}
