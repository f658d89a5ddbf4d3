use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};
use tokio_util::sync::CancellationToken;

use aictl::commands::ai::{self, AiArgs};
use aictl::commands::config::{self as config_cmd, ConfigArgs};
use aictl::commands::github::{self, GithubArgs};
use aictl::commands::grafana::{self, GrafanaArgs};
use aictl::config;
use aictl::context::Context;
use aictl::logging;
use aictl::output::{Format, Formatter};

const ROOT_HELP_EXAMPLES: &str = "Examples:\n  aictl ai chat \"What changed in HTTP/3?\"\n  echo \"release notes...\" | aictl ai summarize\n  aictl --dry-run ai analyze \"some text\"\n  aictl github repos\n  aictl completion bash > ~/.local/share/bash-completion/completions/aictl";

#[derive(Debug, Parser)]
#[command(
    name = "aictl",
    about = "AI-powered operations with pluggable backends",
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    /// Config file (default: ~/.config/aictl/config.toml).
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value = "auto")]
    output: Format,

    /// Verbose output (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Show what would happen without making changes.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "AI-powered operations")]
    Ai(AiArgs),
    #[command(about = "Manage local config")]
    Config(ConfigArgs),
    #[command(about = "GitHub operations")]
    Github(GithubArgs),
    #[command(about = "Grafana operations")]
    Grafana(GrafanaArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
    #[command(about = "Show version information")]
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

fn print_completion(shell: CompletionShell) {
    let mut cmd = Cli::command();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, "aictl", &mut io::stdout()),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, "aictl", &mut io::stdout()),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, "aictl", &mut io::stdout()),
    }
}

fn print_version() {
    println!(
        "aictl version {} (built {}, commit {})",
        env!("CARGO_PKG_VERSION"),
        env!("AICTL_BUILD_TS"),
        env!("AICTL_GIT_SHA")
    );
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Both work without configuration.
    match cli.command {
        Commands::Completion { shell } => {
            print_completion(shell);
            return;
        }
        Commands::Version => {
            print_version();
            return;
        }
        _ => {}
    }

    let cfg = match config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    logging::init(&cfg.logging, cli.verbose);
    tracing::debug!(dry_run = cli.dry_run, "starting aictl");

    let formatter = Formatter::new(cli.output, !cli.no_color);
    let ctx = Context::new(cfg, formatter, cli.verbose, cli.dry_run);

    // Ctrl-C cancels the execution scope handed to backend calls.
    let scope = CancellationToken::new();
    let canceller = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let result = match cli.command {
        Commands::Ai(args) => ai::run(&ctx, &scope, args).await,
        Commands::Config(args) => config_cmd::run(&ctx, cli.config.as_deref(), args),
        Commands::Github(args) => github::run(&ctx, args).await,
        Commands::Grafana(args) => grafana::run(&ctx, args).await,
        Commands::Completion { .. } | Commands::Version => return,
    };

    if let Err(err) = result {
        ctx.output.error(&err);
        process::exit(1);
    }
}
