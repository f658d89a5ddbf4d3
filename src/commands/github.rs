use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct GithubArgs {
    #[command(subcommand)]
    command: GithubSubcommand,
}

#[derive(Debug, Subcommand)]
enum GithubSubcommand {
    #[command(about = "List repositories for the configured org")]
    Repos,
}

pub async fn run(ctx: &Context, args: GithubArgs) -> Result<(), String> {
    match args.command {
        GithubSubcommand::Repos => {
            let client = ctx.github().await.map_err(|err| err.to_string())?;
            let repos = client.repos().await.map_err(|err| err.to_string())?;
            ctx.output.data(&repos, "Repositories")
        }
    }
}
