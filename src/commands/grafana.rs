use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct GrafanaArgs {
    #[command(subcommand)]
    command: GrafanaSubcommand,
}

#[derive(Debug, Subcommand)]
enum GrafanaSubcommand {
    #[command(about = "List dashboards")]
    Dashboards,
}

pub async fn run(ctx: &Context, args: GrafanaArgs) -> Result<(), String> {
    match args.command {
        GrafanaSubcommand::Dashboards => {
            let client = ctx.grafana().await.map_err(|err| err.to_string())?;
            let dashboards = client.dashboards().await.map_err(|err| err.to_string())?;
            ctx.output.data(&dashboards, "Dashboards")
        }
    }
}
