use std::path::Path;

use clap::{Args, Subcommand};

use crate::config;
use crate::context::Context;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    #[command(about = "Show the loaded configuration")]
    Show,
    #[command(about = "Validate the config file")]
    Check,
}

pub fn run(ctx: &Context, config_path: Option<&Path>, args: ConfigArgs) -> Result<(), String> {
    match args.command {
        ConfigSubcommand::Show => ctx.output.data(&ctx.config, "Configuration"),
        ConfigSubcommand::Check => {
            let path = config::check(config_path).map_err(|err| err.to_string())?;
            println!("config OK: {}", path.display());
            Ok(())
        }
    }
}
