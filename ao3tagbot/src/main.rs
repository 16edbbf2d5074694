mod verbose;

use std::path::Path;

use clap::{FromArgMatches as _, IntoApp as _, Parser};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};
use twelf::Layer;

use ao3tagbot_common::Conf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(flatten)]
    verbose: verbose::Verbosity,
}

#[tokio::main]
async fn main() -> Result<(), ao3tagbot_common::Report> {
    ao3tagbot_common::install()?;

    let matches = Cli::command().args(&Conf::clap_args()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut layers = Vec::with_capacity(4);
    if Path::new("ao3tagbot.json").exists() {
        layers.push(Layer::Json("ao3tagbot.json".into()));
    }
    if Path::new("ao3tagbot.toml").exists() {
        layers.push(Layer::Toml("ao3tagbot.toml".into()));
    }
    layers.push(Layer::Env(Some(String::from("AO3TAGBOT_"))));
    layers.push(Layer::Clap(matches));

    let conf = Conf::with_layers(&layers)?;

    let subscriber = Registry::default()
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::Layer::default())
        .with(EnvFilter::from_default_env().add_directive(cli.verbose.log_level_filter().into()));

    tracing::subscriber::set_global_default(subscriber)?;

    tokio::select! {
        res = ao3tagbot_telegram::run(&conf) => res?,
        res = tokio::signal::ctrl_c() => {
            res?;

            tracing::info!("received ctrl-c, shutting down");
        }
    }

    Ok(())
}
