use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use missionary::{
    cli,
    config::{self, Settings},
    error,
    types::PkceToken,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Run the web application
    Serve(ServeOptions),

    /// Save your top artists and tracks
    Snapshot,

    /// Show the stored favorites of every user
    Users,

    /// Sample a blend playlist from everyone's top artists
    Blend(BlendOptions),

    /// Print an environment configuration template
    Config,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the app in the browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct BlendOptions {
    /// Write the blend to your Spotify playlist
    #[clap(long)]
    pub save: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(settings(), Arc::clone(&oauth_result)).await;
        }
        Command::Serve(opt) => cli::serve(settings(), opt.open).await,
        Command::Snapshot => cli::snapshot(settings()).await,
        Command::Users => cli::users(settings()).await,
        Command::Blend(opt) => cli::blend(settings(), opt.save).await,
        Command::Config => config::print_config_template(),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

fn settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration. Err: {}\nRun missionary config.", e),
    }
}
