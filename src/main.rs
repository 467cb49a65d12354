use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tracklister::{config, error, info, server, warning};

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
    /// Run the web server
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub address: Option<String>,

    /// Open the landing page in the default browser once listening
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn serve(opt: ServeOptions) {
    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };
    if let Some(address) = opt.address {
        config.server_address = address;
    }

    let landing = landing_url(&config.server_address);
    let server = tokio::spawn(server::start_api_server(config));

    if opt.open && webbrowser::open(&landing).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            landing
        );
    }
    info!("Track lister available at {}", landing);

    // The server task only returns when it fails.
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server stopped: {}", e),
        Err(e) => error!("Server task failed: {}", e),
    }
}

fn landing_url(address: &str) -> String {
    let port = address.rsplit(':').next().unwrap_or("8080");
    format!("http://localhost:{}/", port)
}
