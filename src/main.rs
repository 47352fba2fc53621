use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotretro::{
    cli::{self, App},
    config::{self, Config},
    error, report,
    types::TimeWindow,
    warning,
};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the dashboard web server
    Serve(ServeOptions),

    /// Authorize with Spotify API
    Auth,

    /// Show your top tracks, most popular first
    Tracks(ReportOptions),

    /// Show the most frequent genres of your top artists
    Genres(GenreOptions),

    /// Show how many of your top tracks were released in each year
    Years(ReportOptions),

    /// Write your top tracks to a CSV file
    Export(ExportOptions),

    /// Forget the cached token
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the dashboard in the default browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportOptions {
    /// Lookback period
    #[clap(long, value_enum, default_value_t = TimeWindow::Short)]
    pub window: TimeWindow,

    /// Number of tracks to fetch (1-50)
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct GenreOptions {
    /// Lookback period
    #[clap(long, value_enum, default_value_t = TimeWindow::Short)]
    pub window: TimeWindow,

    /// Number of artists whose genres are counted (1-50)
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    #[clap(flatten)]
    pub report: ReportOptions,

    /// Destination file
    #[clap(long, short, default_value = report::CSV_FILE_NAME)]
    pub output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let app = match App::from_config(config) {
        Ok(app) => app,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => cli::serve(&app, opt.open).await,
        Command::Auth => cli::auth(&app).await,
        Command::Tracks(opt) => cli::tracks(&app, opt.window, opt.limit).await,
        Command::Genres(opt) => cli::genres(&app, opt.window, opt.limit).await,
        Command::Years(opt) => cli::years(&app, opt.window, opt.limit).await,
        Command::Export(opt) => {
            cli::export(&app, opt.report.window, opt.report.limit, &opt.output).await
        }
        Command::Logout => cli::logout(&app).await,
        Command::Completions(_) => {}
    }
}
