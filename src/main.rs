use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sparcli::{cli, config, error, utils};

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
    /// Authorize with Spotify API (needed for import)
    Auth,

    /// Archive a playlist to JSON and a README report
    Archive(ArchiveOptions),

    /// Archive every playlist of a user
    ArchiveUser(ArchiveUserOptions),

    /// Re-create an archived playlist for the configured user
    Import(ImportOptions),

    /// Print the report of an archived playlist
    Report(ReportOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArchiveOptions {
    /// Playlist id, URI or URL
    #[clap(long)]
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ArchiveUserOptions {
    /// Spotify user id; defaults to SPOTIFY_USER_ID
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportOptions {
    /// Id of the archived playlist
    #[clap(long)]
    pub id: String,

    /// Target user; defaults to SPOTIFY_USER_ID
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportOptions {
    /// Id of the archived playlist
    #[clap(long)]
    pub id: String,

    /// Render HTML instead of markdown
    #[clap(long)]
    pub html: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&config).await,
        Command::Archive(opt) => cli::archive(&config, &utils::parse_playlist_id(&opt.id)).await,
        Command::ArchiveUser(opt) => {
            let user_id = match opt.user.or_else(|| config.user_id.clone()) {
                Some(user_id) => user_id,
                None => error!("No user given and SPOTIFY_USER_ID is not set"),
            };
            cli::archive_user(&config, &user_id).await
        }
        Command::Import(opt) => {
            cli::import(&config, &utils::parse_playlist_id(&opt.id), opt.user).await
        }
        Command::Report(opt) => {
            cli::report(&config, &utils::parse_playlist_id(&opt.id), opt.html).await
        }
        Command::Completions(_) => {}
    }
}
