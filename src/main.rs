use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use qobuzcli::{
    cli, config, error,
    node::{NodeKind, NodeKinds},
    qobuz::favorites::FavoriteIds,
    traversal::UNBOUNDED,
    utils,
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
    /// Log in with the configured credentials
    Login,

    /// Walk the catalog and list what is found
    Browse(BrowseOptions),

    /// Manage your playlists
    Playlist(PlaylistOptions),

    /// Add or remove favorites
    Favorites(FavoritesOptions),

    /// Maintain the response cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct BrowseOptions {
    /// Kind of the start node (root, album, artist, playlist, favorites, ...)
    #[clap(value_parser = parse_node_kind)]
    pub kind: Option<NodeKind>,

    /// Id of the start node
    #[clap(long)]
    pub nid: Option<String>,

    /// Offset of the first item
    #[clap(long)]
    pub offset: Option<u64>,

    /// Listing selector, e.g. `editor-picks` for public playlists
    #[clap(long = "type")]
    pub kind_type: Option<String>,

    /// Start from a navigation URL instead
    #[clap(long, conflicts_with_all = ["kind", "nid", "offset", "kind_type"])]
    pub url: Option<String>,

    /// Levels to expand, -1 for no bound
    #[clap(long, default_value_t = 1, allow_negative_numbers = true)]
    pub depth: i32,

    /// Kinds to list, comma separated, `all` or `none`
    #[clap(long, default_value = "all", value_parser = utils::parse_node_kinds)]
    pub include: NodeKinds,

    /// Kinds never fetched, comma separated, `all` or `none`
    #[clap(long, default_value = "none", value_parser = utils::parse_node_kinds)]
    pub exclude: NodeKinds,

    /// Show image URLs
    #[clap(long)]
    pub images: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    #[command(subcommand)]
    pub command: PlaylistSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Create a playlist
    Create {
        name: String,
        /// Make the playlist public
        #[clap(long)]
        public: bool,
        /// Also make it the current playlist
        #[clap(long)]
        current: bool,
    },
    /// Rename a playlist
    Rename { playlist_id: String, name: String },
    /// Delete a playlist
    Delete { playlist_id: String },
    /// Show or set the current playlist
    Current { playlist_id: Option<String> },
    /// Add every track below a node to a playlist
    Add {
        /// Target playlist, the current one by default
        #[clap(long)]
        playlist: Option<String>,
        /// Navigation URL of the node to take tracks from
        #[clap(long)]
        from: String,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct FavoritesOptions {
    #[command(subcommand)]
    pub command: FavoritesSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesSubcommand {
    /// Add favorites
    Add(FavoriteTargets),
    /// Remove favorites
    Remove(FavoriteTargets),
}

#[derive(Parser, Debug, Clone)]
pub struct FavoriteTargets {
    /// Track id; can be repeated
    #[clap(long = "track")]
    pub tracks: Vec<String>,
    /// Album id; can be repeated
    #[clap(long = "album")]
    pub albums: Vec<String>,
    /// Artist id; can be repeated
    #[clap(long = "artist")]
    pub artists: Vec<String>,
}

impl From<FavoriteTargets> for FavoriteIds {
    fn from(targets: FavoriteTargets) -> Self {
        FavoriteIds {
            tracks: targets.tracks,
            albums: targets.albums,
            artists: targets.artists,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Remove expired entries
    Clean {
        /// Most entries to remove in one run
        #[clap(long, default_value_t = 1000)]
        limit: usize,
        /// Age in seconds past which an entry expires, the cache TTL by default
        #[clap(long)]
        max_age: Option<u64>,
    },
    /// Remove every entry
    Clear,
    /// Show where the cache lives and how big it is
    Info,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_node_kind(value: &str) -> Result<NodeKind, String> {
    value.parse()
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Login => cli::login().await,
        Command::Browse(opt) => {
            let depth = if opt.depth < 0 { UNBOUNDED } else { opt.depth };
            let start = cli::StartNode {
                kind: opt.kind,
                nid: opt.nid,
                offset: opt.offset,
                kind_type: opt.kind_type,
                url: opt.url,
            };
            cli::browse(start, depth, opt.include, opt.exclude, opt.images).await
        }
        Command::Playlist(opt) => match opt.command {
            PlaylistSubcommand::Create {
                name,
                public,
                current,
            } => cli::playlist_create(name, public, current).await,
            PlaylistSubcommand::Rename { playlist_id, name } => {
                cli::playlist_rename(playlist_id, name).await
            }
            PlaylistSubcommand::Delete { playlist_id } => cli::playlist_delete(playlist_id).await,
            PlaylistSubcommand::Current { playlist_id } => {
                cli::playlist_current(playlist_id).await
            }
            PlaylistSubcommand::Add { playlist, from } => cli::playlist_add(playlist, from).await,
        },
        Command::Favorites(opt) => match opt.command {
            FavoritesSubcommand::Add(targets) => cli::favorites_add(targets.into()).await,
            FavoritesSubcommand::Remove(targets) => cli::favorites_remove(targets.into()).await,
        },
        Command::Cache(opt) => match opt.command {
            CacheSubcommand::Clean { limit, max_age } => cli::cache_clean(limit, max_age).await,
            CacheSubcommand::Clear => cli::cache_clear().await,
            CacheSubcommand::Info => cli::cache_info().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
