use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};

use qualarbi::api::{ApiClient, AuthApi, ClientConfig};
use qualarbi::console::{ConsoleLocation, ConsoleRenderer, format_toast};
use qualarbi::core::config::{self, CliOverrides, QualarbiConfig, ResolvedConfig};
use qualarbi::core::constants::{APP_NAME, APP_VERSION, Language};
use qualarbi::core::notify::ToastQueue;
use qualarbi::core::preferences::{Preferences, Theme};
use qualarbi::core::storage::{FileStore, Storage};
use qualarbi::router::history::route_url;
use qualarbi::router::{MemoryHistory, NavigationController, NavigationOutcome, RouterConfig};
use qualarbi::views::default_routes;

#[derive(Parser)]
#[command(name = "qualarbi", version = APP_VERSION, about = "Qualarbi school scheduling dashboard")]
struct Args {
    /// Backend base URL (overrides config and QUALARBI_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Route to open at startup
    #[arg(short, long)]
    route: Option<String>,

    /// Keep the session in memory instead of ~/.qualarbi/storage.json
    #[arg(long)]
    memory_storage: bool,

    /// Log at info level instead of debug
    #[arg(long)]
    quiet_log: bool,
}

const COMMANDS: &str = "\
Commands:
  go <route>                      navigate to a route
  click <route>                   follow a sidebar link
  back | forward                  move through history
  reload                          load the current route again
  routes                          list routes
  login <email> <password> [-r]   sign in (-r: remember me)
  logout                          sign out
  whoami                          show the stored user
  theme [light|dark|auto]         set or toggle the theme
  lang <es|en>                    set the language
  help                            show this list
  quit                            exit";

fn init_logging(quiet: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if quiet { LevelFilter::Info } else { LevelFilter::Debug };
    if let Ok(log_file) = File::create("qualarbi.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn open_storage(config: &ResolvedConfig) -> Storage {
    let Some(path) = &config.storage_path else {
        info!("Using in-memory storage");
        return Storage::in_memory(config.storage_prefix.clone());
    };
    match FileStore::open(path) {
        Ok(store) => Storage::new(Arc::new(store), config.storage_prefix.clone()),
        Err(e) => {
            error!("Could not open storage at {}: {}", path.display(), e);
            eprintln!("Storage unavailable ({e}), continuing in memory");
            Storage::in_memory(config.storage_prefix.clone())
        }
    }
}

fn report(outcome: NavigationOutcome) {
    match outcome {
        NavigationOutcome::Mounted(_) | NavigationOutcome::Failed { .. } => {}
        NavigationOutcome::Unchanged(route) => println!("Already on '{route}'"),
        NavigationOutcome::Busy => println!("A page is still loading"),
        NavigationOutcome::UnknownRoute(route) => println!("Unknown route '{route}'"),
        NavigationOutcome::NoHistory => println!("No more history in that direction"),
    }
}

struct Shell {
    router: NavigationController,
    auth: AuthApi,
    preferences: Preferences,
    toasts: Arc<ToastQueue>,
    location: Arc<ConsoleLocation>,
}

impl Shell {
    /// Returns false when the user asked to quit.
    async fn dispatch(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => return false,
            ["help"] => println!("{COMMANDS}"),
            ["go", route] => report(self.router.navigate(route).await),
            ["click", route] => match self.router.handle_link_click(Some(*route)).await {
                Some(outcome) => report(outcome),
                None => println!("'{route}' is not a sidebar link"),
            },
            ["back"] => report(self.router.back().await),
            ["forward"] => report(self.router.forward().await),
            ["reload"] => {
                let route = self.router.current_route().unwrap_or_default();
                report(self.router.load_route(&route, true).await);
            }
            ["routes"] => {
                for route in self.router.routes().iter() {
                    println!("  {:<15} {}", route.id, route.title);
                }
            }
            ["login", email, password, rest @ ..] => {
                let remember = rest.iter().any(|w| *w == "-r" || *w == "--remember");
                if self.auth.login(email, password, remember).await.success() {
                    println!("{}", qualarbi::core::constants::LOGIN_SUCCESS);
                }
            }
            ["logout"] => {
                self.auth.logout().await;
            }
            ["whoami"] => match self.auth.current_user() {
                Some(user) => println!("{user}"),
                None => println!("Not signed in"),
            },
            ["theme"] => println!("Theme: {}", self.preferences.toggle_theme().label()),
            ["theme", name] => {
                let theme = match *name {
                    "light" => Some(Theme::Light),
                    "dark" => Some(Theme::Dark),
                    "auto" => Some(Theme::Auto),
                    _ => None,
                };
                match theme {
                    Some(theme) => {
                        self.preferences.set_theme(theme);
                        println!("Theme: {}", theme.label());
                    }
                    None => println!("Unknown theme '{name}'"),
                }
            }
            ["lang", code] => match Language::from_code(code) {
                Some(language) => {
                    self.preferences.set_language(language);
                    println!("Language: {}", language.code());
                }
                None => println!("Unknown language '{code}'"),
            },
            _ => println!("Unknown command. Type 'help' for the list."),
        }
        true
    }

    /// Flushes toasts and redirects produced by the last command.
    fn settle(&self) {
        for toast in self.toasts.drain() {
            println!("{}", format_toast(&toast));
        }
        for url in self.location.take_redirects() {
            println!("-> {url} (session ended, sign in again with 'login')");
        }
        self.location.sync(&self.router.pathname());
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();
    init_logging(args.quiet_log);

    info!("{} {} starting up", APP_NAME, APP_VERSION);

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Config error, using defaults: {}", e);
        eprintln!("Warning: {e}. Using default configuration.");
        QualarbiConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            default_route: args.route,
            memory_storage: args.memory_storage,
        },
    );
    info!("Backend at {}", resolved.api_base_url);

    let storage = open_storage(&resolved);
    let initial_path = format!("/views/{}", route_url(&resolved.default_route));
    let toasts = Arc::new(ToastQueue::new());
    let location = Arc::new(ConsoleLocation::new(&initial_path));
    let client = ApiClient::new(
        ClientConfig::from(&resolved),
        storage.clone(),
        toasts.clone(),
        location.clone(),
    );
    let preferences = Preferences::new(storage);

    let shell = Shell {
        router: NavigationController::new(
            RouterConfig::from(&resolved),
            default_routes(&client, preferences.clone()),
            Box::new(MemoryHistory::new(&initial_path)),
            Arc::new(ConsoleRenderer),
        ),
        auth: AuthApi::new(client),
        preferences,
        toasts,
        location,
    };

    report(shell.router.start().await);
    shell.settle();
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !shell.dispatch(line.trim()).await {
            break;
        }
        shell.settle();
    }

    info!("{} shutting down", APP_NAME);
    Ok(())
}
