use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_lens::catalog::{CatalogClient, CatalogConfig};
use arena_lens::client::{ApiConfig, ArenaApi, HttpArenaClient};
use arena_lens::config::AppConfig;
use arena_lens::controller::{
    ArenaBrowser, CommentsPanel, ReviewQueue, Session, UserAdmin, ITEMS_PER_PAGE,
};
use arena_lens::models::{
    parse_id_list, CatalogLanguage, CommentTarget, FilterSet, ManualRecord, NewSubmission, Role,
    Server, SlotMap, SortMode, StudentCatalog, Submission, SummaryKey,
};
use arena_lens::notify::{Notifier, TracingNotifier};
use arena_lens::paging::PageEntry;
use arena_lens::store::{JsonFileStore, KeyValueStore};
use arena_lens::threads::ThreadedView;

#[derive(Parser)]
#[command(name = "arena-lens")]
#[command(about = "Headless client for browsing and moderating arena battle statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Override the API base URL from the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Answer yes to every confirmation prompt
    #[arg(long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the backend is reachable
    Health,

    /// List arena summaries
    Summaries {
        #[arg(long, default_value = "1")]
        page: u32,

        /// Server: all, global, jp, cn
        #[arg(long, default_value = "all")]
        server: String,

        #[arg(long)]
        season: Option<u32>,

        /// Sort: default, composite, win_rate_desc, win_rate_asc, newest
        #[arg(long, default_value = "default")]
        sort: String,

        /// Lower win-rate bound as a fraction in [0,1]
        #[arg(long)]
        min_win_rate: Option<f64>,

        /// Upper win-rate bound as a fraction in [0,1]
        #[arg(long)]
        max_win_rate: Option<f64>,

        #[arg(long)]
        min_battles: Option<u32>,

        /// Students anywhere in the attacking team (comma-separated ids)
        #[arg(long)]
        atk_contains: Option<String>,

        /// Students anywhere in the defending team (comma-separated ids)
        #[arg(long)]
        def_contains: Option<String>,

        /// Attacking slot constraints, e.g. "0:10010,4:20008"
        #[arg(long)]
        atk_slots: Option<String>,

        /// Defending slot constraints
        #[arg(long)]
        def_slots: Option<String>,

        /// Resolve student names through the catalog
        #[arg(long)]
        names: bool,
    },

    /// Per-loadout details for one pairing
    Details {
        #[arg(long)]
        atk_sig: String,

        #[arg(long)]
        def_sig: String,

        #[arg(long, default_value = "global")]
        server: String,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Delete one summary and its battles (admin)
    DeleteSummary {
        #[arg(long)]
        atk_sig: String,

        #[arg(long)]
        def_sig: String,

        #[arg(long, default_value = "global")]
        server: String,

        #[arg(long)]
        season: u32,

        #[arg(long, default_value = "")]
        tag: String,
    },

    /// Seasons with recorded data
    Seasons {
        #[arg(long, default_value = "all")]
        server: String,
    },

    /// Comment threads on a pairing
    Comments {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Submit a battle record for review
    Submit {
        #[arg(long, default_value = "global")]
        server: String,

        #[arg(long)]
        season: u32,

        #[arg(long, default_value = "")]
        tag: String,

        /// Attacking team ids, comma-separated
        #[arg(long)]
        atk_team: String,

        /// Defending team ids, comma-separated
        #[arg(long)]
        def_team: String,

        #[arg(long)]
        wins: u32,

        #[arg(long)]
        losses: u32,

        #[arg(long, default_value = "")]
        note: String,

        /// Screenshot to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Review queue operations (admin)
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Add records directly, bypassing review (admin)
    ManualAdd {
        #[arg(long, default_value = "global")]
        server: String,

        #[arg(long)]
        season: u32,

        #[arg(long, default_value = "")]
        tag: String,

        #[arg(long)]
        atk_team: String,

        #[arg(long)]
        def_team: String,

        #[arg(long)]
        wins: u32,

        #[arg(long)]
        losses: u32,
    },

    /// User administration (admin)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Log in and store the session token
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Drop the stored session token
    Logout,

    /// Change an account password
    ResetPassword {
        username: String,

        #[arg(long)]
        old_password: String,

        #[arg(long)]
        new_password: String,
    },

    /// Browse the student catalog
    Students {
        /// UI language tag (en, zh, ...)
        #[arg(long, default_value = "en")]
        lang: String,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    /// Show the comment thread for a pairing
    List {
        #[arg(long)]
        atk_sig: String,

        #[arg(long)]
        def_sig: String,

        #[arg(long, default_value = "global")]
        server: String,
    },

    /// Post a comment or reply
    Post {
        #[arg(long)]
        atk_sig: String,

        #[arg(long)]
        def_sig: String,

        #[arg(long, default_value = "global")]
        server: String,

        content: String,

        /// Reply to this root comment
        #[arg(long)]
        parent: Option<u64>,

        /// Author name (remembered for next time)
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a comment (admin)
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List pending submissions
    List,

    /// List decided submissions
    History,

    /// Approve a pending submission
    Approve { id: u64 },

    /// Reject a pending submission
    Reject { id: u64 },

    /// Revert an approved submission
    Revert { id: u64 },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List,

    /// Create an account
    Create {
        username: String,

        #[arg(long)]
        password: String,

        /// Role: admin or user
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// Change an account's role
    SetRole {
        id: u64,

        /// Role: admin or user
        role: String,
    },

    /// Delete an account
    Delete { id: u64 },
}

fn parse_server(s: &str) -> Result<Server> {
    Server::parse(s).ok_or_else(|| anyhow!("Invalid server: {} (all, global, jp, cn)", s))
}

fn parse_sort(s: &str) -> Result<SortMode> {
    SortMode::parse(s).ok_or_else(|| {
        anyhow!(
            "Invalid sort: {} (default, composite, win_rate_desc, win_rate_asc, newest)",
            s
        )
    })
}

fn parse_role(s: &str) -> Result<Role> {
    Role::parse(s).ok_or_else(|| anyhow!("Invalid role: {} (admin, user)", s))
}

fn format_time(unix: i64) -> String {
    chrono::DateTime::from_timestamp(unix, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| unix.to_string())
}

fn format_team(ids: &[u32], catalog: Option<&StudentCatalog>) -> String {
    match catalog {
        Some(catalog) => ids
            .iter()
            .map(|id| catalog.display_name(*id))
            .collect::<Vec<_>>()
            .join(", "),
        None => ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn format_window(entries: &[PageEntry], current: u32) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            PageEntry::Page(p) if *p == current => format!("[{}]", p),
            PageEntry::Page(p) => p.to_string(),
            PageEntry::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_thread(view: &ThreadedView) {
    if view.is_empty() {
        println!("(no comments)");
        return;
    }
    for root in &view.roots {
        println!(
            "#{} {} [{}]\n    {}",
            root.id,
            root.author(),
            format_time(root.created_at),
            root.content
        );
        for reply in view.replies_of(root.id) {
            println!(
                "    #{} {} [{}]\n        {}",
                reply.id,
                reply.author(),
                format_time(reply.created_at),
                reply.content
            );
        }
    }
}

fn print_submissions(submissions: &[Submission]) {
    if submissions.is_empty() {
        println!("(none)");
        return;
    }
    for s in submissions {
        println!(
            "#{:<4} {:6} s{:<3} {:>2}W/{:<2}L  {}  {}  atk=[{}] def=[{}]{}",
            s.id,
            s.server,
            s.season,
            s.wins,
            s.losses,
            s.status,
            format_time(s.created_at),
            format_team(&s.atk_team, None),
            format_team(&s.def_team, None),
            if s.note.is_empty() {
                String::new()
            } else {
                format!("  note: {}", s.note)
            }
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))?;
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }

    let api = Arc::new(HttpArenaClient::new(ApiConfig {
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_secs(config.api.timeout_seconds),
        ..ApiConfig::default()
    })?);
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.state_file)?);
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier::new(cli.yes));
    let mut session = Session::resume(api.clone(), notifier.clone(), store.clone());

    match cli.command {
        Commands::Health => {
            if api.health().await {
                println!("Backend reachable at {}", config.api.base_url);
            } else {
                println!("Backend NOT reachable at {}", config.api.base_url);
                std::process::exit(1);
            }
        }

        Commands::Summaries {
            page,
            server,
            season,
            sort,
            min_win_rate,
            max_win_rate,
            min_battles,
            atk_contains,
            def_contains,
            atk_slots,
            def_slots,
            names,
        } => {
            let filters = FilterSet {
                season,
                min_win_rate,
                max_win_rate,
                min_battles,
                atk_contains: atk_contains.as_deref().map(parse_id_list).unwrap_or_default(),
                def_contains: def_contains.as_deref().map(parse_id_list).unwrap_or_default(),
                atk_slots: atk_slots.as_deref().map(SlotMap::parse).unwrap_or_default(),
                def_slots: def_slots.as_deref().map(SlotMap::parse).unwrap_or_default(),
            };

            let catalog = if names {
                let client = CatalogClient::new(CatalogConfig {
                    base_url: config.catalog.base_url.clone(),
                    cache_dir: config.catalog.cache_dir.clone(),
                    cache_ttl: Duration::from_secs(config.catalog.cache_ttl_seconds),
                    ..CatalogConfig::default()
                })?;
                Some(
                    client
                        .students_or_empty(CatalogLanguage::from_tag(&config.catalog.language))
                        .await,
                )
            } else {
                None
            };

            let mut browser = ArenaBrowser::new(api.clone(), notifier.clone());
            browser.configure(parse_server(&server)?, parse_sort(&sort)?, filters, page);
            browser.refresh().await?;

            let state = browser.page_state();
            println!(
                "{} records, page {}/{} ({} per page)",
                state.total_items,
                state.current_page,
                state.total_pages().max(1),
                ITEMS_PER_PAGE
            );

            for summary in browser.summaries() {
                println!(
                    "{:6} s{:<3} {:>5} battles  {:5.1}% avg  {:5.1}% wilson  last {}{}",
                    summary.server,
                    summary.season,
                    summary.total,
                    summary.avg_win_rate * 100.0,
                    summary.wilson_score * 100.0,
                    format_time(summary.last_seen),
                    if summary.is_low_sample() {
                        "  (low sample)"
                    } else {
                        ""
                    }
                );
                println!("       atk: {}", format_team(&summary.attacking_team, catalog.as_ref()));
                println!("       def: {}", format_team(&summary.defending_team, catalog.as_ref()));
                println!(
                    "       sig: {} vs {}",
                    summary.atk_sig, summary.def_sig
                );
            }

            if state.is_paginated() {
                println!(
                    "\nPages: {}",
                    format_window(&browser.window(), state.current_page)
                );
            }
        }

        Commands::Details {
            atk_sig,
            def_sig,
            server,
            season,
            tag,
            page,
        } => {
            let query = arena_lens::query::detail_query(
                &atk_sig,
                &def_sig,
                parse_server(&server)?,
                page,
                ITEMS_PER_PAGE,
                SortMode::Default,
                season,
                tag.as_deref(),
            );
            let details = api.summary_details(&query).await?;
            println!("{} loadout variants", details.total);
            for detail in &details.data {
                println!(
                    "{}  {:>5} battles  {:5.1}% avg  {:5.1}% wilson  last {}",
                    detail.loadout_hash,
                    detail.total,
                    detail.avg_win_rate * 100.0,
                    detail.wilson_score * 100.0,
                    format_time(detail.last_seen)
                );
            }
        }

        Commands::DeleteSummary {
            atk_sig,
            def_sig,
            server,
            season,
            tag,
        } => {
            let mut browser = ArenaBrowser::new(api.clone(), notifier.clone());
            browser.delete_one(SummaryKey {
                server,
                season,
                atk_sig,
                def_sig,
                tag,
            })
            .await?;
        }

        Commands::Seasons { server } => {
            let seasons = api.seasons(parse_server(&server)?).await?;
            println!(
                "{}",
                seasons
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Commands::Comments { action } => match action {
            CommentAction::List {
                atk_sig,
                def_sig,
                server,
            } => {
                let target = CommentTarget {
                    atk_sig,
                    def_sig,
                    server,
                };
                let mut panel =
                    CommentsPanel::new(api.clone(), notifier.clone(), store.clone(), target);
                panel.load().await?;
                print_thread(&panel.view());
            }
            CommentAction::Post {
                atk_sig,
                def_sig,
                server,
                content,
                parent,
                name,
            } => {
                let target = CommentTarget {
                    atk_sig,
                    def_sig,
                    server,
                };
                let mut panel =
                    CommentsPanel::new(api.clone(), notifier.clone(), store.clone(), target);
                if let Some(name) = name {
                    panel.set_username(&name);
                }
                if panel.post(&content, parent).await? {
                    print_thread(&panel.view());
                }
            }
            CommentAction::Delete { id } => {
                let target = CommentTarget {
                    atk_sig: String::new(),
                    def_sig: String::new(),
                    server: String::new(),
                };
                let mut panel =
                    CommentsPanel::new(api.clone(), notifier.clone(), store.clone(), target);
                panel.delete(id).await?;
            }
        },

        Commands::Submit {
            server,
            season,
            tag,
            atk_team,
            def_team,
            wins,
            losses,
            note,
            image,
        } => {
            let queue = ReviewQueue::new(api.clone(), notifier.clone());
            queue
                .submit(&NewSubmission {
                    server,
                    season,
                    tag,
                    atk_team: parse_id_list(&atk_team),
                    def_team: parse_id_list(&def_team),
                    wins,
                    losses,
                    note,
                    image,
                })
                .await?;
        }

        Commands::Review { action } => {
            let queue = ReviewQueue::new(api.clone(), notifier.clone());
            match action {
                ReviewAction::List => {
                    let pending = queue.pending().await?;
                    println!("{} pending submissions", pending.len());
                    print_submissions(&pending);
                }
                ReviewAction::History => {
                    let history = queue.history().await?;
                    print_submissions(&history);
                }
                ReviewAction::Approve { id } => queue.approve(id).await?,
                ReviewAction::Reject { id } => queue.reject(id).await?,
                ReviewAction::Revert { id } => queue.revert(id).await?,
            }
        }

        Commands::ManualAdd {
            server,
            season,
            tag,
            atk_team,
            def_team,
            wins,
            losses,
        } => {
            let queue = ReviewQueue::new(api.clone(), notifier.clone());
            queue
                .manual_add(&ManualRecord {
                    server,
                    season,
                    tag,
                    atk_team: parse_id_list(&atk_team),
                    def_team: parse_id_list(&def_team),
                    wins,
                    losses,
                })
                .await?;
        }

        Commands::Users { action } => {
            let admin = UserAdmin::new(api.clone(), notifier.clone());
            match action {
                UserAction::List => {
                    for user in admin.users().await? {
                        println!(
                            "#{:<4} {:16} {:5}  created {}",
                            user.id,
                            user.username,
                            user.role,
                            format_time(user.created_at)
                        );
                    }
                }
                UserAction::Create {
                    username,
                    password,
                    role,
                } => {
                    admin.create(&username, &password, parse_role(&role)?).await?;
                }
                UserAction::SetRole { id, role } => {
                    admin.set_role(id, parse_role(&role)?).await?;
                }
                UserAction::Delete { id } => {
                    admin.delete(id).await?;
                }
            }
        }

        Commands::Login { username, password } => {
            session.login(&username, &password).await?;
            println!("Logged in as {}", username);
        }

        Commands::Logout => {
            session.logout();
            println!("Logged out");
        }

        Commands::ResetPassword {
            username,
            old_password,
            new_password,
        } => {
            session
                .reset_password(&username, &old_password, &new_password)
                .await?;
        }

        Commands::Students { lang } => {
            let client = CatalogClient::new(CatalogConfig {
                base_url: config.catalog.base_url.clone(),
                cache_dir: config.catalog.cache_dir.clone(),
                cache_ttl: Duration::from_secs(config.catalog.cache_ttl_seconds),
                ..CatalogConfig::default()
            })?;
            let catalog = client.students(CatalogLanguage::from_tag(&lang)).await?;
            println!("{} students", catalog.len());

            let mut strikers = catalog.eligible_for_slot(0);
            let specials = catalog.eligible_for_slot(4);
            strikers.extend(specials);
            for student in strikers {
                println!(
                    "{:<7} {:20} {:12} {}",
                    student.id,
                    student.name,
                    student.school,
                    if student.is_striker() {
                        "striker"
                    } else {
                        "special"
                    }
                );
            }
        }
    }

    Ok(())
}
