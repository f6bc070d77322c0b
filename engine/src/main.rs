//! Vitality command-line client
//!
//! Drives the engine from a line-oriented prompt on stdin. Type `help` for
//! the command list.

use anyhow::Result;
use redis::aio::ConnectionManager;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitality_engine::advisor::Advisor;
use vitality_engine::auth::{JwtService, LocalIdentityProvider};
use vitality_engine::cli::{self, Command};
use vitality_engine::config::{AppConfig, StorageBackend};
use vitality_engine::repositories::{KeyValueStore, MemoryStore, RedisStore};
use vitality_engine::{AppController, EngineResult, Screen};
use vitality_shared::catalog::{search_library, QUICK_WORKOUTS};
use vitality_shared::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %AppConfig::environment(),
        "Starting Vitality"
    );

    if AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let store = open_store(&config).await;
    let identity = Arc::new(LocalIdentityProvider::new(
        store.clone(),
        JwtService::new(&config.identity.jwt_secret, config.identity.session_expiry_secs),
    ));
    if let Err(e) = identity.restore().await {
        warn!("Could not restore saved session: {}", e);
    }

    let advisor = Advisor::from_config(&config.ai)?;
    let mut app = AppController::new(config, store, identity, advisor);

    match app.start().await {
        Ok(screen) => show_screen(&screen),
        Err(e) => println!("{}", e.user_message()),
    }

    run_prompt(&mut app).await?;

    info!("Vitality shutdown complete");
    Ok(())
}

/// Read commands until `quit`, end of input or Ctrl+C
async fn run_prompt(app: &mut AppController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };

        if let Ok(Some(screen)) = app.sync_session().await {
            show_screen(&screen);
        }

        let command = match cli::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(e) = execute(app, command).await {
            println!("{}", e.user_message());
        }
        for notification in app.visible_notifications(chrono::Utc::now()) {
            println!("* {}", notification.message);
        }
    }

    Ok(())
}

async fn execute(app: &mut AppController, command: Command) -> EngineResult<()> {
    match command {
        Command::Signup { email, password } => show_screen(&app.sign_up(&email, &password).await?),
        Command::Login { email, password } => show_screen(&app.sign_in(&email, &password).await?),
        Command::Logout => show_screen(&app.sign_out().await?),
        Command::Onboard(args) => show_screen(&app.complete_onboarding(args.into_input()).await?),
        Command::Workout {
            minutes,
            calories,
            workout_type,
        } => {
            let workout = Command::manual_workout(minutes, calories, &workout_type);
            let logged = app.log_workout(workout).await?;
            println!("Logged {}", logged.value.workout_type);
        }
        Command::Quick { number } => {
            let logged = app.log_quick_workout(usize::from(number) - 1).await?;
            println!("Logged {}", logged.value.workout_type);
        }
        Command::Library { filter, query } => {
            let results = search_library(&query.join(" "), filter);
            if results.is_empty() {
                println!("No workouts match.");
            }
            for w in results {
                println!(
                    "{:>4}  {:<22} {:<9} {:>3} min  {:>4} kcal  {:<12} +{} XP",
                    w.id,
                    w.title,
                    w.workout_type,
                    w.duration_minutes,
                    w.calories,
                    w.difficulty.as_str(),
                    w.xp
                );
            }
        }
        Command::LogLibrary { id } => {
            let logged = app.log_library_workout(&id).await?;
            println!("Logged {}", logged.value.workout_type);
        }
        Command::Water { ml } => {
            let total = app.add_water(ml).await?;
            println!("Water today: {} ml", total.value);
        }
        Command::Mood { mood } => {
            let selected = app.select_mood(mood).await?;
            println!("Mood recorded: {}", selected.value);
        }
        Command::Metrics { height_cm, weight_kg } => {
            let bmi = app.update_body_metrics(height_cm, weight_kg).await?;
            println!("BMI {:.1} ({})", bmi.value.value, bmi.value.category.as_str());
        }
        Command::Dashboard => print_dashboard(app)?,
        Command::View { view } => show_screen(&app.navigate(view)),
        Command::Theme => {
            let dark = app.toggle_theme().await?;
            println!("Theme: {}", if dark { "dark" } else { "light" });
        }
        Command::Advice => {
            println!("Asking your coach...");
            if let Some(text) = app.request_advice().await? {
                println!("{}", text);
            }
        }
        Command::Chat { message } => {
            if let Some(text) = app.send_chat(&message.join(" ")).await? {
                println!("Coach: {}", text);
            }
        }
        Command::Reset => show_screen(&app.reset_profile().await?),
        Command::Help => println!("{}", cli::help()),
        Command::Quit => {}
    }
    Ok(())
}

fn print_dashboard(app: &mut AppController) -> EngineResult<()> {
    let now = app.now();
    let d = app.dashboard(now)?;
    println!("{}, {}!", d.greeting, d.name);
    println!(
        "Level {} | {} XP | {:.0}% to next level | badges: {}",
        d.level,
        d.xp,
        d.level_progress_percent,
        d.badges.join(", ")
    );
    if d.bmi.is_measurement() {
        println!("BMI {:.1} ({})", d.bmi.value, d.bmi.category.as_str());
    }
    match d.target_weight_kg {
        Some(target) => println!(
            "Goal: {} | target {:.1} kg | {:.0}% complete",
            d.goal.label(),
            target,
            d.goal_progress.progress_percent
        ),
        None => println!("Goal: {}", d.goal.label()),
    }
    println!("Calories today: {} kcal", d.total_calories_today);
    println!(
        "Water: {} / {} ml ({:.0}%)",
        d.water_ml, d.water_goal_ml, d.water_percent
    );
    if let Some(mood) = d.today_mood {
        println!("Mood: {}", mood);
    }
    for w in &d.recent_workouts {
        println!(
            "  {} {} min {} kcal",
            w.workout_type, w.duration_minutes, w.calories_burned
        );
    }
    Ok(())
}

fn show_screen(screen: &Screen) {
    match screen {
        Screen::Auth => println!("Sign up or log in to continue (signup/login <email> <password>)."),
        Screen::Onboarding { suggested_name } => {
            println!("Welcome {}! Set up your profile with 'onboard'.", suggested_name);
        }
        Screen::App { view: AppView::Tracker } => {
            println!("[Tracker]");
            for (i, preset) in QUICK_WORKOUTS.iter().enumerate() {
                println!(
                    "  quick {}: {} {} min {} kcal",
                    i + 1,
                    preset.workout_type,
                    preset.duration_minutes,
                    preset.calories
                );
            }
        }
        Screen::App { view } => println!("[{:?}]", view),
    }
}

/// Pick the configured store, falling back to memory when Redis is unreachable
async fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    if config.storage.backend == StorageBackend::Redis {
        if let Some(conn) = connect_redis(&config.storage.redis_url).await {
            return Arc::new(RedisStore::new(conn, config.storage.key_prefix.clone()));
        }
        warn!("Falling back to in-memory storage; progress will not survive a restart");
    }
    Arc::new(MemoryStore::new())
}

/// Connect to Redis with graceful fallback
async fn connect_redis(url: &str) -> Option<ConnectionManager> {
    info!("Connecting to Redis...");

    match redis::Client::open(url) {
        Ok(client) => match ConnectionManager::new(client).await {
            Ok(conn) => {
                info!("Redis connection established");
                Some(conn)
            }
            Err(e) => {
                warn!("Failed to connect to Redis: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Invalid Redis URL: {}", e);
            None
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "vitality_engine=info,vitality=info".into()
        } else {
            "vitality_engine=debug,vitality=debug".into()
        }
    });

    // Logs go to stderr so they do not interleave with the prompt output
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &AppConfig) -> Result<()> {
    let errors = config.production_errors();

    if config.storage.backend == StorageBackend::Memory {
        warn!("Memory storage in production - progress is lost on restart");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
