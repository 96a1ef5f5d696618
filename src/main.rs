use dotenv::dotenv;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pacsearch::config::AppConfig;
use pacsearch::game::Game;
use pacsearch::infra::{CompositeObserver, DefaultObserver, GameObserver, ReplayObserver};
use pacsearch::planners::best_first::{Evaluator, Planner};
use pacsearch::state::Level;

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pacsearch=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let config = AppConfig::from_env()?;
    let level = match &config.level {
        Some(path) => Level::load(path)?,
        None => Level::classic()?,
    };
    let seed = config.seed.unwrap_or_else(rand::random);

    let mut observers: Vec<Box<dyn GameObserver>> = vec![Box::new(DefaultObserver)];
    if let Some(folder) = &config.replays_folder {
        match ReplayObserver::new(folder, seed) {
            Ok(replay) => observers.push(Box::new(replay)),
            Err(err) => tracing::warn!(error = %err, "Replay disabled"),
        }
    }

    let planner = Planner::new(config.planner_config(), Evaluator::default());
    let mut game = Game::new(
        &level,
        config.game_settings(seed),
        planner,
        CompositeObserver::new(observers),
    );
    let summary = game.run().await?;

    tracing::info!(
        status = ?summary.status,
        ticks = summary.ticks,
        lives = summary.lives,
        pellets_left = summary.pellets_left,
        "Done"
    );
    Ok(())
}
