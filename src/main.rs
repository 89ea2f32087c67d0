use std::sync::Arc;

use log::{error, info};
use tokio::{io::BufReader, sync::Mutex};

use expense_splitter::{commands, config::Config, database::sqlite::SqliteDatabase};

#[tokio::main]
async fn main() {
    init_log();

    let config = Config::from_env()
        .map_err(|e| error!("Cannot read configuration: {:#}", e))
        .expect("Cannot read configuration");

    info!("Initializing database at {}...", config.db_path.display());
    let database = SqliteDatabase::new(&config.db_path)
        .map_err(|e| error!("Cannot initialize database: {}", e))
        .expect("Cannot initialize database");

    let database = Arc::new(Mutex::new(database));

    info!("Serving commands for {}...", config.user.display_name);
    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = commands::run(&config, &database, input, tokio::io::stdout()).await {
        error!("Cannot serve commands: {}", e);
    }
}

/// Log to stderr, at the level set by `RUST_LOG` (`info` by default).
fn init_log() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();
}
