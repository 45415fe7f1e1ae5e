use std::sync::Arc;

use pricewatch::adapter::outbound::browser::ChromiumPriceSource;
use pricewatch::adapter::outbound::history::JsonHistoryStore;
use pricewatch::adapter::outbound::notifier::telegram::{
    run_command_listener, TelegramControl, TelegramNotifier,
};
use pricewatch::infrastructure::config::Config;
use pricewatch::port::HistoryStore;
use pricewatch::service::{DailySchedule, ScrapePipeline, Scheduler};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!(target_url = %config.target_url, "pricewatch starting");

    let store: Arc<dyn HistoryStore> = Arc::new(JsonHistoryStore::new(config.data_path.clone()));
    let source = Arc::new(ChromiumPriceSource::new(config.chromium()));
    let notifier = Arc::new(TelegramNotifier::new(config.telegram()));

    let pipeline = Arc::new(ScrapePipeline::new(
        source,
        store.clone(),
        notifier,
        config.timezone,
    ));
    let scheduler = Scheduler::new(pipeline, DailySchedule::at_default_hour(config.timezone));
    let control = TelegramControl::new(store);

    tokio::select! {
        () = scheduler.run() => {}
        () = run_command_listener(config.bot_token.clone(), control) => {
            info!("Telegram command listener stopped");
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("pricewatch stopped");
}
