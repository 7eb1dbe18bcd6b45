use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use memetalk::config::setup_logging;
use memetalk::llm::{OpenAiModel, TextModel};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = memetalk::cli::CliOptions::parse();

    if let Err(err) = setup_logging(cli.debug) {
        eprintln!("Failed to set up logging: {err}");
        return;
    }

    let db = match memetalk::db::connect_db(&cli.database_path).await {
        Ok(db) => db,
        Err(err) => {
            error!("Database connection error: {}", err);
            return;
        }
    };

    if let Err(err) = memetalk::db::migrations::Migrator::up(&db, None).await {
        error!("Database migration error: {}", err);
        return;
    }

    let problems = memetalk::templates::check_template_images(&cli.image_dir);
    if problems > 0 {
        warn!(
            "{} template image(s) in {} need attention",
            problems,
            cli.image_dir.display()
        );
    }

    let text_model: Option<Arc<dyn TextModel>> = match cli.openai_api_key.as_deref() {
        Some(api_key) if !api_key.trim().is_empty() => match OpenAiModel::new(
            api_key,
            &cli.openai_model,
            &cli.openai_base_url,
            Duration::from_secs(cli.openai_timeout_secs),
        ) {
            Ok(model) => {
                info!("Using {} via {}", cli.openai_model, model.endpoint());
                let model: Arc<dyn TextModel> = Arc::new(model);
                Some(model)
            }
            Err(err) => {
                error!("Failed to set up language model client: {}", err);
                return;
            }
        },
        _ => None,
    };

    if let Err(err) = memetalk::web::setup_server(
        &cli.listen_address,
        cli.port,
        cli.image_dir,
        text_model,
        db,
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
