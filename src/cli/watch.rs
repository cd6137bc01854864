use chrono::Local;

use crate::{
    api::apples_to_apples::Api,
    cli::WatchArgs,
    core::score::score_offers,
    db::Db,
    error::RunError,
    prelude::*,
};

/// Run the whole pipeline: fetch, score, persist, and conditionally alert.
#[instrument(skip_all)]
pub async fn watch(args: &WatchArgs) -> Result<(), RunError> {
    let api = Api::try_new().map_err(RunError::Retrieval)?;
    let csv_text = api.fetch_exported_dataset().await?;

    let current_cost = args.baseline.current_cost();
    info!(%current_cost, "computed the baseline");

    let scoring = score_offers(&csv_text, &args.filter, &args.baseline, Local::now().date_naive());
    scoring.log_skips();
    info!(n_offers = scoring.offers.len(), "scored the batch");

    let db = Db::connect(&args.db.path).await.map_err(RunError::Persistence)?;
    let rates = db.rates();
    for offer in &scoring.offers {
        rates.insert(offer).await.map_err(RunError::Persistence)?;
    }

    let matches = scoring.matches(args.notify_savings);
    if matches.is_empty() {
        info!("no offers worth an alert");
        return Ok(());
    }
    match args.smtp.build_mailer().map_err(RunError::Delivery)? {
        Some(mailer) => mailer.send_savings_alert(&matches).await.map_err(RunError::Delivery)?,
        None => info!(n_matches = matches.len(), "email is not configured, skipping the alert"),
    }
    Ok(())
}
