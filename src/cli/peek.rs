use chrono::Local;

use crate::{
    api::apples_to_apples::Api,
    cli::PeekArgs,
    core::score::score_offers,
    error::RunError,
    prelude::*,
    tables::build_offers_table,
};

/// Dry run: fetch and score the offers, print them, persist and mail nothing.
#[instrument(skip_all)]
pub async fn peek(args: &PeekArgs) -> Result<(), RunError> {
    let api = Api::try_new().map_err(RunError::Retrieval)?;
    let csv_text = api.fetch_exported_dataset().await?;

    let current_cost = args.baseline.current_cost();
    info!(%current_cost, "computed the baseline");

    let scoring = score_offers(&csv_text, &args.filter, &args.baseline, Local::now().date_naive());
    scoring.log_skips();
    println!("{}", build_offers_table(&scoring.offers));
    Ok(())
}
