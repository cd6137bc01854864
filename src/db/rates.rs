use turso::Connection;

use crate::{core::score::ScoredOffer, prelude::*};

/// Append-only handle over the `rates` table.
#[must_use]
pub struct Rates<'c>(pub &'c Connection);

impl Rates<'_> {
    /// Append one scored offer. No upsert and no dedup: every run adds a
    /// fresh batch of observations.
    #[instrument(skip_all, fields(display_company = offer.display_company.as_str()))]
    pub async fn insert(&self, offer: &ScoredOffer) -> Result {
        // language=sqlite
        const SQL: &str = r"
            INSERT INTO rates (
                date, supplier_company, display_company, price, rate_type,
                is_intro_offer, intro_offer_details, term_length, early_term_fee,
                monthly_fee, is_promo_offer, promo_offer_details,
                estimated_monthly_cost, savings_vs_current
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ";

        self.0
            .prepare_cached(SQL)
            .await?
            .execute((
                offer.date.to_string(),
                offer.supplier_company.as_str(),
                offer.display_company.as_str(),
                offer.price.0,
                offer.rate_type.as_str(),
                i64::from(offer.is_intro_offer),
                offer.intro_offer_details.as_str(),
                offer.term_length,
                offer.early_term_fee.as_str(),
                offer.monthly_fee.0,
                i64::from(offer.is_promo_offer),
                offer.promo_offer_details.as_str(),
                offer.estimated_monthly_cost.0,
                offer.savings_vs_current.0,
            ))
            .await?;
        Ok(())
    }

    /// Number of stored observations.
    pub async fn count(&self) -> Result<i64> {
        // language=sqlite
        const SQL: &str = "SELECT COUNT(*) FROM rates";

        let row = self.0.prepare_cached(SQL).await?.query_row(()).await?;
        match row.get_value(0)? {
            turso::Value::Integer(count) => Ok(count),
            value => bail!("unexpected count value: {value:?}"),
        }
    }
}
