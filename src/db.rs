pub mod rates;

use std::path::Path;

use crate::{db::rates::Rates, prelude::*};

#[must_use]
pub struct Db(turso::Connection);

impl Db {
    /// Open the database, creating the file and the schema as needed.
    /// Schema creation is idempotent, so repeated runs share one table.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn connect(path: &Path) -> Result<Self> {
        // language=sqlite
        const CREATE_RATES: &str = r"
            CREATE TABLE IF NOT EXISTS rates (
                id INTEGER PRIMARY KEY,
                date TEXT,
                supplier_company TEXT,
                display_company TEXT,
                price REAL,
                rate_type TEXT,
                is_intro_offer INTEGER,
                intro_offer_details TEXT,
                term_length INTEGER,
                early_term_fee TEXT,
                monthly_fee REAL,
                is_promo_offer INTEGER,
                promo_offer_details TEXT,
                estimated_monthly_cost REAL,
                savings_vs_current REAL
            )
        ";

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let path = path.to_str().context("the database path is not valid UTF-8")?;
        let connection = turso::Builder::new_local(path).build().await?.connect()?;
        connection.execute(CREATE_RATES, ()).await?;
        Ok(Self(connection))
    }

    pub const fn rates(&self) -> Rates<'_> {
        Rates(&self.0)
    }
}
