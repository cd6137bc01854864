//! Client for the PUCO [Apples to Apples] comparison site.
//!
//! The CSV export is an ASP.NET WebForms postback: the page has to be fetched
//! first to harvest the hidden `__VIEWSTATE` and `__EVENTVALIDATION` tokens,
//! which are then replayed, within the same cookie session, together with
//! the export link's event target.
//!
//! [Apples to Apples]: https://energychoice.ohio.gov/

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::{error::RunError, prelude::*};

const URL: &str = "https://energychoice.ohio.gov/ApplesToApplesComparision.aspx?Category=Electric&TerritoryId=7&RateCode=1";
const EXPORT_EVENT_TARGET: &str = "ctl00$ContentPlaceHolder1$lnkExportToCSV";

pub struct Api(Client);

impl Api {
    pub fn try_new() -> Result<Self> {
        Ok(Self(
            Client::builder()
                .user_agent("Mozilla/5.0")
                .cookie_store(true)
                .timeout(Duration::from_secs(30))
                .build()?,
        ))
    }

    /// Fetch the comparison dataset as raw CSV text.
    ///
    /// One cohesive operation on purpose: the tokens are only valid inside
    /// the session that produced them, so they never leave this call.
    #[instrument(skip_all)]
    pub async fn fetch_exported_dataset(&self) -> Result<String, RunError> {
        let page = self.get_comparison_page().await.map_err(RunError::Retrieval)?;
        let tokens = extract_tokens(&page).map_err(RunError::Retrieval)?;
        self.trigger_export(&tokens).await.map_err(RunError::Export)
    }

    #[instrument(skip_all)]
    async fn get_comparison_page(&self) -> Result<String> {
        info!("fetching the comparison page…");
        self.0
            .get(URL)
            .send()
            .await
            .context("failed to call the comparison page")?
            .error_for_status()
            .context("the comparison page request failed")?
            .text()
            .await
            .context("failed to read the comparison page")
    }

    #[instrument(skip_all)]
    async fn trigger_export(&self, tokens: &FormTokens) -> Result<String> {
        info!("triggering the CSV export…");
        self.0
            .post(URL)
            .form(&[
                ("__EVENTTARGET", EXPORT_EVENT_TARGET),
                ("__EVENTARGUMENT", ""),
                ("__VIEWSTATE", tokens.view_state.as_str()),
                ("__EVENTVALIDATION", tokens.event_validation.as_str()),
            ])
            .send()
            .await
            .context("failed to post the export form")?
            .error_for_status()
            .context("the export request failed")?
            .text()
            .await
            .context("failed to read the exported CSV")
    }
}

/// The two hidden anti-forgery values of the WebForms page.
struct FormTokens {
    view_state: String,
    event_validation: String,
}

fn extract_tokens(html: &str) -> Result<FormTokens> {
    let document = Html::parse_document(html);
    Ok(FormTokens {
        view_state: extract_hidden_value(&document, "__VIEWSTATE")?,
        event_validation: extract_hidden_value(&document, "__EVENTVALIDATION")?,
    })
}

fn extract_hidden_value(document: &Html, id: &str) -> Result<String> {
    let selector = Selector::parse(&format!("#{id}"))
        .map_err(|error| anyhow::format_err!("failed to parse the `#{id}` selector: {error}"))?;
    document
        .select(&selector)
        .next()
        .with_context(|| format!("the page is missing the `{id}` hidden field"))?
        .value()
        .attr("value")
        .with_context(|| format!("the `{id}` hidden field has no value"))
        .map(ToOwned::to_owned)
}
