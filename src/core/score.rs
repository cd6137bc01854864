//! The filter and scoring pass over the exported rows.

use bon::Builder;
use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    cli::{BaselineArgs, FilterArgs},
    core::offer::{Offer, is_yes, read_offers},
    prelude::*,
    quantity::{Cost, KilowattHourRate},
};

/// An offer that passed the filters, with the derived comparison fields.
/// Immutable once built; one observation per pipeline run.
#[derive(Builder, Clone, Debug)]
pub struct ScoredOffer {
    pub date: NaiveDate,
    pub supplier_company: String,
    pub display_company: String,
    pub price: KilowattHourRate,
    pub rate_type: String,
    pub is_intro_offer: bool,
    pub intro_offer_details: String,
    pub term_length: i64,
    pub early_term_fee: String,
    pub monthly_fee: Cost,
    pub is_promo_offer: bool,
    pub promo_offer_details: String,
    pub estimated_monthly_cost: Cost,
    pub savings_vs_current: Cost,
}

/// Why a row was left out of the batch.
#[derive(Debug, derive_more::Display)]
pub enum SkipReason {
    #[display("rate type `{_0}` does not match the filter")]
    RateTypeMismatch(String),

    #[display("term of {_0} months is below the minimum")]
    BelowMinimumTerm(i64),

    #[display("unparseable price `{_0}`")]
    UnparseablePrice(String),

    #[display("unparseable term length `{_0}`")]
    UnparseableTermLength(String),

    #[display("unparseable monthly fee `{_0}`")]
    UnparseableMonthlyFee(String),

    #[display("malformed row: {_0}")]
    MalformedRow(csv::Error),
}

impl SkipReason {
    const fn label(&self) -> &'static str {
        match self {
            Self::RateTypeMismatch(_) => "rate type mismatch",
            Self::BelowMinimumTerm(_) => "below the minimum term",
            Self::UnparseablePrice(_) => "unparseable price",
            Self::UnparseableTermLength(_) => "unparseable term length",
            Self::UnparseableMonthlyFee(_) => "unparseable monthly fee",
            Self::MalformedRow(_) => "malformed row",
        }
    }
}

/// Outcome of one scoring pass: the surviving offers in source order, plus
/// every skipped row with its reason.
#[must_use]
pub struct Scoring {
    pub offers: Vec<ScoredOffer>,
    pub skips: Vec<SkipReason>,
}

impl Scoring {
    /// Offers worth an alert: savings at or above the threshold.
    pub fn matches(&self, threshold: Cost) -> Vec<&ScoredOffer> {
        self.offers.iter().filter(|offer| offer.savings_vs_current >= threshold).collect()
    }

    /// Report the skips once, grouped by reason.
    pub fn log_skips(&self) {
        for (label, n_rows) in self.skips.iter().map(SkipReason::label).counts().into_iter().sorted()
        {
            warn!(n_rows, "skipped rows: {label}");
        }
    }
}

/// Run the whole export through the filters and score the survivors against
/// the baseline. Never fails as a whole: each bad row becomes a skip.
#[instrument(skip_all, fields(date = %date))]
pub fn score_offers(
    csv_text: &str,
    filter: &FilterArgs,
    baseline: &BaselineArgs,
    date: NaiveDate,
) -> Scoring {
    let current_cost = baseline.current_cost();
    let (mut offers, mut skips) = (Vec::new(), Vec::new());
    for row in read_offers(csv_text) {
        match score_offer(row, filter, baseline, current_cost, date) {
            Ok(offer) => offers.push(offer),
            Err(reason) => skips.push(reason),
        }
    }
    Scoring { offers, skips }
}

fn score_offer(
    row: csv::Result<Offer>,
    filter: &FilterArgs,
    baseline: &BaselineArgs,
    current_cost: Cost,
    date: NaiveDate,
) -> Result<ScoredOffer, SkipReason> {
    let offer = row.map_err(SkipReason::MalformedRow)?;

    if !filter.rate_type.is_empty() && offer.rate_type != filter.rate_type {
        return Err(SkipReason::RateTypeMismatch(offer.rate_type));
    }
    let term_length: i64 = offer
        .term_length
        .trim()
        .parse()
        .map_err(|_| SkipReason::UnparseableTermLength(offer.term_length.clone()))?;
    if filter.min_term_length != 0 && term_length < filter.min_term_length {
        return Err(SkipReason::BelowMinimumTerm(term_length));
    }
    let price: KilowattHourRate = offer
        .price
        .trim()
        .parse()
        .map_err(|_| SkipReason::UnparseablePrice(offer.price.clone()))?;
    let monthly_fee: Cost = if offer.monthly_fee.trim().is_empty() {
        Cost::ZERO
    } else {
        offer
            .monthly_fee
            .trim()
            .parse()
            .map_err(|_| SkipReason::UnparseableMonthlyFee(offer.monthly_fee.clone()))?
    };

    let estimated_monthly_cost = price * baseline.avg_monthly_kwh + monthly_fee;
    Ok(ScoredOffer::builder()
        .date(date)
        .supplier_company(offer.supplier_company)
        .display_company(offer.display_company)
        .price(price)
        .rate_type(offer.rate_type)
        .is_intro_offer(is_yes(&offer.is_intro_offer))
        .intro_offer_details(offer.intro_offer_details)
        .term_length(term_length)
        .early_term_fee(offer.early_term_fee)
        .monthly_fee(monthly_fee)
        .is_promo_offer(is_yes(&offer.is_promo_offer))
        .promo_offer_details(offer.promo_offer_details)
        .estimated_monthly_cost(estimated_monthly_cost)
        .savings_vs_current(current_cost - estimated_monthly_cost)
        .build())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::KilowattHours;

    const HEADER: &str = "SupplierCompanyName,CompanyName,Price,RateType,IsIntroductoryOffer,IntroductoryOfferDetails,TermLength,EarlyTerminationFee,MonthlyFee,IsPromotionalOffer,PromotionalOfferDetails";

    fn default_filter() -> FilterArgs {
        FilterArgs { rate_type: "Fixed".to_string(), min_term_length: 12 }
    }

    fn default_baseline() -> BaselineArgs {
        BaselineArgs {
            avg_monthly_kwh: KilowattHours(1000.0),
            current_price: KilowattHourRate(0.09),
            current_monthly_fee: Cost(5.0),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn csv_with(rows: &[&str]) -> String {
        format!("{HEADER}\n{}\n", rows.join("\n"))
    }

    #[test]
    fn scores_the_reference_offer() {
        let csv_text = csv_with(&["AEP Energy,AEP 12mo,0.07,Fixed,No,,12,None,,No,"]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert!(scoring.skips.is_empty());
        assert_eq!(scoring.offers.len(), 1);
        let offer = &scoring.offers[0];
        assert_abs_diff_eq!(offer.estimated_monthly_cost.0, 70.0, epsilon = 1e-9);
        assert_abs_diff_eq!(offer.savings_vs_current.0, 25.0, epsilon = 1e-9);
        assert_eq!(offer.date, date());
        assert_eq!(offer.term_length, 12);
        assert_eq!(offer.monthly_fee, Cost::ZERO);
    }

    #[test]
    fn non_blank_monthly_fee_is_added() {
        let csv_text = csv_with(&["AEP Energy,AEP 12mo,0.07,Fixed,No,,12,None,4.99,No,"]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert_abs_diff_eq!(scoring.offers[0].estimated_monthly_cost.0, 74.99, epsilon = 1e-9);
        assert_abs_diff_eq!(scoring.offers[0].savings_vs_current.0, 20.01, epsilon = 1e-9);
    }

    #[test]
    fn excludes_other_rate_types_regardless_of_price() {
        let csv_text = csv_with(&["Cheapo,Cheapo Var,0.01,Variable,No,,12,None,,No,"]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert!(scoring.offers.is_empty());
        assert!(matches!(scoring.skips[0], SkipReason::RateTypeMismatch(_)));
    }

    #[test]
    fn excludes_terms_below_the_minimum() {
        let csv_text = csv_with(&["AEP Energy,AEP 6mo,0.07,Fixed,No,,6,None,,No,"]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert!(scoring.offers.is_empty());
        assert!(matches!(scoring.skips[0], SkipReason::BelowMinimumTerm(6)));
    }

    #[test]
    fn empty_rate_type_disables_the_type_filter() {
        let csv_text = csv_with(&["Cheapo,Cheapo Var,0.01,Variable,No,,12,None,,No,"]);
        let filter = FilterArgs { rate_type: String::new(), min_term_length: 12 };
        let scoring = score_offers(&csv_text, &filter, &default_baseline(), date());
        assert_eq!(scoring.offers.len(), 1);
    }

    #[test]
    fn zero_minimum_disables_the_term_filter() {
        let csv_text = csv_with(&["AEP Energy,AEP 3mo,0.07,Fixed,No,,3,None,,No,"]);
        let filter = FilterArgs { rate_type: "Fixed".to_string(), min_term_length: 0 };
        let scoring = score_offers(&csv_text, &filter, &default_baseline(), date());
        assert_eq!(scoring.offers.len(), 1);
        assert_eq!(scoring.offers[0].term_length, 3);
    }

    #[test]
    fn skips_unparseable_numbers_without_aborting() {
        let csv_text = csv_with(&[
            "Bad Price,Bad Price 12mo,N/A,Fixed,No,,12,None,,No,",
            "Bad Term,Bad Term 12mo,0.07,Fixed,No,,TBD,None,,No,",
            "Good,Good 12mo,0.08,Fixed,No,,12,None,,No,",
        ]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert_eq!(scoring.offers.len(), 1);
        assert_eq!(scoring.offers[0].display_company, "Good 12mo");
        assert!(matches!(scoring.skips[0], SkipReason::UnparseablePrice(_)));
        assert!(matches!(scoring.skips[1], SkipReason::UnparseableTermLength(_)));
    }

    #[test]
    fn skips_malformed_rows_without_aborting() {
        let csv_text = csv_with(&[
            "only,three,columns",
            "Good,Good 12mo,0.08,Fixed,No,,12,None,,No,",
        ]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        assert_eq!(scoring.offers.len(), 1);
        assert!(matches!(scoring.skips[0], SkipReason::MalformedRow(_)));
    }

    #[test]
    fn preserves_source_row_order() {
        let csv_text = csv_with(&[
            "B,B 12mo,0.08,Fixed,No,,12,None,,No,",
            "A,A 12mo,0.07,Fixed,No,,12,None,,No,",
        ]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        let names =
            scoring.offers.iter().map(|offer| offer.display_company.as_str()).collect_vec();
        assert_eq!(names, ["B 12mo", "A 12mo"]);
    }

    fn scored(display_company: &str, savings: f64) -> ScoredOffer {
        ScoredOffer::builder()
            .date(date())
            .supplier_company("AEP Energy".to_string())
            .display_company(display_company.to_string())
            .price(KilowattHourRate(0.07))
            .rate_type("Fixed".to_string())
            .is_intro_offer(false)
            .intro_offer_details(String::new())
            .term_length(12)
            .early_term_fee("None".to_string())
            .monthly_fee(Cost::ZERO)
            .is_promo_offer(false)
            .promo_offer_details(String::new())
            .estimated_monthly_cost(Cost(70.0))
            .savings_vs_current(Cost(savings))
            .build()
    }

    #[test]
    fn savings_equal_to_the_threshold_qualify() {
        let scoring = Scoring {
            offers: vec![scored("At", 10.0), scored("Below", 9.99), scored("Above", 25.0)],
            skips: Vec::new(),
        };
        let names = scoring
            .matches(Cost(10.0))
            .into_iter()
            .map(|offer| offer.display_company.as_str())
            .collect_vec();
        assert_eq!(names, ["At", "Above"]);
    }

    #[test]
    fn savings_is_anchored_to_one_baseline() {
        let csv_text = csv_with(&[
            "A,A 12mo,0.07,Fixed,No,,12,None,,No,",
            "B,B 12mo,0.08,Fixed,No,,12,None,2.00,No,",
        ]);
        let scoring = score_offers(&csv_text, &default_filter(), &default_baseline(), date());
        let current_cost = default_baseline().current_cost();
        for offer in &scoring.offers {
            assert_abs_diff_eq!(
                offer.savings_vs_current.0,
                current_cost.0 - offer.estimated_monthly_cost.0,
                epsilon = 1e-9
            );
        }
    }
}
