//! Raw rows of the Apples-to-Apples CSV export.

use serde::Deserialize;

/// One advertised supply plan, exactly as exported: every field is verbatim
/// text, including the numeric ones. Columns beyond the mapped ones are
/// ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Offer {
    #[serde(rename = "SupplierCompanyName")]
    pub supplier_company: String,

    #[serde(rename = "CompanyName")]
    pub display_company: String,

    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "RateType")]
    pub rate_type: String,

    #[serde(rename = "IsIntroductoryOffer")]
    pub is_intro_offer: String,

    #[serde(rename = "IntroductoryOfferDetails")]
    pub intro_offer_details: String,

    #[serde(rename = "TermLength")]
    pub term_length: String,

    #[serde(rename = "EarlyTerminationFee")]
    pub early_term_fee: String,

    #[serde(rename = "MonthlyFee")]
    pub monthly_fee: String,

    #[serde(rename = "IsPromotionalOffer")]
    pub is_promo_offer: String,

    #[serde(rename = "PromotionalOfferDetails")]
    pub promo_offer_details: String,
}

/// The export marks set flags with a literal `Yes`.
pub fn is_yes(flag: &str) -> bool {
    flag == "Yes"
}

/// Iterate the export in source order, one fallible row at a time.
pub fn read_offers(csv_text: &str) -> impl Iterator<Item = csv::Result<Offer>> + '_ {
    csv::Reader::from_reader(csv_text.as_bytes()).into_deserialize()
}
