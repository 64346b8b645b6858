//! The two content queries the site issues.
//!
//! The slug is the only outside value that reaches a query and it is always
//! bound as `$slug`.

use nomad_config::ListingOrder;
use nomad_content::Query;

/// Document type holding visa listings.
pub const DOCUMENT_TYPE: &str = "digitalNomadVisa";

const LISTING_PROJECTION: &str =
    "{countryName, visaName, minMonthlyIncome, briefEligibility, slug, latitude, longitude}";

const DETAIL_PROJECTION: &str = "{countryName, visaName, minMonthlyIncome, slug, \
     fullEligibility, applicationProcess, officialLink, visaDuration, pathToResidency, \
     latitude, longitude}";

/// All listings, projected for the list page.
pub fn listing_query(order: ListingOrder) -> Query {
    let ordering = match order {
        ListingOrder::CountryName => " | order(countryName asc)",
        ListingOrder::Unspecified => "",
    };
    Query::new(format!(
        "*[_type == \"{DOCUMENT_TYPE}\"]{ordering} {LISTING_PROJECTION}"
    ))
}

/// At most one listing whose slug equals `slug`, projected for the detail page.
pub fn visa_by_slug_query(slug: &str) -> Query {
    Query::new(format!(
        "*[_type == \"{DOCUMENT_TYPE}\" && slug.current == $slug][0] {DETAIL_PROJECTION}"
    ))
    .param("slug", slug)
}
