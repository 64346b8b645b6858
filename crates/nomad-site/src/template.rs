//! HTML page templates.
//!
//! Every page shares one layout: header with the site title, a main column,
//! and the stylesheet from `nomad-assets`. Values from the content store are
//! escaped here; only [`TrustedHtml`] is written verbatim.

use std::fmt::Write;

use nomad_renderer::{TrustedHtml, escape_html};

use crate::format::format_income;
use crate::map::MapWidget;
use crate::model::{MapEntity, VisaDetail, VisaListing, detail_path};

/// Render the list page.
pub(crate) fn list_page(site_title: &str, listings: &[VisaListing]) -> String {
    let map = MapWidget::new(listings.iter().map(MapEntity::from).collect());

    let mut body = String::with_capacity(4096 + listings.len() * 512);
    let _ = write!(
        body,
        "<h1>{}</h1>\n<p class=\"visa-count\">{} {}</p>\n",
        escape_html(site_title),
        listings.len(),
        if listings.len() == 1 { "visa" } else { "visas" }
    );
    body.push_str(&map.render());

    if listings.is_empty() {
        body.push_str("<p class=\"visa-empty\">No visas listed yet.</p>\n");
    } else {
        body.push_str("<ul class=\"visa-list\">\n");
        for listing in listings {
            render_card(&mut body, listing);
        }
        body.push_str("</ul>\n");
    }

    layout(site_title, site_title, Some(MapWidget::head()), &body)
}

fn render_card(html: &mut String, listing: &VisaListing) {
    html.push_str("<li class=\"visa-card\">\n");
    let country = escape_html(&listing.country_name);
    if listing.slug.current.is_empty() {
        let _ = write!(html, "<h2>{country}</h2>\n");
    } else {
        let _ = write!(
            html,
            "<h2><a href=\"{}\">{country}</a></h2>\n",
            escape_html(&detail_path(&listing.slug.current))
        );
    }
    let _ = write!(
        html,
        "<p class=\"visa-name\">{}</p>\n<p class=\"visa-income\">Minimum income: {}/month</p>\n",
        escape_html(&listing.visa_name),
        escape_html(&format_income(listing.min_monthly_income))
    );
    if !listing.brief_eligibility.is_empty() {
        let _ = write!(
            html,
            "<p class=\"visa-brief\">{}</p>\n",
            escape_html(&listing.brief_eligibility)
        );
    }
    html.push_str("</li>\n");
}

/// Render a detail page with its rich text fields already converted.
pub(crate) fn detail_page(
    site_title: &str,
    detail: &VisaDetail,
    eligibility: &TrustedHtml,
    process: &TrustedHtml,
) -> String {
    let map = MapWidget::new(vec![MapEntity::from(detail)]);

    let mut body = String::with_capacity(4096 + eligibility.as_str().len() + process.as_str().len());
    body.push_str("<p class=\"back-link\"><a href=\"/\">&larr; All visas</a></p>\n");
    let _ = write!(
        body,
        "<h1>{}</h1>\n<p class=\"visa-name\">{}</p>\n",
        escape_html(&detail.country_name),
        escape_html(&detail.visa_name)
    );

    body.push_str("<dl class=\"visa-facts\">\n");
    fact(
        &mut body,
        "Minimum monthly income",
        &format_income(detail.min_monthly_income),
    );
    fact(&mut body, "Visa duration", &detail.visa_duration);
    fact(
        &mut body,
        "Path to residency",
        if detail.path_to_residency { "Yes" } else { "No" },
    );
    if let Some(link) = detail.official_link.as_deref().filter(|l| !l.trim().is_empty()) {
        body.push_str("<dt>Official source</dt>\n<dd>");
        if is_web_url(link) {
            let escaped = escape_html(link.trim());
            let _ = write!(
                body,
                "<a href=\"{escaped}\" target=\"_blank\" rel=\"noopener noreferrer\">{escaped}</a>"
            );
        } else {
            body.push_str(&escape_html(link));
        }
        body.push_str("</dd>\n");
    }
    body.push_str("</dl>\n");

    section(&mut body, "Eligibility", eligibility);
    section(&mut body, "Application process", process);
    body.push_str(&map.render());

    let page_title = format!("{} | {site_title}", detail.country_name);
    layout(&page_title, site_title, Some(MapWidget::head()), &body)
}

fn fact(html: &mut String, term: &str, value: &str) {
    let _ = write!(
        html,
        "<dt>{}</dt>\n<dd>{}</dd>\n",
        escape_html(term),
        escape_html(value)
    );
}

fn section(html: &mut String, heading: &str, content: &TrustedHtml) {
    if content.is_empty() {
        return;
    }
    let _ = write!(
        html,
        "<section class=\"rich-text\">\n<h2>{}</h2>\n{content}\n</section>\n",
        escape_html(heading)
    );
}

fn is_web_url(link: &str) -> bool {
    let link = link.trim();
    ["http://", "https://"].iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Render the not-found page.
pub(crate) fn not_found_page(site_title: &str) -> String {
    status_page(
        site_title,
        "Page not found",
        "We could not find the visa you were looking for.",
    )
}

/// Render the generic error page. Carries no detail about the failure.
pub(crate) fn error_page(site_title: &str) -> String {
    status_page(
        site_title,
        "Something went wrong",
        "Visa information is temporarily unavailable. Please try again later.",
    )
}

fn status_page(site_title: &str, heading: &str, message: &str) -> String {
    let mut body = String::with_capacity(512);
    let _ = write!(
        body,
        "<section class=\"status-page\">\n<h1>{}</h1>\n<p>{}</p>\n\
         <p><a href=\"/\">Back to all visas</a></p>\n</section>\n",
        escape_html(heading),
        escape_html(message)
    );
    let page_title = format!("{heading} | {site_title}");
    layout(&page_title, site_title, None, &body)
}

fn layout(page_title: &str, site_title: &str, head: Option<&str>, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = write!(html, "<title>{}</title>\n", escape_html(page_title));
    let _ = write!(
        html,
        "<link rel=\"stylesheet\" href=\"{}\">\n",
        nomad_assets::url(nomad_assets::STYLESHEET)
    );
    if let Some(head) = head {
        html.push_str(head);
    }
    html.push_str("</head>\n<body>\n");

    let _ = write!(
        html,
        "<header class=\"site-header\"><a href=\"/\">{}</a></header>\n",
        escape_html(site_title)
    );
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");

    html
}
