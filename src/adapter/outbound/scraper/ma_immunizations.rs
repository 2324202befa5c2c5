//! Massachusetts state immunization clinic search.
//!
//! The search results are paged HTML behind a queue-based waiting room.
//! Each listing is one site on one date. The same site and date can appear
//! more than once (one listing per sign-up link); those are merged.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::COOKIE;
use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::http::{cookie_header, response_cookies, HttpSettings};
use crate::domain::{
    render_appointments, section_block, Clinic, NotificationThresholds, ThresholdTable,
};
use crate::error::{AdapterError, Result};
use crate::port::{Scraper, StateStore};

const SITE: &str = "ma-immunizations";

pub const MA_IMMUNIZATIONS_BASE_URL: &str = "https://www.maimmunizations.org";
/// Key of the cached session in the cookie namespace.
pub const COOKIE_SITE: &str = "ma-immunization";

const SEARCH_PATH: &str = "/clinic/search?q[services_name_in][]=Vaccination";
const MAX_PAGES: u32 = 100;
const WAITING_ROOM_RETRIES: u32 = 12;
const WAITING_ROOM_DELAY: Duration = Duration::from_secs(5);
/// Session lifetime when the site sets no expiry.
const DEFAULT_SESSION_TTL: chrono::Duration = chrono::Duration::minutes(30);
/// Listings at this site are posted about more often than the default.
const COOLDOWN: Duration = Duration::from_secs(10 * 60);

static CLINIC_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("Find a Vaccination Clinic").expect("valid regex"));
static WAIT_ESTIMATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"estimated wait time is\s*([\w\s]+)\.").expect("valid regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) on (\d{2}/\d{2}/\d{4})$").expect("valid regex"));
static APPOINTMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Available Appointments\s+: (\d+)").expect("valid regex"));
static VACCINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Vaccinations offered:\s+(.+)$").expect("valid regex"));
static AGE_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Age groups served:\s+(.+)$").expect("valid regex"));
static ADDITIONAL_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Additional Information:\s+(.+)$").expect("valid regex"));

/// One listing from the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaClinic {
    pub title: String,
    pub address: String,
    pub vaccine: Option<String>,
    pub age_groups: Option<String>,
    pub additional_info: Option<String>,
    pub appointments: u32,
    pub link: Option<String>,
}

impl MaClinic {
    /// Site name without the trailing date.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        TITLE
            .captures(&self.title)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

impl Clinic for MaClinic {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn appointments(&self) -> u32 {
        self.appointments
    }

    fn link(&self) -> Option<String> {
        self.link.clone()
    }

    fn address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    /// The search page filtered to this site; registration links expire.
    fn sign_up_page(&self) -> Option<String> {
        let mut page = format!("{MA_IMMUNIZATIONS_BASE_URL}/clinic/search?");
        if let Some(name) = self.name() {
            page.push_str("q[venue_search_name_or_venue_name_i_cont]=");
            page.push_str(&name.replace(' ', "%20"));
            page.push('&');
        }
        Some(page)
    }

    fn thresholds(&self, table: &ThresholdTable) -> NotificationThresholds {
        NotificationThresholds {
            cooldown: COOLDOWN,
            ..table.get(self.class())
        }
    }

    fn chat_block(&self, new_appointments: i64) -> Value {
        section_block(format!(
            "*{}*\n*Address:* {}\n*Vaccine:* {}\n*Age groups*: {}\n*Available appointments:* {}\n*Additional info:* {}\n*Link:* {}",
            self.title,
            self.address,
            self.vaccine.as_deref().unwrap_or_default(),
            self.age_groups.as_deref().unwrap_or_default(),
            render_appointments(self.appointments, new_appointments),
            self.additional_info.as_deref().unwrap_or_default(),
            self.link.as_deref().unwrap_or_default(),
        ))
    }
}

/// Parsed results page.
#[derive(Debug, Default)]
pub struct SearchPage {
    pub clinics: Vec<MaClinic>,
    pub final_page: bool,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector(".main-container > div"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static NEXT: LazyLock<Selector> = LazyLock::new(|| selector(".page.next"));
static NEXT_DISABLED: LazyLock<Selector> = LazyLock::new(|| selector(".page.next.disabled"));

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Resolve a sign-up `href` against the site root.
fn resolve_link(base_url: &str, href: &str) -> Option<String> {
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .ok()
}

/// Parse one listing. Listings with fewer than eight paragraphs are
/// incomplete and skipped.
fn parse_listing(group: ElementRef<'_>, base_url: &str) -> Option<MaClinic> {
    let paragraphs: Vec<ElementRef<'_>> = group.select(&PARAGRAPH).collect();
    if paragraphs.len() < 8 {
        return None;
    }
    let texts: Vec<String> = paragraphs.iter().map(text_of).collect();

    let appointments = capture(&APPOINTMENTS, &texts[7])
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    let link = paragraphs
        .get(8)
        .and_then(|p| p.select(&ANCHOR).next())
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(base_url, href));

    Some(MaClinic {
        title: texts[0].clone(),
        address: texts[1].clone(),
        vaccine: capture(&VACCINE, &texts[2]),
        age_groups: capture(&AGE_GROUPS, &texts[3]),
        additional_info: capture(&ADDITIONAL_INFO, &texts[5]),
        appointments,
        link,
    })
}

/// Parse a results page. `base_url` prefixes relative sign-up links.
#[must_use]
pub fn parse_page(html: &str, base_url: &str) -> SearchPage {
    let document = Html::parse_document(html);
    let final_page = document.select(&NEXT).next().is_none()
        || document.select(&NEXT_DISABLED).next().is_some();

    let Some(container) = document.select(&CONTAINER).nth(1) else {
        warn!(site = SITE, "Couldn't find main page container");
        return SearchPage {
            clinics: Vec::new(),
            final_page,
        };
    };

    let clinics: Vec<MaClinic> = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| {
            e.value().name() == "div"
                && e
                    .value()
                    .has_class("justify-between", CaseSensitivity::CaseSensitive)
        })
        .filter_map(|group| parse_listing(group, base_url))
        .collect();

    if clinics.is_empty() {
        warn!(site = SITE, "Couldn't find any clinics");
    }
    for clinic in clinics.iter().filter(|c| c.appointments > 0) {
        info!(
            site = SITE,
            clinic = %clinic.title,
            appointments = clinic.appointments,
            has_link = clinic.link.is_some(),
            "Found appointments"
        );
    }

    SearchPage {
        clinics,
        final_page,
    }
}

/// Merge listings sharing a title by summing their counts.
///
/// First-seen order and the first listing's details are kept.
#[must_use]
pub fn merge_duplicates(clinics: Vec<MaClinic>) -> Vec<MaClinic> {
    let mut merged: Vec<MaClinic> = Vec::with_capacity(clinics.len());
    for clinic in clinics {
        match merged.iter_mut().find(|c| c.title == clinic.title) {
            Some(existing) => {
                existing.appointments = existing.appointments.saturating_add(clinic.appointments);
            }
            None => merged.push(clinic),
        }
    }
    merged
}

/// Whether `html` is a results page rather than the waiting room.
#[must_use]
pub fn is_clinic_page(html: &str) -> bool {
    CLINIC_PAGE.is_match(html)
}

/// Scraper for the state clinic search.
pub struct MaImmunizationsScraper {
    client: reqwest::Client,
    base_url: String,
    settings: HttpSettings,
    waiting_room_delay: Duration,
}

impl MaImmunizationsScraper {
    #[must_use]
    pub fn new(client: reqwest::Client, settings: HttpSettings) -> Self {
        Self::with_base_url(client, settings, MA_IMMUNIZATIONS_BASE_URL)
    }

    /// Point the scraper at another host, for tests.
    #[must_use]
    pub fn with_base_url(
        client: reqwest::Client,
        settings: HttpSettings,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings,
            waiting_room_delay: WAITING_ROOM_DELAY,
        }
    }

    /// Override the pause between waiting-room polls.
    #[must_use]
    pub fn with_waiting_room_delay(mut self, delay: Duration) -> Self {
        self.waiting_room_delay = delay;
        self
    }

    fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url)
    }

    /// Cached cookies if still fresh, otherwise a new session.
    async fn session(&self, state: &StateStore) -> Result<Option<String>> {
        let now = Utc::now();
        if let Some(session) = state.get_session(COOKIE_SITE).await? {
            if session.is_fresh(now) {
                debug!(site = SITE, "Using existing cookies");
                return Ok(cookie_header(&session.cookies));
            }
        }

        info!(site = SITE, "Getting new cookies");
        let response = self
            .client
            .get(self.search_url())
            .send()
            .await
            .map_err(|source| AdapterError::Request { site: SITE, source })?;
        let collected = response_cookies(response.headers(), now);
        let expiration: DateTime<Utc> = collected.expires.unwrap_or(now + DEFAULT_SESSION_TTL);
        let cookies = Value::Object(collected.cookies);
        let header = cookie_header(&cookies);

        state.save_session(COOKIE_SITE, cookies, expiration).await?;
        Ok(header)
    }

    async fn get_text(&self, url: &str, cookies: Option<&str>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }
        let body = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| AdapterError::Request { site: SITE, source })?
            .text()
            .await
            .map_err(|source| AdapterError::Request { site: SITE, source })?;
        Ok(body)
    }

    /// Fetch one results page, waiting out the queue if needed.
    ///
    /// Returns `None` if still in the waiting room after all retries.
    async fn fetch_page(&self, page: u32, cookies: Option<&str>) -> Result<Option<String>> {
        let url = format!("{}&page={page}", self.search_url());
        let mut body = self.get_text(&url, cookies).await?;

        if !is_clinic_page(&body) {
            info!(site = SITE, page, "Got waiting page");
            for _ in 0..WAITING_ROOM_RETRIES {
                tokio::time::sleep(self.waiting_room_delay).await;
                body = self.get_text(&url, cookies).await?;
                if is_clinic_page(&body) {
                    break;
                }
            }
        }

        if is_clinic_page(&body) {
            return Ok(Some(body));
        }

        let flattened = body.replace('\n', " ");
        match capture(&WAIT_ESTIMATE, &flattened) {
            Some(estimate) => info!(site = SITE, estimate = %estimate, "Waited too long"),
            None => info!(site = SITE, "Waited too long, no estimate found"),
        }
        Ok(None)
    }

    /// Every listing across all pages, before merging.
    async fn listings(&self, state: &StateStore) -> Result<Vec<MaClinic>> {
        let cookies = self.session(state).await?;
        let mut clinics = Vec::new();

        for page in 1..=MAX_PAGES {
            debug!(site = SITE, page, "Checking page");

            let body = match self.fetch_page(page, cookies.as_deref()).await {
                Ok(Some(body)) => body,
                Ok(None) => return Ok(clinics),
                Err(e) if page > 1 => {
                    warn!(site = SITE, page, error = %e, "Failed to get appointments");
                    return Ok(clinics);
                }
                Err(e) => return Err(e),
            };

            let parsed = parse_page(&body, &self.base_url);
            clinics.extend(parsed.clinics);
            if parsed.final_page {
                return Ok(clinics);
            }

            tokio::time::sleep(self.settings.jittered_delay()).await;
        }

        warn!(site = SITE, max_pages = MAX_PAGES, "Too many pages, stopping");
        Ok(clinics)
    }
}

#[async_trait]
impl Scraper for MaImmunizationsScraper {
    fn name(&self) -> &'static str {
        SITE
    }

    async fn all_clinics(&self, state: &StateStore) -> Result<Vec<Box<dyn Clinic>>> {
        let listings = self.listings(state).await?;
        Ok(merge_duplicates(listings)
            .into_iter()
            .map(|c| Box::new(c) as Box<dyn Clinic>)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../../../tests/fixtures/ma_immunizations.html");
    const WAITING: &str = include_str!("../../../../tests/fixtures/ma_immunizations_waiting.html");
    const REGGIE: &str =
        "Reggie Lewis State Track Athletic Ctr, Tremont Street, Boston, MA, USA on 03/01/2021";

    #[test]
    fn parses_complete_listings() {
        let page = parse_page(FIXTURE, MA_IMMUNIZATIONS_BASE_URL);
        assert!(page.final_page);
        assert_eq!(page.clinics.len(), 3);

        let first = &page.clinics[0];
        assert_eq!(first.title, REGGIE);
        assert_eq!(first.address, "1350 Tremont Street, Boston MA, 02120");
        assert_eq!(first.vaccine.as_deref(), Some("Moderna COVID-19 Vaccine"));
        assert_eq!(first.age_groups.as_deref(), Some("Adults"));
        assert_eq!(first.additional_info.as_deref(), Some("Bring your ID"));
        assert_eq!(first.appointments, 60);
        assert_eq!(
            first.link.as_deref(),
            Some("https://www.maimmunizations.org/client/registration?clinic_id=1001")
        );

        let second = &page.clinics[1];
        assert_eq!(second.appointments, 0);
        assert_eq!(second.link, None);
    }

    #[test]
    fn merges_duplicate_titles() {
        let clinics = merge_duplicates(parse_page(FIXTURE, MA_IMMUNIZATIONS_BASE_URL).clinics);
        assert_eq!(clinics.len(), 2);
        assert_eq!(clinics[0].title, REGGIE);
        assert_eq!(clinics[0].appointments, 100);
        assert_eq!(
            clinics[0].link.as_deref(),
            Some("https://www.maimmunizations.org/client/registration?clinic_id=1001")
        );
    }

    #[test]
    fn sign_up_page_searches_by_name() {
        let clinics = merge_duplicates(parse_page(FIXTURE, MA_IMMUNIZATIONS_BASE_URL).clinics);
        assert_eq!(
            clinics[0].notification_text().into_messages(),
            vec!["100 appointments available at Reggie Lewis State Track Athletic Ctr, Tremont Street, Boston, MA, USA on 03/01/2021. Check eligibility and sign up at https://www.maimmunizations.org/clinic/search?q[venue_search_name_or_venue_name_i_cont]=Reggie%20Lewis%20State%20Track%20Athletic%20Ctr,%20Tremont%20Street,%20Boston,%20MA,%20USA&"]
        );
    }

    #[test]
    fn untitled_dates_fall_back_to_plain_search() {
        let clinic = MaClinic {
            title: "Pop-up site".into(),
            address: String::new(),
            vaccine: None,
            age_groups: None,
            additional_info: None,
            appointments: 1,
            link: None,
        };
        assert_eq!(
            clinic.sign_up_page().as_deref(),
            Some("https://www.maimmunizations.org/clinic/search?")
        );
    }

    #[test]
    fn detects_waiting_room() {
        assert!(is_clinic_page(FIXTURE));
        assert!(!is_clinic_page(WAITING));
        assert_eq!(
            capture(&WAIT_ESTIMATE, &WAITING.replace('\n', " ")).as_deref(),
            Some("12 minutes")
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        assert_eq!(
            resolve_link(MA_IMMUNIZATIONS_BASE_URL, "https://other.example/signup?id=3").as_deref(),
            Some("https://other.example/signup?id=3")
        );
        assert_eq!(
            resolve_link("http://127.0.0.1:1234", "/client/registration?clinic_id=1").as_deref(),
            Some("http://127.0.0.1:1234/client/registration?clinic_id=1")
        );
    }

    #[test]
    fn page_with_next_link_is_not_final() {
        let html = FIXTURE.replace("page next disabled", "page next");
        assert!(!parse_page(&html, MA_IMMUNIZATIONS_BASE_URL).final_page);
    }

    #[test]
    fn missing_container_yields_nothing() {
        let page = parse_page("<html><body><p>Find a Vaccination Clinic</p></body></html>", "");
        assert!(page.clinics.is_empty());
        assert!(page.final_page);
    }

    #[test]
    fn cooldown_is_ten_minutes() {
        let clinics = merge_duplicates(parse_page(FIXTURE, MA_IMMUNIZATIONS_BASE_URL).clinics);
        let thresholds = clinics[0].thresholds(&ThresholdTable::default());
        assert_eq!(thresholds.cooldown, Duration::from_secs(600));
        assert_eq!(thresholds.min_absolute, NotificationThresholds::CLINIC.min_absolute);
    }

    #[test]
    fn chat_block_includes_details() {
        let clinics = merge_duplicates(parse_page(FIXTURE, MA_IMMUNIZATIONS_BASE_URL).clinics);
        let block = clinics[0].chat_block(100);
        let text = block["text"]["text"].as_str().unwrap();
        assert!(text.starts_with(&format!("*{REGGIE}*\n*Address:* 1350 Tremont Street")));
        assert!(text.contains("*Available appointments:* :siren: 100 (100 new) :siren:"));
        assert!(text.contains("*Vaccine:* Moderna COVID-19 Vaccine"));
    }
}
