//! Letterboxd scraper.
//!
//! Letterboxd has no public API, so each view is read from the site's
//! HTML. Paged views (following, followers, films) are walked from page 1
//! until a page comes back empty, missing, or `max_pages` is reached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{BackendError, Result};
use crate::types::{Film, Profile};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";

/// Configuration for the Letterboxd scraper.
#[derive(Debug, Clone)]
pub struct LetterboxdConfig {
    /// Site root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Upper bound on pages walked for one paged view.
    pub max_pages: u32,
}

impl Default for LetterboxdConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("lbcache/", env!("CARGO_PKG_VERSION")).to_string(),
            max_pages: 250,
        }
    }
}

impl LetterboxdConfig {
    /// Set the site root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the page limit for paged views.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// [`Backend`] that scrapes letterboxd.com.
#[derive(Debug, Clone)]
pub struct LetterboxdBackend {
    client: Client,
    config: LetterboxdConfig,
}

impl LetterboxdBackend {
    /// Create a scraper with the given configuration.
    pub fn new(config: LetterboxdConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the scraper configuration.
    pub fn config(&self) -> &LetterboxdConfig {
        &self.config
    }

    /// GET a page. `Ok(None)` means the site answered 404.
    async fn get_page(&self, path: &str) -> Result<Option<String>> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, "Fetching page");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            BackendError::Upstream(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            warn!(url = %url, status = %status, "Unexpected status");
            return Err(BackendError::Upstream(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Upstream(format!("reading {} failed: {}", url, e)))?;
        Ok(Some(body))
    }

    /// Walk `/{username}/{section}/page/{n}/` collecting items until a page
    /// is empty or missing.
    async fn collect_pages<T>(
        &self,
        username: &str,
        section: &str,
        parse: fn(&str) -> Vec<T>,
    ) -> Result<Vec<T>> {
        check_username(username)?;

        let mut items = Vec::new();
        for page in 1..=self.config.max_pages {
            let path = format!("/{}/{}/page/{}/", username, section, page);
            let Some(html) = self.get_page(&path).await? else {
                if page == 1 {
                    return Err(BackendError::NotFound(username.to_string()));
                }
                break;
            };

            let found = parse(&html);
            debug!(username = %username, section, page, count = found.len(), "Parsed page");
            if found.is_empty() {
                break;
            }
            items.extend(found);
        }

        Ok(items)
    }
}

#[async_trait]
impl Backend for LetterboxdBackend {
    fn name(&self) -> &str {
        "letterboxd"
    }

    async fn profile(&self, username: &str) -> Result<Profile> {
        check_username(username)?;

        let Some(html) = self.get_page(&format!("/{}/", username)).await? else {
            return Err(BackendError::NotFound(username.to_string()));
        };

        let url = format!("{}/{}/", self.config.base_url, username);
        parse_profile(&html, username, &url)
    }

    async fn following(&self, username: &str) -> Result<Vec<String>> {
        self.collect_pages(username, "following", parse_people).await
    }

    async fn followers(&self, username: &str) -> Result<Vec<String>> {
        self.collect_pages(username, "followers", parse_people).await
    }

    async fn watched_films(&self, username: &str) -> Result<Vec<Film>> {
        self.collect_pages(username, "films", parse_films).await
    }
}

/// Letterboxd usernames are ASCII alphanumerics plus `_` and `-`. Anything
/// else cannot exist upstream and must not be spliced into a URL path.
fn check_username(username: &str) -> Result<()> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(BackendError::NotFound(username.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    select_all(root, css).into_iter().next()
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn meta_content(root: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(root, css)
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `"1,234"` → `1234`.
fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// `/bob/` → `bob`.
fn username_from_href(href: &str) -> Option<String> {
    let name = href.trim_matches('/');
    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name.to_string())
    }
}

/// Parse a profile page into a schema-less attribute map.
fn parse_profile(html: &str, username: &str, url: &str) -> Result<Profile> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let display_name = select_first(root, ".profile-name .displayname, span.displayname")
        .map(text_of)
        .filter(|s| !s.is_empty())
        .or_else(|| meta_content(root, "meta[property='og:title']"));

    let Some(display_name) = display_name else {
        return Err(BackendError::Upstream(format!(
            "page for '{}' does not look like a profile",
            username
        )));
    };

    let mut profile = Map::new();
    profile.insert("username".into(), json!(username));
    profile.insert("url".into(), json!(url));
    profile.insert("display_name".into(), json!(display_name));

    if let Some(bio) = select_first(root, ".profile-bio, .bio")
        .map(text_of)
        .filter(|s| !s.is_empty())
    {
        profile.insert("bio".into(), json!(bio));
    }

    if let Some(location) =
        select_first(root, ".profile-metadata .metadatum.-location, .profile-location")
            .map(text_of)
            .filter(|s| !s.is_empty())
    {
        profile.insert("location".into(), json!(location));
    }

    let links: Vec<String> = select_all(root, ".profile-metadata a[href]")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();
    if let Some(website) = links.first() {
        profile.insert("website".into(), json!(website));
    }

    if let Some(avatar) = select_first(root, ".profile-avatar img, .avatar img")
        .and_then(|img| img.value().attr("src"))
    {
        profile.insert("avatar".into(), json!(avatar));
    }

    let mut stats = Map::new();
    for stat in select_all(root, ".profile-statistic") {
        let value = select_first(stat, ".value").map(text_of);
        let definition = select_first(stat, ".definition").map(text_of);
        if let (Some(value), Some(definition)) = (value, definition) {
            let name = definition.to_lowercase().replace([' ', '-'], "_");
            if let Some(count) = parse_count(&value) {
                stats.insert(name, json!(count));
            }
        }
    }
    profile.insert("stats".into(), Value::Object(stats));

    let favorites: Vec<Value> = select_all(root, "#favourites .poster-container, #favourites li")
        .into_iter()
        .filter_map(film_from_poster)
        .map(|film| json!(film))
        .collect();
    profile.insert("favorites".into(), Value::Array(dedup(favorites)));

    Ok(profile)
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Usernames listed on a following/followers page.
fn parse_people(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut people: Vec<String> = select_all(root, ".person-table .table-person a.name")
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .filter_map(username_from_href)
        .collect();

    if people.is_empty() {
        people = select_all(root, ".person-summary a.name")
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .filter_map(username_from_href)
            .collect();
    }

    dedup(people)
}

/// Films listed on a watched-films page.
fn parse_films(html: &str) -> Vec<Film> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    select_all(root, "li.poster-container, li.griditem")
        .into_iter()
        .filter_map(film_from_poster)
        .collect()
}

/// Pull `(title, slug)` out of a poster element. Older markup carries
/// `data-film-slug` and the title as the image alt text; newer markup uses
/// `data-item-slug` / `data-item-name`.
fn film_from_poster(container: ElementRef<'_>) -> Option<Film> {
    let poster = select_first(container, "[data-film-slug], [data-item-slug]")?;
    let attrs = poster.value();

    let slug = attrs
        .attr("data-film-slug")
        .or_else(|| attrs.attr("data-item-slug"))?
        .trim()
        .to_string();

    let title = attrs
        .attr("data-item-name")
        .or_else(|| attrs.attr("data-film-name"))
        .map(str::to_string)
        .or_else(|| {
            select_first(poster, "img")
                .and_then(|img| img.value().attr("alt"))
                .map(str::to_string)
        })?
        .trim()
        .to_string();

    if slug.is_empty() || title.is_empty() {
        return None;
    }
    Some(Film(title, slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_HTML: &str = r#"
        <html><head>
          <meta property="og:title" content="Alice’s profile">
        </head><body>
          <section class="profile-header">
            <div class="profile-avatar"><img src="https://img.example/alice.jpg" alt="Alice"></div>
            <div class="profile-name"><h1><span class="displayname">Alice Liddell</span></h1></div>
            <div class="profile-bio"><p>Watching   everything.</p></div>
            <div class="profile-metadata">
              <div class="metadatum -location"><span class="label">Oxford</span></div>
              <a class="metadatum" href="https://alice.example">alice.example</a>
            </div>
          </section>
          <div class="profile-stats">
            <h4 class="profile-statistic"><span class="value">1,234</span><span class="definition">Films</span></h4>
            <h4 class="profile-statistic"><span class="value">56</span><span class="definition">This year</span></h4>
            <h4 class="profile-statistic"><span class="value">12</span><span class="definition">Followers</span></h4>
          </div>
          <section id="favourites"><ul>
            <li class="poster-container"><div class="film-poster" data-film-slug="heat-1995"><img alt="Heat"></div></li>
            <li class="poster-container"><div class="film-poster" data-film-slug="ran"><img alt="Ran"></div></li>
          </ul></section>
        </body></html>
    "#;

    fn people_page(names: &[&str]) -> String {
        let rows: String = names
            .iter()
            .map(|n| {
                format!(
                    r#"<tr><td class="table-person"><div class="person-summary"><a class="name" href="/{}/">{}</a></div></td></tr>"#,
                    n, n
                )
            })
            .collect();
        format!(r#"<html><body><table class="person-table">{}</table></body></html>"#, rows)
    }

    fn films_page(films: &[(&str, &str)]) -> String {
        let items: String = films
            .iter()
            .map(|(title, slug)| {
                format!(
                    r#"<li class="poster-container"><div class="film-poster" data-film-slug="{}"><img alt="{}"></div></li>"#,
                    slug, title
                )
            })
            .collect();
        format!(r#"<html><body><ul class="poster-list">{}</ul></body></html>"#, items)
    }

    fn backend_for(server: &MockServer) -> LetterboxdBackend {
        LetterboxdBackend::new(LetterboxdConfig::default().with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_parse_profile_fields() {
        let profile =
            parse_profile(PROFILE_HTML, "alice", "https://letterboxd.com/alice/").unwrap();

        assert_eq!(profile["username"], json!("alice"));
        assert_eq!(profile["display_name"], json!("Alice Liddell"));
        assert_eq!(profile["bio"], json!("Watching everything."));
        assert_eq!(profile["location"], json!("Oxford"));
        assert_eq!(profile["website"], json!("https://alice.example"));
        assert_eq!(profile["avatar"], json!("https://img.example/alice.jpg"));
        assert_eq!(profile["stats"]["films"], json!(1234));
        assert_eq!(profile["stats"]["this_year"], json!(56));
        assert_eq!(profile["stats"]["followers"], json!(12));
        assert_eq!(
            profile["favorites"],
            json!([["Heat", "heat-1995"], ["Ran", "ran"]])
        );
    }

    #[test]
    fn test_parse_profile_rejects_unrelated_page() {
        let result = parse_profile("<html><body><p>Maintenance</p></body></html>", "alice", "u");
        assert!(matches!(result, Err(BackendError::Upstream(_))));
    }

    #[test]
    fn test_parse_people() {
        let html = people_page(&["bob", "carol", "bob"]);
        assert_eq!(parse_people(&html), vec!["bob".to_string(), "carol".to_string()]);
        assert!(parse_people("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_parse_films_old_and_new_markup() {
        let html = r#"<ul>
            <li class="poster-container"><div class="film-poster" data-film-slug="heat-1995"><img alt="Heat"></div></li>
            <li class="griditem"><div class="react-component" data-item-slug="ran" data-item-name="Ran"></div></li>
            <li class="poster-container"><div class="film-poster"><img alt="No slug"></div></li>
        </ul>"#;

        assert_eq!(
            parse_films(html),
            vec![Film::new("Heat", "heat-1995"), Film::new("Ran", "ran")]
        );
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("—"), None);
    }

    #[test]
    fn test_check_username() {
        assert!(check_username("alice_99").is_ok());
        assert!(check_username("").is_err());
        assert!(check_username("../admin").is_err());
        assert!(check_username("a/b").is_err());
        assert!(check_username("a b").is_err());
    }

    #[tokio::test]
    async fn test_profile_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alice/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_HTML))
            .mount(&server)
            .await;

        let profile = backend_for(&server).profile("alice").await.unwrap();
        assert_eq!(profile["display_name"], json!("Alice Liddell"));
        assert_eq!(profile["url"], json!(format!("{}/alice/", server.uri())));
    }

    #[tokio::test]
    async fn test_profile_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ghost/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = backend_for(&server).profile("ghost").await;
        assert_eq!(result, Err(BackendError::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        assert!(matches!(backend.profile("alice").await, Err(BackendError::Upstream(_))));
        assert!(matches!(backend.following("alice").await, Err(BackendError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_following_walks_pages_until_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alice/following/page/1/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(people_page(&["bob", "carol"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alice/following/page/2/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(people_page(&["dave"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alice/following/page/3/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(people_page(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let following = backend_for(&server).following("alice").await.unwrap();
        assert_eq!(following, vec!["bob", "carol", "dave"]);
    }

    #[tokio::test]
    async fn test_followers_missing_user_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = backend_for(&server).followers("ghost").await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_watched_films_stops_at_missing_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alice/films/page/1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(films_page(&[("Heat", "heat-1995"), ("Ran", "ran")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/alice/films/page/2/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let films = backend_for(&server).watched_films("alice").await.unwrap();
        assert_eq!(films, vec![Film::new("Heat", "heat-1995"), Film::new("Ran", "ran")]);
    }

    #[tokio::test]
    async fn test_max_pages_caps_the_walk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(people_page(&["bob"])))
            .expect(2)
            .mount(&server)
            .await;

        let backend = LetterboxdBackend::new(
            LetterboxdConfig::default()
                .with_base_url(server.uri())
                .with_max_pages(2),
        )
        .unwrap();

        let followers = backend.followers("alice").await.unwrap();
        assert_eq!(followers, vec!["bob", "bob"]);
    }

    #[tokio::test]
    async fn test_invalid_username_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = backend_for(&server).profile("../etc").await;
        assert!(matches!(result, Err(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream() {
        let backend = LetterboxdBackend::new(
            LetterboxdConfig::default()
                .with_base_url("http://127.0.0.1:1")
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let result = backend.watched_films("alice").await;
        assert!(matches!(result, Err(BackendError::Upstream(_))));
    }
}
