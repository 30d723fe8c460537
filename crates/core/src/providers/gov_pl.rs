//! Discovery of the retail bond dataset published on gov.pl.
//!
//! The finance ministry page lists the dataset as a spreadsheet link with the
//! publication date written next to it, either as `2024-01-05`, `05.01.2024`
//! or `5 stycznia 2024`.

use async_trait::async_trait;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::dataset::{DatasetError, DatasetInfo, DatasetInfoProvider};
use crate::errors::Result;

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
    static ref DOTTED_DATE: Regex = Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap();
    static ref WORDED_DATE: Regex =
        Regex::new(r"(?i)(\d{1,2})\s+([a-ząćęłńóśźż]+)\s+(\d{4})").unwrap();
}

/// Reads the newest dataset link from the gov.pl retail bond page.
pub struct GovPlDatasetInfoProvider {
    client: reqwest::Client,
    page_url: Url,
}

impl GovPlDatasetInfoProvider {
    pub fn new(page_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), page_url)
    }

    pub fn with_client(client: reqwest::Client, page_url: &str) -> Result<Self> {
        let page_url = Url::parse(page_url).map_err(|e| {
            DatasetError::Discovery(format!("Invalid dataset page URL '{}': {}", page_url, e))
        })?;
        Ok(Self { client, page_url })
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    async fn fetch_page(&self) -> Result<String> {
        let response = self
            .client
            .get(self.page_url.clone())
            .send()
            .await
            .map_err(|e| DatasetError::Discovery(format!("Failed to fetch {}: {}", self.page_url, e)))?;

        if !response.status().is_success() {
            return Err(DatasetError::Discovery(format!(
                "Dataset page {} returned {}",
                self.page_url,
                response.status()
            ))
            .into());
        }

        let body = response.text().await.map_err(|e| {
            DatasetError::Discovery(format!("Failed to read {}: {}", self.page_url, e))
        })?;
        Ok(body)
    }
}

#[async_trait]
impl DatasetInfoProvider for GovPlDatasetInfoProvider {
    async fn get_latest(&self) -> Result<DatasetInfo> {
        log::debug!("Fetching dataset page {}", self.page_url);
        let html = self.fetch_page().await?;
        parse_dataset_page(&html, &self.page_url)
    }
}

/// Extracts the first spreadsheet link and its publication date from the page.
pub fn parse_dataset_page(html: &str, base: &Url) -> Result<DatasetInfo> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]")
        .map_err(|e| DatasetError::Internal(format!("Bad selector: {}", e)))?;

    let anchor = document
        .select(&anchors)
        .find(|a| a.value().attr("href").is_some_and(is_spreadsheet_link))
        .ok_or_else(|| DatasetError::Discovery("No dataset link on the page".to_string()))?;

    // Presence checked by the selector.
    let href = anchor.value().attr("href").unwrap_or_default();
    let file_url = base
        .join(href)
        .map_err(|e| DatasetError::Discovery(format!("Invalid dataset link '{}': {}", href, e)))?;

    let data_date = element_text(anchor)
        .as_deref()
        .and_then(find_date)
        .or_else(|| {
            anchor
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(element_text)
                .as_deref()
                .and_then(find_date)
        })
        .ok_or_else(|| {
            DatasetError::Discovery(format!("No publication date next to {}", file_url))
        })?;

    Ok(DatasetInfo::new(data_date, file_url.to_string()))
}

fn is_spreadsheet_link(href: &str) -> bool {
    let path = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    path.ends_with(".xls") || path.ends_with(".xlsx")
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First date found in `text`, in any of the formats used on the page.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    if let Some(c) = ISO_DATE.captures(text) {
        if let Some(date) = ymd(&c[1], &c[2], &c[3]) {
            return Some(date);
        }
    }
    if let Some(c) = DOTTED_DATE.captures(text) {
        if let Some(date) = ymd(&c[3], &c[2], &c[1]) {
            return Some(date);
        }
    }
    WORDED_DATE.captures_iter(text).find_map(|c| {
        let month = polish_month(&c[2])?;
        let day = c[1].parse().ok()?;
        let year = c[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Month number for a Polish month name, nominative or genitive.
fn polish_month(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    let month = match word.as_str() {
        "styczeń" | "styczen" | "stycznia" => 1,
        "luty" | "lutego" => 2,
        "marzec" | "marca" => 3,
        "kwiecień" | "kwiecien" | "kwietnia" => 4,
        "maj" | "maja" => 5,
        "czerwiec" | "czerwca" => 6,
        "lipiec" | "lipca" => 7,
        "sierpień" | "sierpien" | "sierpnia" => 8,
        "wrzesień" | "wrzesien" | "września" | "wrzesnia" => 9,
        "październik" | "pazdziernik" | "października" | "pazdziernika" => 10,
        "listopad" | "listopada" => 11,
        "grudzień" | "grudzien" | "grudnia" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn base() -> Url {
        Url::parse("https://www.gov.pl/web/finanse/dane-dotyczace-obligacji-detalicznych").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_relative_link_and_date_in_anchor() {
        let html = r#"
            <html><body>
              <a href="/web/finanse/kontakt">Kontakt</a>
              <a href="/attachment/abc/Dane_dotyczace_obligacji_detalicznych.xls">
                Dane dotyczące obligacji detalicznych (stan na 2024-01-05)
              </a>
              <a href="/attachment/old.xls">Archiwum 2023-12-01</a>
            </body></html>
        "#;

        let info = parse_dataset_page(html, &base()).unwrap();

        assert_eq!(info.data_date, date(2024, 1, 5));
        assert_eq!(
            info.file_url,
            "https://www.gov.pl/attachment/abc/Dane_dotyczace_obligacji_detalicznych.xls"
        );
    }

    #[test]
    fn test_date_falls_back_to_parent_element() {
        let html = r#"
            <ul>
              <li>
                <span>Aktualizacja: 31.01.2024</span>
                <a href="https://cdn.example.com/data.xlsx?v=3">Pobierz plik</a>
              </li>
            </ul>
        "#;

        let info = parse_dataset_page(html, &base()).unwrap();

        assert_eq!(info.data_date, date(2024, 1, 31));
        assert_eq!(info.file_url, "https://cdn.example.com/data.xlsx?v=3");
    }

    #[test]
    fn test_polish_month_names() {
        assert_eq!(find_date("stan na 5 lutego 2024 r."), Some(date(2024, 2, 5)));
        assert_eq!(find_date("12 Października 2023"), Some(date(2023, 10, 12)));
        assert_eq!(find_date("opublikowano 3 maja"), None);
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        assert_eq!(find_date("2024-13-40"), None);
        assert_eq!(find_date("2024-13-40 or 01.02.2024"), Some(date(2024, 2, 1)));
    }

    #[test]
    fn test_missing_link_is_discovery_error() {
        let html = r#"<a href="/report.pdf">Raport 2024-01-01</a>"#;
        let err = parse_dataset_page(html, &base()).unwrap_err();
        assert!(matches!(err, Error::Dataset(DatasetError::Discovery(_))));
    }

    #[test]
    fn test_missing_date_is_discovery_error() {
        let html = r#"<div><a href="/data.xls">Dane</a></div>"#;
        let err = parse_dataset_page(html, &base()).unwrap_err();
        assert!(matches!(err, Error::Dataset(DatasetError::Discovery(_))));
    }

    #[test]
    fn test_rejects_invalid_page_url() {
        assert!(GovPlDatasetInfoProvider::new("not a url").is_err());
    }
}
