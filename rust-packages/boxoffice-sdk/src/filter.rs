use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    #[default]
    Any,
    Today,
    Tomorrow,
    Weekend,
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" => Ok(DateWindow::Any),
            "today" => Ok(DateWindow::Today),
            "tomorrow" => Ok(DateWindow::Tomorrow),
            "weekend" => Ok(DateWindow::Weekend),
            other => Err(format!("unknown date window: {}", other)),
        }
    }
}

impl DateWindow {
    fn contains(&self, start: Option<NaiveDate>, today: NaiveDate) -> bool {
        match self {
            DateWindow::Any => true,
            DateWindow::Today => start == Some(today),
            DateWindow::Tomorrow => start.is_some() && start == today.checked_add_days(Days::new(1)),
            DateWindow::Weekend => {
                matches!(start.map(|d| d.weekday()), Some(Weekday::Sat | Weekday::Sun))
            }
        }
    }
}

/// Search filters from the public events page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub query: Option<String>,
    pub city: Option<String>,
    pub categories: Vec<String>,
    pub max_price: Option<u64>,
    pub date: DateWindow,
}

impl CatalogFilter {
    /// Build from decoded search parameters (`q`, `city`, `cats`, `maxPrice`, `date`).
    /// Unknown keys and unparsable values are ignored.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = CatalogFilter::default();
        for (key, value) in params {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "q" => filter.query = non_empty(value),
                "city" => filter.city = non_empty(value),
                "cats" => {
                    filter.categories = value
                        .split(',')
                        .map(|c| c.trim().to_lowercase())
                        .filter(|c| !c.is_empty())
                        .collect()
                }
                "maxPrice" => filter.max_price = value.parse().ok().filter(|&p| p > 0),
                "date" => {
                    filter.date = value.parse().unwrap_or_else(|err| {
                        debug!(%err, "ignoring date filter");
                        DateWindow::Any
                    })
                }
                _ => {}
            }
        }
        filter
    }

    pub fn matches(&self, event: &Event, today: NaiveDate) -> bool {
        let location = event.venue_name.as_deref().unwrap_or_default().to_lowercase();

        let match_query = self.query.as_ref().map_or(true, |q| {
            let q = q.to_lowercase();
            event.title.to_lowercase().contains(&q)
                || event.description.as_deref().unwrap_or_default().to_lowercase().contains(&q)
                || location.contains(&q)
        });

        let match_city = self
            .city
            .as_ref()
            .map_or(true, |city| location.contains(&city.to_lowercase()));

        let match_cats = self.categories.is_empty() || {
            let event_cats = event.category_ids();
            self.categories.iter().any(|c| event_cats.contains(&c.to_lowercase()))
        };

        let match_price = self
            .max_price
            .map_or(true, |max| event.price_from.unwrap_or(0) <= max);

        let match_date = self.date.contains(start_day(event), today);

        match_query && match_city && match_cats && match_price && match_date
    }

    pub fn apply<'a>(&self, events: &'a [Event], today: NaiveDate) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e, today)).collect()
    }
}

/// Category chip filter. `None` or `"all"` keeps everything.
pub fn filter_by_category<'a>(events: &'a [Event], category: Option<&str>) -> Vec<&'a Event> {
    match category.map(str::to_lowercase) {
        None => events.iter().collect(),
        Some(c) if c == "all" => events.iter().collect(),
        Some(c) => events.iter().filter(|e| e.category_ids().contains(&c)).collect(),
    }
}

/// Calendar day the event starts on, in the event's own offset.
pub fn start_day(event: &Event) -> Option<NaiveDate> {
    let raw = event.start_date.as_deref()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
