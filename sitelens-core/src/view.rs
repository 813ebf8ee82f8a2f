// Pure render contract: what an analyzer snapshot looks like on screen

use crate::analyzer::AnalyzerState;
use crate::card::{CardProps, NOT_AVAILABLE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sitelens_fetch::SiteMetadata;
use sitelens_fetch::descriptor::display_text;
use url::Url;

pub const UNTITLED_SITE: &str = "Untitled Site";
pub const NO_SITE_DESCRIPTION: &str = "No description available.";
pub const ERROR_NOTICE: &str = "Error fetching or processing the site.json.";
pub const NO_RESULTS: &str = "No results found.";
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub name: String,
    pub description: String,
    pub theme: String,
    pub created: String,
    pub updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cards", rename_all = "snake_case")]
pub enum ItemsView {
    Empty,
    Cards(Vec<CardProps>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerView {
    pub loading: bool,
    pub error: bool,
    pub overview: Option<Overview>,
    pub items: ItemsView,
}

impl Overview {
    pub fn from_metadata(metadata: &SiteMetadata) -> Self {
        Self {
            name: metadata
                .text("name")
                .unwrap_or_else(|| UNTITLED_SITE.to_string()),
            description: metadata
                .text("description")
                .unwrap_or_else(|| NO_SITE_DESCRIPTION.to_string()),
            theme: metadata
                .text("theme")
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            created: metadata
                .get("created")
                .and_then(timestamp_text)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            updated: metadata
                .get("updated")
                .and_then(timestamp_text)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl AnalyzerView {
    pub fn build(state: &AnalyzerState, base_url: &Url) -> Self {
        // The overview is replaced by the loading indicator while fetching
        let overview = if state.loading {
            None
        } else {
            state.metadata.as_ref().map(Overview::from_metadata)
        };

        let items = if state.items.is_empty() {
            ItemsView::Empty
        } else {
            ItemsView::Cards(
                state
                    .items
                    .iter()
                    .map(|item| CardProps::from_item(item, base_url))
                    .collect(),
            )
        };

        Self {
            loading: state.loading,
            error: state.error,
            overview,
            items,
        }
    }

    pub fn error_notice(&self) -> Option<&'static str> {
        self.error.then_some(ERROR_NOTICE)
    }

    pub fn cards(&self) -> &[CardProps] {
        match &self.items {
            ItemsView::Empty => &[],
            ItemsView::Cards(cards) => cards,
        }
    }
}

/// Display text for a timestamp-ish field.
///
/// Integers are taken as Unix seconds; anything else displays as-is.
pub fn timestamp_text(value: &Value) -> Option<String> {
    if let Some(secs) = value.as_i64()
        && secs != 0
        && let Some(datetime) = DateTime::<Utc>::from_timestamp(secs, 0)
    {
        return Some(datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    }
    display_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sitelens_fetch::{ContentItem, SiteDescriptor};

    fn base() -> Url {
        Url::parse("https://haxtheweb.org/").unwrap()
    }

    fn state_from(value: Value) -> AnalyzerState {
        let descriptor = SiteDescriptor::from_value(value).unwrap();
        AnalyzerState {
            metadata: Some(descriptor.metadata),
            items: descriptor.items,
            ..AnalyzerState::default()
        }
    }

    #[test]
    fn test_initial_state_shows_no_results() {
        let view = AnalyzerView::build(&AnalyzerState::default(), &base());
        assert!(view.overview.is_none());
        assert_eq!(view.items, ItemsView::Empty);
        assert_eq!(view.error_notice(), None);
    }

    #[test]
    fn test_loading_hides_overview() {
        let mut state = state_from(json!({"metadata": {"name": "A"}, "items": []}));
        state.loading = true;
        let view = AnalyzerView::build(&state, &base());
        assert!(view.loading);
        assert!(view.overview.is_none());
    }

    #[test]
    fn test_overview_defaults_for_empty_metadata() {
        let state = state_from(json!({"metadata": {}, "items": []}));
        let overview = AnalyzerView::build(&state, &base()).overview.unwrap();
        assert_eq!(overview.name, "Untitled Site");
        assert_eq!(overview.description, "No description available.");
        assert_eq!(overview.theme, "N/A");
        assert_eq!(overview.created, "N/A");
        assert_eq!(overview.updated, "N/A");
    }

    #[test]
    fn test_overview_fields() {
        let state = state_from(json!({
            "metadata": {
                "name": "HAX",
                "description": "Docs",
                "theme": "clean-one",
                "created": 1700000000,
                "updated": "yesterday"
            },
            "items": []
        }));
        let overview = AnalyzerView::build(&state, &base()).overview.unwrap();
        assert_eq!(overview.name, "HAX");
        assert_eq!(overview.description, "Docs");
        assert_eq!(overview.theme, "clean-one");
        assert_eq!(overview.created, "2023-11-14 22:13:20 UTC");
        assert_eq!(overview.updated, "yesterday");
    }

    #[test]
    fn test_error_coexists_with_items() {
        let mut state = AnalyzerState {
            items: vec![ContentItem::new(json!({"title": "kept"}))],
            ..AnalyzerState::default()
        };
        state.error = true;
        let view = AnalyzerView::build(&state, &base());
        assert_eq!(view.error_notice(), Some(ERROR_NOTICE));
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].title, "kept");
    }

    #[test]
    fn test_cards_preserve_item_order() {
        let state = state_from(json!({
            "metadata": {},
            "items": [{"title": "first"}, {"title": "second"}, {"title": "third"}]
        }));
        let view = AnalyzerView::build(&state, &base());
        let titles: Vec<&str> = view.cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
