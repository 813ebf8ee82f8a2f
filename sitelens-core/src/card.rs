// Card model: the display record for one content item plus its two link actions

use crate::view::timestamp_text;
use serde::Serialize;
use sitelens_fetch::ContentItem;
use std::io;
use tracing::{debug, warn};
use url::Url;

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_IMAGE: &str = "No Image";

/// Flat record a card renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardProps {
    pub title: String,
    pub description: String,
    /// Empty when the item has no image.
    pub image: String,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// What goes in the card's image slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardImage<'a> {
    Image(&'a str),
    Placeholder,
}

impl CardImage<'_> {
    pub fn placeholder_text(&self) -> Option<&'static str> {
        match self {
            CardImage::Image(_) => None,
            CardImage::Placeholder => Some(NO_IMAGE),
        }
    }
}

impl CardProps {
    /// Map an item to card fields, resolving its links against `base`.
    pub fn from_item(item: &ContentItem, base: &Url) -> Self {
        Self {
            title: item.text("title").unwrap_or_else(|| UNTITLED.to_string()),
            description: item
                .text("description")
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            image: item.text("image").unwrap_or_default(),
            last_updated: item
                .get("updated")
                .and_then(timestamp_text)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            content_url: item
                .text("url")
                .and_then(|raw| resolve_link(&raw, base)),
            source_url: item
                .text("sourceUrl")
                .and_then(|raw| resolve_link(&raw, base)),
        }
    }

    pub fn image(&self) -> CardImage<'_> {
        if self.image.is_empty() {
            CardImage::Placeholder
        } else {
            CardImage::Image(&self.image)
        }
    }
}

/// Resolve a possibly relative link against `base`.
///
/// Absolute links pass through. Links that cannot be resolved yield `None`.
pub fn resolve_link(raw: &str, base: &Url) -> Option<String> {
    match base.join(raw) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            warn!("Could not resolve link '{}' against {}: {}", raw, base, e);
            None
        }
    }
}

/// Capability to open a URL in a new browsing context.
pub trait UrlOpener {
    fn open_url(&self, url: &str) -> io::Result<()>;
}

/// Opens links with the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> io::Result<()> {
        debug!("Opening {}", url);
        open::that_detached(url)
    }
}

pub struct Card<'a> {
    props: &'a CardProps,
}

impl<'a> Card<'a> {
    pub fn new(props: &'a CardProps) -> Self {
        Self { props }
    }

    pub fn props(&self) -> &CardProps {
        self.props
    }

    /// Open the content link. No-op returning `Ok(false)` when there is none.
    pub fn open_content(&self, opener: &dyn UrlOpener) -> io::Result<bool> {
        Self::open_optional(self.props.content_url.as_deref(), opener)
    }

    /// Open the source link. No-op returning `Ok(false)` when there is none.
    pub fn open_source(&self, opener: &dyn UrlOpener) -> io::Result<bool> {
        Self::open_optional(self.props.source_url.as_deref(), opener)
    }

    fn open_optional(url: Option<&str>, opener: &dyn UrlOpener) -> io::Result<bool> {
        match url {
            Some(url) if !url.is_empty() => {
                opener.open_url(url)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
