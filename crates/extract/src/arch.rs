//! Architecture-specific download page.

use exn::OptionExt;
use scraper::Html;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::MirrorMap;
use crate::{consts, text_of};

/// A parsed architecture download page, listing the artifact file name and
/// the mirrors that serve it.
#[derive(Debug)]
pub struct ArchPage {
    document: Html,
}
impl ArchPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Message of the site-reported error region, if present.
    pub fn error_message(&self) -> Option<String> {
        crate::page_error(&self.document)
    }

    /// Canonical file name of the artifact, taken from the first `kbd` element.
    pub fn filename(&self) -> Result<String> {
        self.document
            .select(&consts::FILENAME_SELECTOR)
            .next()
            .map(|kbd| text_of(&kbd))
            .filter(|name| !name.is_empty())
            .ok_or_raise(|| ErrorKind::MissingField("filename"))
    }

    /// Every mirror listed in the content region, in document order.
    ///
    /// List items without a linked anchor are skipped.
    #[instrument(level = "trace", skip(self))]
    pub fn mirrors(&self) -> MirrorMap {
        let mut mirrors = MirrorMap::new();
        for item in self.document.select(&consts::MIRROR_ITEM_SELECTOR) {
            let Some(anchor) = item.select(&consts::ANCHOR_SELECTOR).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href").map(str::trim).filter(|href| !href.is_empty()) else {
                continue;
            };
            mirrors.insert(text_of(&anchor), href);
        }
        mirrors
    }
}
