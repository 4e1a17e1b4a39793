//! Package metadata page (`{base}/{distribution}/{name}`).

use exn::OptionExt;
use scraper::{ElementRef, Html};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::{Dependencies, Relation, RelationFilter, Unavailable};
use crate::{consts, text_of};

/// A parsed package metadata page.
#[derive(Debug)]
pub struct MetadataPage {
    document: Html,
}
impl MetadataPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Message of the site-reported error region, if present.
    pub fn error_message(&self) -> Option<String> {
        crate::page_error(&self.document)
    }

    /// Collects the packages this page depends on.
    ///
    /// Required dependencies are always collected; recommendations and
    /// suggestions only when the filter includes them. A page without a
    /// dependency region has no dependencies.
    #[instrument(level = "trace", skip(self))]
    pub fn dependencies(&self, filter: RelationFilter) -> Dependencies {
        let mut dependencies = Dependencies::default();
        let Some(region) = self.document.select(&consts::DEPENDENCY_REGION_SELECTOR).next() else {
            return dependencies;
        };
        for relation in Relation::ALL.into_iter().filter(|relation| filter.includes(*relation)) {
            let Some(list) = Self::relation_list(&region, relation) else {
                continue;
            };
            // Items are matched at any depth: the site omits closing `</li>`
            // tags and parsers disagree on how to nest them.
            for item in list.select(&consts::LIST_ITEM_SELECTOR) {
                let Some(term) = item
                    .select(&consts::DEFINITION_LIST_SELECTOR)
                    .next()
                    .and_then(|dl| dl.select(&consts::DEFINITION_TERM_SELECTOR).next())
                else {
                    continue;
                };
                match term.select(&consts::ANCHOR_SELECTOR).next() {
                    Some(anchor) => {
                        let name = text_of(&anchor);
                        if !name.is_empty() {
                            dependencies.names.insert(name);
                        }
                    },
                    None => dependencies.unavailable.push(Unavailable {
                        relation,
                        label: text_of(&term),
                    }),
                }
            }
        }
        dependencies
    }

    /// Finds the architecture page link for this package.
    ///
    /// Returns `Ok(None)` when the page has no download region at all, meaning
    /// the package has nothing to download. An architecture-independent
    /// (`all`) link is preferred over the requested architecture.
    ///
    /// # Errors
    ///
    /// - [`MissingArchitecture`](ErrorKind::MissingArchitecture) if neither
    ///   link exists,
    /// - [`MissingLink`](ErrorKind::MissingLink) if the chosen link has no
    ///   `href`.
    #[instrument(level = "trace", skip(self))]
    pub fn architecture_link(&self, architecture: &str) -> Result<Option<String>> {
        let Some(region) = self.document.select(&consts::DOWNLOAD_REGION_SELECTOR).next() else {
            return Ok(None);
        };
        let find = |label: &str| region.select(&consts::ANCHOR_SELECTOR).find(|anchor| text_of(anchor) == label);
        let anchor = find(consts::ARCH_INDEPENDENT)
            .or_else(|| find(architecture))
            .ok_or_raise(|| ErrorKind::MissingArchitecture(architecture.to_string()))?;
        let href = anchor
            .value()
            .attr("href")
            .filter(|href| !href.trim().is_empty())
            .ok_or_raise(|| ErrorKind::MissingLink(text_of(&anchor)))?;
        Ok(Some(href.trim().to_string()))
    }

    /// Direct child `ul` of the dependency region carrying the relation's class.
    fn relation_list<'a>(region: &ElementRef<'a>, relation: Relation) -> Option<ElementRef<'a>> {
        region.children().filter_map(ElementRef::wrap).find(|child| {
            child.value().name() == "ul" && child.value().classes().any(|class| class == relation.list_class())
        })
    }
}
