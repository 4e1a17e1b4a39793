use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

// Site-wide error box, shown instead of the regular content.
selector!(PAGE_ERROR_SELECTOR, "div.perror");
selector!(PARAGRAPH_SELECTOR, "p");

// Metadata page.
selector!(DEPENDENCY_REGION_SELECTOR, "div#pdeps");
selector!(LIST_ITEM_SELECTOR, "li");
selector!(DEFINITION_LIST_SELECTOR, "dl");
selector!(DEFINITION_TERM_SELECTOR, "dt");
selector!(DOWNLOAD_REGION_SELECTOR, "div#pdownload");
selector!(ANCHOR_SELECTOR, "a");

// Architecture page.
selector!(FILENAME_SELECTOR, "kbd");
selector!(MIRROR_ITEM_SELECTOR, "div#content ul li");

/// Label of the architecture-independent download link.
pub(crate) const ARCH_INDEPENDENT: &str = "all";
