use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Manifest `<meta-data>` name the platform reads the pack name from.
pub const ASSET_PACK_META_DATA: &str = "com.android.vending.asset-pack";

pub(crate) const ASSET_PACKS_TAG: &str = "fbt-asset-pack-assetpacks";
pub(crate) const DEPENDENCY_TAG: &str = "fbt-asset-pack-dependency";

// Gradle accepts both `namespace 'x'` (Groovy) and `namespace = "x"` (Kotlin DSL).
regex!(NAMESPACE_REGEX, r#"(?m)^\s*namespace\s*=?\s*["']([^"']+)["']"#);
regex!(APPLICATION_ID_REGEX, r#"(?m)^\s*applicationId\s*=?\s*["']([^"']+)["']"#);
regex!(APPLICATION_TAG_REGEX, r"<application\b[^>]*?(/?)>");
regex!(
    ASSET_PACK_META_DATA_REGEX,
    &format!(r#"<meta-data\b[^>]*\bandroid:name\s*=\s*["']{}["']"#, regex::escape(ASSET_PACK_META_DATA))
);
// Opening, closing and self-closing element tags.
regex!(ELEMENT_TAG_REGEX, r"<(/?)[A-Za-z][^>]*?(/?)>");
