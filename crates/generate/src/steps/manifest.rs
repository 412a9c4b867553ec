use super::Step;
use crate::consts::{APPLICATION_TAG_REGEX, ASSET_PACK_META_DATA, ASSET_PACK_META_DATA_REGEX, ELEMENT_TAG_REGEX};
use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::{ErrorKind, Result};
use exn::OptionExt;

/// Registers the pack name with the platform through an application-level
/// `<meta-data>` entry.
pub struct ManifestStep;
impl Step for ManifestStep {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn apply(&self, mut document: ConfigDocument, descriptor: &ProjectDescriptor) -> Result<ConfigDocument> {
        let manifest = &document.manifest;
        let application = APPLICATION_TAG_REGEX.captures(manifest).ok_or_raise(|| ErrorKind::Manifest)?;
        let tag = application.get(0).ok_or_raise(|| ErrorKind::Manifest)?;
        let self_closing = application.get(1).is_some_and(|m| !m.as_str().is_empty());
        let close = match self_closing {
            true => None,
            false => {
                let offset = manifest[tag.end()..].find("</application>").ok_or_raise(|| ErrorKind::Manifest)?;
                Some(tag.end() + offset)
            },
        };
        if close.is_some_and(|close| has_direct_child(&manifest[tag.end()..close])) {
            tracing::debug!("Asset pack meta-data already present");
            return Ok(document);
        }

        let indent = line_indent(manifest, tag.start());
        let entry = format!(
            r#"<meta-data android:name="{ASSET_PACK_META_DATA}" android:value="{}"/>"#,
            descriptor.pack_name()
        );
        let patched = match close {
            None => {
                let opening = format!("{}>", manifest[tag.start()..tag.end() - 2].trim_end());
                format!(
                    "{}{opening}\n{indent}  {entry}\n{indent}</application>{}",
                    &manifest[..tag.start()],
                    &manifest[tag.end()..]
                )
            },
            Some(close) => {
                let line_start = manifest[..close].rfind('\n').map_or(0, |i| i + 1);
                if manifest[line_start..close].trim().is_empty() {
                    // Closing tag on its own line: add the entry as the last child, one level deeper.
                    format!("{}{indent}  {entry}\n{}", &manifest[..line_start], &manifest[line_start..])
                } else {
                    format!("{}{entry}{}", &manifest[..close], &manifest[close..])
                }
            },
        };
        document.manifest = patched;
        tracing::info!(pack = descriptor.pack_name(), "Registered asset pack in application manifest");
        Ok(document)
    }
}

/// Whether `body`, the contents of the application element, has the asset
/// pack `<meta-data>` as a direct child.
fn has_direct_child(body: &str) -> bool {
    ASSET_PACK_META_DATA_REGEX.find_iter(body).any(|found| {
        let depth = ELEMENT_TAG_REGEX.captures_iter(&body[..found.start()]).fold(0isize, |depth, tag| {
            let flag = |group| tag.get(group).is_some_and(|m| !m.as_str().is_empty());
            match (flag(1), flag(2)) {
                (true, _) => depth - 1,
                (false, true) => depth,
                (false, false) => depth + 1,
            }
        });
        depth == 0
    })
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(text: &str, at: usize) -> &str {
    let start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[start..];
    &line[..line.len() - line.trim_start().len()]
}
