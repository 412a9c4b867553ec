//! Tagged insertion of generated lines into hand-maintained scripts.
//!
//! A merged block looks like this:
//!
//! ```text
//! android {
//! // @generated begin fbt-asset-pack-assetpacks - assetpack (DO NOT MODIFY) sync-<crc32 of the block>
//!     assetPacks = [":fbtvideos"]
//! // @generated end fbt-asset-pack-assetpacks
//!     ndkVersion rootProject.ext.ndkVersion
//! ```
//!
//! The header carries a hash of the block's contents. A block whose header
//! matches is left alone; a block with the same tag but a different hash is
//! removed and inserted again with the new contents.

use crate::error::{ErrorKind, Result};

/// Describes one block to merge into a document.
#[derive(Clone, Copy, Debug)]
pub struct Block<'a> {
    /// Identifies the block across runs. Must be unique within a document.
    pub tag: &'a str,
    /// Lines to insert, without the surrounding markers.
    pub contents: &'a str,
    /// Substring of the line the block is placed relative to.
    pub anchor: &'a str,
    /// Lines after the anchor line to insert at; `1` places the block
    /// directly below it.
    pub offset: usize,
    /// Line comment prefix of the target language.
    pub comment: &'a str,
}

#[derive(Debug)]
pub struct Merged {
    pub contents: String,
    /// The block was inserted.
    pub merged: bool,
    /// A stale block with the same tag was removed first.
    pub cleared: bool,
}

/// Merge `block` into `src`.
///
/// Fails with [`ErrorKind::AnchorNotFound`] if the block has to be inserted
/// and no line contains the anchor. A document with any CRLF line ending is
/// written back with CRLF throughout.
pub fn merge(src: &str, block: &Block<'_>) -> Result<Merged> {
    let header = header(block);
    if src.lines().any(|line| line == header) {
        return Ok(Merged { contents: src.to_string(), merged: false, cleared: false });
    }

    let footer = format!("{} @generated end {}", block.comment, block.tag);
    let eol = if src.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<&str> = src.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).collect();
    let cleared = remove_block(&mut lines, block.tag);
    let Some(anchor) = lines.iter().position(|line| line.contains(block.anchor)) else {
        exn::bail!(ErrorKind::AnchorNotFound(block.anchor.to_string()));
    };
    let insert_at = (anchor + block.offset).min(lines.len());
    let generated = std::iter::once(header.as_str())
        .chain(block.contents.split('\n'))
        .chain(std::iter::once(footer.as_str()));
    lines.splice(insert_at..insert_at, generated);
    tracing::debug!(tag = block.tag, cleared, "Merged generated block");
    Ok(Merged { contents: lines.join(eol), merged: true, cleared })
}

fn header(block: &Block<'_>) -> String {
    let hash = crc32fast::hash(block.contents.as_bytes());
    format!("{} @generated begin {} - assetpack (DO NOT MODIFY) sync-{hash:08x}", block.comment, block.tag)
}

/// Removes the lines from the tag's begin marker through its end marker.
/// Leaves `lines` untouched if either marker is missing or they are out of order.
fn remove_block(lines: &mut Vec<&str>, tag: &str) -> bool {
    let begin = format!("@generated begin {tag} -");
    let end = format!("@generated end {tag}");
    let start = lines.iter().position(|line| line.contains(&begin));
    let finish = lines.iter().position(|line| line.contains(&end));
    match (start, finish) {
        (Some(start), Some(finish)) if start < finish => {
            lines.drain(start..=finish);
            true
        },
        _ => false,
    }
}
