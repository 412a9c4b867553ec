//! File name validation.
//!
//! Asset file names arrive from the presentation layer and are joined onto
//! cache, pack and bundle directories, so they must never be able to escape
//! those directories.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates an asset file name.
///
/// A valid file name is exactly one normal path component: no separators, no
/// `.`/`..`, no root or drive prefix, and no null bytes. Surrounding
/// whitespace is not trimmed; `" a.mp4"` is its own (odd) file name.
///
/// # Examples
///
/// ```
/// use assetpack_source::validate_file_name;
/// assert!(validate_file_name("lesson-1.mp4").is_ok());
/// assert!(validate_file_name("../secrets").is_err());
/// assert!(validate_file_name("videos/lesson-1.mp4").is_err());
/// assert!(validate_file_name("").is_err());
/// ```
pub fn validate(name: &str) -> Result<&str> {
    if name.as_bytes().contains(&0) {
        exn::bail!(ErrorKind::InvalidFileName(name.escape_default().to_string()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        // `Path::components()` silently drops trailing slashes, so check the
        // raw string for separators as well.
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => exn::bail!(ErrorKind::InvalidFileName(name.to_string())),
    }
}

/// Relative location of an asset inside a pack or bundle root:
/// `<asset_directory>/<file_name>`.
pub fn asset_path(asset_directory: &str, file_name: &str) -> Result<PathBuf> {
    let file_name = validate(file_name)?;
    Ok(Path::new(asset_directory).join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lesson-1.mp4")]
    #[case("Can we translate the Bible.mp4")]
    #[case(".hidden.mp4")]
    #[case("no-extension")]
    fn test_valid_names(#[case] name: &str) {
        assert_eq!(validate(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../escape.mp4")]
    #[case("videos/lesson.mp4")]
    #[case("lesson.mp4/")]
    #[case("/etc/passwd")]
    #[case("a\\b.mp4")]
    #[case("a\0b.mp4")]
    fn test_invalid_names(#[case] name: &str) {
        let err = validate(name).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidFileName(_)));
    }

    #[test]
    fn test_asset_path() {
        assert_eq!(asset_path("videos", "a.mp4").unwrap(), Path::new("videos/a.mp4"));
        assert!(asset_path("videos", "../a.mp4").is_err());
    }
}
