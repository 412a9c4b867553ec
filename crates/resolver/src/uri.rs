use std::path::Path;

const FILE_SCHEME: &str = "file://";

/// Formats a resolved path as a `file://` URI for media players.
///
/// Values that already carry the scheme are returned unchanged.
///
/// ```
/// use assetpack_resolver::file_uri;
/// assert_eq!(file_uri("/data/user/0/app/files/fbtvideos/a.mp4"), "file:///data/user/0/app/files/fbtvideos/a.mp4");
/// assert_eq!(file_uri("file:///already/a.mp4"), "file:///already/a.mp4");
/// ```
pub fn file_uri(path: impl AsRef<Path>) -> String {
    let path = path.as_ref().to_string_lossy();
    if path.starts_with(FILE_SCHEME) { path.into_owned() } else { format!("{FILE_SCHEME}{path}") }
}
