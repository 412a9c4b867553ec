//! Asset file resolution.
//!
//! Answers one question for the presentation layer: "give me a local path I
//! can play for `lesson-3.mp4`". The answer comes from, in order:
//!
//! 1. the application-private [`LocalCache`](assetpack_cache::LocalCache),
//! 2. the content sources, ordered by [`BuildVariant`]:
//!    - **debug**: embedded bundle, then delivered asset pack;
//!    - **release**: delivered asset pack, then embedded bundle.
//!
//! The first source holding the file has its contents copied into the cache,
//! so every later resolution of that file is a cache hit.

pub mod error;
mod resolve;
mod uri;
mod variant;

pub use crate::resolve::AssetResolver;
pub use crate::uri::file_uri;
pub use crate::variant::BuildVariant;
