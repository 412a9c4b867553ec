use derive_more::Display;

/// Build flavour of the running application.
///
/// Decides which content source is asked first. Development builds rarely
/// have the asset pack installed but bundle the full media set, so they try
/// the embedded bundle first. Production builds prefer the delivered pack and
/// only fall back to whatever happens to be embedded.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum BuildVariant {
    #[display("debug")]
    Debug,
    #[default]
    #[display("release")]
    Release,
}
impl BuildVariant {
    /// Variant of the current compilation, following `debug_assertions`.
    pub fn current() -> Self {
        if cfg!(debug_assertions) { Self::Debug } else { Self::Release }
    }

    pub fn prefers_embedded(self) -> bool {
        matches!(self, Self::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference() {
        assert!(BuildVariant::Debug.prefers_embedded());
        assert!(!BuildVariant::Release.prefers_embedded());
    }

    #[test]
    fn test_current_follows_debug_assertions() {
        assert_eq!(BuildVariant::current().prefers_embedded(), cfg!(debug_assertions));
    }
}
