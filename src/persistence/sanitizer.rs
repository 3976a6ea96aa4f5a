use regex::Regex;
use std::sync::LazyLock;

use super::traits::NameSanitizer;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid artifact name pattern"));

/// Maps user text onto the artifact name charset (ASCII alphanumerics and `_`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSafeNames;

impl NameSanitizer for ArtifactSafeNames {
    fn to_safe_name(&self, raw: &str) -> String {
        UNSAFE_CHARS.replace_all(raw.trim(), "_").into_owned()
    }
}
