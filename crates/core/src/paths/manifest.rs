//! App manifest parsing.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static INSTALL_DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""installdir"\s+"(.+?)""#).expect("installdir pattern is valid")
});

/// File name of the manifest the package manager writes for `app_id`.
pub fn manifest_file_name(app_id: &str) -> String {
    format!("appmanifest_{}.acf", app_id)
}

/// Extract the `"installdir" "<value>"` token from manifest text.
pub fn parse_install_dir(manifest: &str) -> Option<String> {
    INSTALL_DIR_RE
        .captures(manifest)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
