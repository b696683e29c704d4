//! Install and uninstall engine
//!
//! Layout under a Geometry Dash folder:
//! - `geode/mods/absolllute.megahack.geode` for the Geode variant
//! - `hackpro.dll`, `hackproldr.dll`, `XInput1_4.dll` (plus the rest of
//!   `lib.zip`) at the root for the Default variant

mod archive;
mod engine;
mod fetch;
mod folder;
mod uninstall;

pub use engine::{apply, artifact_url, InstallReport};
pub use fetch::{fetch, FetchedArtifact};
pub use folder::{validate, TargetLocation};
pub use uninstall::{guard_url, revert, UninstallReport};

/// File name of the Geode package, both remotely and in `geode/mods`
pub const GEODE_PACKAGE: &str = "absolllute.megahack.geode";

/// Archive holding the Default variant
pub const DEFAULT_ARCHIVE: &str = "lib.zip";

/// Loader shim restored when the Default variant is removed
pub const GUARD_FILE: &str = "XInput1_4.dll";

/// Root files removed when the Default variant is uninstalled
pub const DEFAULT_PAYLOAD: &[&str] = &["hackpro.dll", "hackproldr.dll", GUARD_FILE];

/// Join URL segments onto a base without doubling slashes.
fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_trims_separators() {
        assert_eq!(
            join_url("https://host/raw/main/", &["megahack", "geode"]),
            "https://host/raw/main/megahack/geode"
        );
        assert_eq!(join_url("https://host", &["XInput1_4.dll"]), "https://host/XInput1_4.dll");
    }
}
