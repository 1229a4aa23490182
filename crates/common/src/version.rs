use serde::Serialize;

/// Build metadata stamped by the crate's build script.
///
/// Every field is optional; a build outside the repository (for example
/// from a source tarball) leaves the git-derived fields unset.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: Option<&'static str>,
    pub build_profile: Option<&'static str>,
    pub build_timestamp: Option<&'static str>,
    pub rust_version: Option<&'static str>,
}

/// Report the build information compiled into this binary.
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: option_env!("REPO_VERSION"),
        build_profile: option_env!("BUILD_PROFILE"),
        build_timestamp: option_env!("BUILD_TIMESTAMP"),
        rust_version: option_env!("RUST_VERSION"),
    }
}
