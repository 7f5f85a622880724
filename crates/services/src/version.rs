//! Version string formatting.

use domains::{ReleaseLevel, VersionInfo};

/// Version of this release of the forum display layer.
pub const VERSION_INFO: VersionInfo = VersionInfo::new(0, 2, 1, ReleaseLevel::Final, 0);

/// Build tag appended to development versions, captured at compile time.
const BUILD_TAG: Option<&str> = option_env!("FORUM_BUILD");

/// Formats a version tuple.
///
/// `(0, 2, 1, Final, 0)` gives `"0.2.1"`, `(2, 3, 1, Alpha, 5)` gives
/// `"2.3.1a5.dev"` followed by the build tag if one was compiled in, and an
/// alpha with serial 0 is `"x.y pre-alpha"`.
pub fn get_version(info: &VersionInfo) -> String {
    format_version(info, BUILD_TAG)
}

/// Version of this crate, see [`VERSION_INFO`].
pub fn version() -> String {
    get_version(&VERSION_INFO)
}

fn format_version(info: &VersionInfo, build: Option<&str>) -> String {
    let mut version = format!("{}.{}", info.major, info.minor);
    if info.micro != 0 {
        version.push_str(&format!(".{}", info.micro));
    }

    match (info.level, info.serial) {
        (ReleaseLevel::Final, _) => {}
        (ReleaseLevel::Alpha, 0) => version.push_str(" pre-alpha"),
        (level, serial) => {
            version.push_str(&format!("{}{}.dev", level.tag(), serial));
            if let Some(build) = build.map(str::trim).filter(|b| !b.is_empty()) {
                version.push_str(build);
            }
        }
    }
    version
}
