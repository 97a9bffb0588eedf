//! Firmware identity reported to Notehub.
//!
//! The JSON document is what `dfu.status` carries as `version`; Notehub
//! matches it against uploaded images so only compatible builds are
//! offered to this device.

use serde::Serialize;

pub const ORG_NAME: &str = "tvantoll";
pub const DISPLAY_NAME: &str = "Kid Tracker";
pub const FIRMWARE_ID: &str = "kid-tracker-firmware";
pub const DESCRIPTION: &str = "Custom GPS/GNSS tracker for kids";
pub const BUILD_NUMBER: u32 = 0;
pub const BUILDER: &str = "";

/// Build timestamp stamped by `build.rs` (empty if unavailable).
pub const BUILT: &str = match option_env!("KIDTRACKER_BUILT") {
    Some(built) => built,
    None => "",
};

/// Product metadata, serialized in the field order Notehub shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInfo {
    pub org: &'static str,
    pub product: &'static str,
    pub description: &'static str,
    pub firmware: &'static str,
    pub version: &'static str,
    pub built: &'static str,
    pub ver_major: u32,
    pub ver_minor: u32,
    pub ver_patch: u32,
    pub ver_build: u32,
    pub builder: &'static str,
}

impl ProductInfo {
    /// Metadata of the running image.
    pub fn current() -> Self {
        Self {
            org: ORG_NAME,
            product: DISPLAY_NAME,
            description: DESCRIPTION,
            firmware: FIRMWARE_ID,
            version: env!("CARGO_PKG_VERSION"),
            built: BUILT,
            ver_major: parse_u32(env!("CARGO_PKG_VERSION_MAJOR")),
            ver_minor: parse_u32(env!("CARGO_PKG_VERSION_MINOR")),
            ver_patch: parse_u32(env!("CARGO_PKG_VERSION_PATCH")),
            ver_build: BUILD_NUMBER,
            builder: BUILDER,
        }
    }

    /// JSON document for `dfu.status`.
    pub fn to_json(&self) -> String {
        // Only static strings and integers: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Human-readable version line for the boot banner.
pub fn product_version() -> String {
    let info = ProductInfo::current();
    if info.built.is_empty() {
        format!("Ver {}", info.version)
    } else {
        format!("Ver {} {}", info.version, info.built)
    }
}

fn parse_u32(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}
