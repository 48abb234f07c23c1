//! Report Schema Version
//!
//! Build-time schema version for serialised analysis reports. The version is
//! defined in Cargo.toml under package.metadata.prodcon.report_schema_version
//! so the same source always stamps the same version.

include!(concat!(env!("OUT_DIR"), "/report_schema.rs"));

/// Get the current report schema version
///
/// Version format: YYYYMMDD (e.g., 20261019 = 19 October 2026)
pub fn report_schema_version() -> i64 {
    REPORT_SCHEMA_VERSION
}

/// Convert a YYYYMMDD version to a `YYYY-MM-DD` date string
///
/// Returns `None` when the value is not an eight digit version.
pub fn version_to_date_string(version: i64) -> Option<String> {
    if !(10000000..=99999999).contains(&version) {
        return None;
    }

    let year = version / 10000;
    let month = (version % 10000) / 100;
    let day = version % 100;
    Some(format!("{year:04}-{month:02}-{day:02}"))
}
