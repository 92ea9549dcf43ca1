//! Metric namespace prefix.

/// Suffix appended to the host name of every metric prefix.
pub const PREFIX_SUFFIX: &str = "go";

/// Prefix used when the host name cannot be determined.
pub const UNKNOWN_HOST_PREFIX: &str = "unknown_host.go";

/// Resolves the metric prefix for this host.
///
/// Returns `<hostname>.go`, or [`UNKNOWN_HOST_PREFIX`] when the host name
/// cannot be resolved or is not valid UTF-8.
pub fn resolve() -> String {
    let hostname = hostname::get().ok().and_then(|s| s.into_string().ok());
    if hostname.is_none() {
        log::debug!("host name unavailable, using `{}`", UNKNOWN_HOST_PREFIX);
    }
    from_hostname(hostname.as_deref())
}

/// Builds the metric prefix from an optional host name.
pub fn from_hostname(hostname: Option<&str>) -> String {
    match hostname {
        Some(host) if !host.is_empty() => format!("{}.{}", host, PREFIX_SUFFIX),
        _ => UNKNOWN_HOST_PREFIX.to_owned(),
    }
}
