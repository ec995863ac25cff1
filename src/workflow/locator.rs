use crate::error::Result;
use crate::hosting::ReleaseHost;
use tracing::debug;

/// Finds the most recent nightly release by scanning a bounded window of the
/// release history.
///
/// Only the newest `lookback` releases are inspected. A nightly older than
/// that is not found even though it exists; the window is sized so a normal
/// nightly cadence always leaves one inside it.
pub struct NightlyTagLocator<'a> {
    host: &'a dyn ReleaseHost,
    prefix: &'a str,
    lookback: usize,
}

impl<'a> NightlyTagLocator<'a> {
    pub fn new(host: &'a dyn ReleaseHost, prefix: &'a str, lookback: usize) -> Self {
        NightlyTagLocator {
            host,
            prefix,
            lookback,
        }
    }

    /// Tag of the newest nightly release within the window, if any
    pub fn find(&self) -> Result<Option<String>> {
        self.scan(None)
    }

    /// Like [`find`](Self::find), but passes over `current` so a nightly that
    /// is being republished anchors on the one before it.
    pub fn find_previous(&self, current: &str) -> Result<Option<String>> {
        self.scan(Some(current))
    }

    fn scan(&self, skip: Option<&str>) -> Result<Option<String>> {
        let releases = self.host.list_releases(self.lookback)?;
        let found = releases
            .into_iter()
            .take(self.lookback)
            .map(|record| record.tag_name)
            .find(|tag| tag.starts_with(self.prefix) && Some(tag.as_str()) != skip);
        debug!(lookback = self.lookback, found = ?found, "scanned release history");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::MockReleaseHost;

    #[test]
    fn test_finds_first_nightly() {
        let host = MockReleaseHost::with_history([
            "v1.2.0",
            "nightly-2024-03-04",
            "nightly-2024-03-03",
        ]);
        let locator = NightlyTagLocator::new(&host, "nightly-", 10);
        assert_eq!(
            locator.find().unwrap().as_deref(),
            Some("nightly-2024-03-04")
        );
        assert_eq!(host.list_limits(), vec![10]);
    }

    #[test]
    fn test_nightly_at_window_edge_is_found() {
        let host = MockReleaseHost::with_history(["v1.2.2", "v1.2.1", "nightly-2024-01-01"]);
        let locator = NightlyTagLocator::new(&host, "nightly-", 3);
        assert_eq!(
            locator.find().unwrap().as_deref(),
            Some("nightly-2024-01-01")
        );
    }

    #[test]
    fn test_nightly_beyond_window_is_not_found() {
        let host = MockReleaseHost::with_history(["v1.2.2", "v1.2.1", "nightly-2024-01-01"]);
        let locator = NightlyTagLocator::new(&host, "nightly-", 2);
        assert_eq!(locator.find().unwrap(), None);
    }

    #[test]
    fn test_empty_history() {
        let host = MockReleaseHost::new();
        let locator = NightlyTagLocator::new(&host, "nightly-", 10);
        assert_eq!(locator.find().unwrap(), None);
    }

    #[test]
    fn test_find_previous_skips_current_tag() {
        let host = MockReleaseHost::with_history([
            "nightly-2024-03-05",
            "v1.2.0",
            "nightly-2024-03-04",
        ]);
        let locator = NightlyTagLocator::new(&host, "nightly-", 10);
        assert_eq!(
            locator.find_previous("nightly-2024-03-05").unwrap().as_deref(),
            Some("nightly-2024-03-04")
        );
        assert_eq!(
            locator.find().unwrap().as_deref(),
            Some("nightly-2024-03-05")
        );
    }
}
