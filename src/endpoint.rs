/// Well-known director address every process starts from. The director
/// answers with an `x_myenergi-asn` header naming the server that actually
/// holds the hub's data.
pub const DEFAULT_BASE_URL: &str = "https://director.myenergi.net";

/// Current hub base URL. Replaced wholesale when the server hands the hub
/// off to another ASN; never persisted across restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn resolve(&self) -> &str {
        &self.base_url
    }

    /// Points the endpoint at `new_host` (an ASN hostname). Returns true if
    /// the base URL actually changed, in which case the response that carried
    /// the reassignment is not data and the caller must fetch again on the
    /// next cycle.
    pub fn update(&mut self, new_host: &str) -> bool {
        let new_url = format!("https://{new_host}");
        if new_url == self.base_url {
            return false;
        }
        self.base_url = new_url;
        true
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_director() {
        let endpoint = Endpoint::default();
        assert_eq!(endpoint.resolve(), "https://director.myenergi.net");
    }

    #[test]
    fn test_update_replaces_base_url() {
        let mut endpoint = Endpoint::default();
        assert!(endpoint.update("s18.myenergi.net"));
        assert_eq!(endpoint.resolve(), "https://s18.myenergi.net");
    }

    #[test]
    fn test_update_with_current_host_is_a_no_op() {
        let mut endpoint = Endpoint::new("https://s18.myenergi.net");
        assert!(!endpoint.update("s18.myenergi.net"));
        assert_eq!(endpoint.resolve(), "https://s18.myenergi.net");
    }
}
