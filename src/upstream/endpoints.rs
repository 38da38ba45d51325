use crate::config::UpstreamConfig;
use crate::metrics::NormalizedBitlink;

/// URL builder for the three upstream endpoints the pipeline consumes.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Caller's user record, which carries `default_group_guid`
    pub fn user(&self) -> String {
        format!("{}/user", self.base_url)
    }

    pub fn group_bitlinks(&self, group_guid: &str) -> String {
        format!(
            "{}/groups/{}/bitlinks",
            self.base_url,
            urlencoding::encode(group_guid)
        )
    }

    /// The bitlink is already percent-encoded, so it is inserted as-is.
    pub fn bitlink_countries(&self, bitlink: &NormalizedBitlink) -> String {
        format!("{}/bitlinks/{}/countries", self.base_url, bitlink.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let endpoints = Endpoints::new("https://api-ssl.bitly.com/v4/");
        assert_eq!(endpoints.user(), "https://api-ssl.bitly.com/v4/user");
        assert_eq!(
            endpoints.group_bitlinks("Bj71ifpGx2i"),
            "https://api-ssl.bitly.com/v4/groups/Bj71ifpGx2i/bitlinks"
        );

        let bitlink = NormalizedBitlink::parse("https://bit.ly/abc123").unwrap();
        assert_eq!(
            endpoints.bitlink_countries(&bitlink),
            "https://api-ssl.bitly.com/v4/bitlinks/bit.ly%2Fabc123/countries"
        );
    }

    #[test]
    fn group_guid_is_encoded_as_a_single_segment() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000");
        assert_eq!(
            endpoints.group_bitlinks("a/b"),
            "http://127.0.0.1:9000/groups/a%2Fb/bitlinks"
        );
    }
}
