//! Usage: Ordered OAuth request parameters (authorization URL query / token form body).

use reqwest::Url;

pub mod oauth_parameter {
    pub const PROMPT: &str = "prompt";
}

pub mod prompt_value {
    pub const LOGIN: &str = "login";
    pub const REFRESH_SESSION: &str = "refresh_session";
    pub const ATTEMPT_NONE: &str = "attempt_none";
}

/// Insertion-ordered parameter map; re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    entries: Vec<(String, String)>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append every parameter to the URL query, keeping order.
    pub fn append_to_url(&self, url: &mut Url) {
        if self.entries.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in self.iter() {
            pairs.append_pair(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParameters::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_value_in_place() {
        let mut params: RequestParameters =
            [("client_id", "abc"), ("prompt", "login"), ("scope", "openid")]
                .into_iter()
                .collect();
        params.insert("prompt", "attempt_none");

        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["client_id", "prompt", "scope"]);
        assert_eq!(params.get("prompt"), Some("attempt_none"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn remove_drops_entry() {
        let mut params = RequestParameters::new();
        params.insert("prompt", "login");
        assert_eq!(params.remove("prompt").as_deref(), Some("login"));
        assert!(params.is_empty());
        assert_eq!(params.remove("prompt"), None);
    }

    #[test]
    fn append_to_url_encodes_values() {
        let mut params = RequestParameters::new();
        params.insert("redirect_uri", "urn:ietf:wg:oauth:2.0:oob");
        params.insert("prompt", "refresh_session");

        let mut url = Url::parse("https://login.example.com/common/oauth2/authorize?response_type=code").unwrap();
        params.append_to_url(&mut url);

        assert_eq!(
            url.query(),
            Some("response_type=code&redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob&prompt=refresh_session")
        );
    }
}
