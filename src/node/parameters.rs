use std::collections::BTreeMap;

use reqwest::Url;

use super::NodeKind;

/// Navigation parameters of a node, kept sorted by name.
///
/// They travel through navigation URLs, so names are stable: `nt` (node
/// kind), `nid`, `offset`, `mode` and the kind-specific selectors such as
/// `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Parameters(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of `name`; an empty value reads as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of `parent` overlaid with these parameters.
    pub fn inherit_from(&self, parent: &Parameters) -> Parameters {
        let mut merged = parent.0.clone();
        merged.extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Parameters(merged)
    }

    /// Parses a navigation URL built by [`crate::node::Tree::make_url`] back
    /// into the node kind and its parameters (`nid` and `offset` included).
    pub fn from_url(url: &str) -> Result<(NodeKind, Parameters), String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid url '{}': {}", url, e))?;

        let mut params = Parameters::new();
        for (name, value) in parsed.query_pairs() {
            if !value.is_empty() {
                params.set(&name, value.into_owned());
            }
        }

        let kind = params
            .take("nt")
            .ok_or_else(|| format!("url '{}' carries no node kind", url))?
            .parse()?;
        Ok((kind, params))
    }
}

/// Appends `pairs` to `base` as a form-encoded query, skipping empty values.
pub fn build_url<'a>(base: &Url, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (name, value) in pairs.into_iter().filter(|(_, v)| !v.is_empty()) {
            query.append_pair(name, value);
        }
    }
    url.to_string()
}
