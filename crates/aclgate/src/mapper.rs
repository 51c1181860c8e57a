//! Resource identifier ⇄ physical path mapping

use crate::config::AclConfig;
use crate::errors::{AclError, AclResult};
use crate::path::{is_container, SEPARATOR};
use percent_encoding::percent_decode_str;
use url::Url;

/// A resource identifier together with its physical path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    /// Logical identifier
    pub url: Url,
    /// Physical path in the store
    pub path: String,
}

impl ResourcePath {
    /// Whether the resource is a container
    pub fn is_container(&self) -> bool {
        is_container(&self.path)
    }
}

/// Maps resource identifiers onto store paths and back
pub trait ResourceMapper: Send + Sync {
    /// Physical path for a resource identifier
    fn map_url_to_path(&self, url: &Url) -> AclResult<ResourcePath>;

    /// Identifier for a physical path, served under `host`'s origin
    fn map_path_to_url(&self, path: &str, host: &Url) -> AclResult<Url>;
}

/// Maps everything under one base URL onto one filesystem root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPathMapper {
    base_url: Url,
    root_path: String,
}

impl UrlPathMapper {
    /// Serve `root_path` at `base_url`; both must end with `/`
    pub fn new(base_url: Url, root_path: impl Into<String>) -> Self {
        Self {
            base_url,
            root_path: root_path.into(),
        }
    }

    /// Mapper for the base URL and store root of a configuration
    pub fn from_config(config: &AclConfig) -> AclResult<Self> {
        Ok(Self::new(
            config.require_base_url()?.clone(),
            config.store_root.clone(),
        ))
    }

    /// Base URL served by this mapper
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Filesystem root served by this mapper
    pub fn root_path(&self) -> &str {
        &self.root_path
    }
}

impl ResourceMapper for UrlPathMapper {
    fn map_url_to_path(&self, url: &Url) -> AclResult<ResourcePath> {
        if url.origin() != self.base_url.origin() {
            return Err(AclError::invalid_resource(
                url.as_str(),
                format!("not served under {}", self.base_url),
            ));
        }
        let relative = url
            .path()
            .strip_prefix(self.base_url.path())
            .ok_or_else(|| {
                AclError::invalid_resource(
                    url.as_str(),
                    format!("outside base path {}", self.base_url.path()),
                )
            })?;
        let segments = relative
            .split(SEPARATOR)
            .map(|segment| decode_segment(url, segment))
            .collect::<AclResult<Vec<_>>>()?;
        Ok(ResourcePath {
            url: url.clone(),
            path: format!("{}{}", self.root_path, segments.join("/")),
        })
    }

    fn map_path_to_url(&self, path: &str, host: &Url) -> AclResult<Url> {
        let relative = path.strip_prefix(&self.root_path).ok_or_else(|| {
            AclError::invalid_resource(path, format!("outside store root {}", self.root_path))
        })?;
        let mut url = host.clone();
        url.set_path(self.base_url.path());
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| AclError::invalid_resource(host.as_str(), "cannot carry a path"))?
            .pop_if_empty()
            .extend(relative.split(SEPARATOR));
        Ok(url)
    }
}

/// Decode one percent-encoded path segment.
///
/// A decoded segment must stay a single segment: no separator, no NUL and no
/// parent reference.
fn decode_segment(url: &Url, segment: &str) -> AclResult<String> {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| AclError::invalid_resource(url.as_str(), "path is not valid UTF-8"))?;
    if decoded.contains(SEPARATOR) || decoded.contains('\0') || decoded == ".." {
        return Err(AclError::invalid_resource(
            url.as_str(),
            format!("path segment {segment:?} does not name a single entry"),
        ));
    }
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn mapper() -> UrlPathMapper {
        UrlPathMapper::new(Url::parse("https://pod.example/").unwrap(), "/srv/pod/")
    }

    #[test]
    fn test_leaf_and_container_mapping() {
        let leaf = mapper()
            .map_url_to_path(&Url::parse("https://pod.example/docs/a.txt").unwrap())
            .unwrap();
        assert_eq!(leaf.path, "/srv/pod/docs/a.txt");
        assert!(!leaf.is_container());

        let container = mapper()
            .map_url_to_path(&Url::parse("https://pod.example/docs/").unwrap())
            .unwrap();
        assert_eq!(container.path, "/srv/pod/docs/");
        assert!(container.is_container());

        let root = mapper()
            .map_url_to_path(&Url::parse("https://pod.example/").unwrap())
            .unwrap();
        assert_eq!(root.path, "/srv/pod/");
    }

    #[test]
    fn test_query_is_not_part_of_path() {
        let mapped = mapper()
            .map_url_to_path(&Url::parse("https://pod.example/docs/a.txt?x=1#frag").unwrap())
            .unwrap();
        assert_eq!(mapped.path, "/srv/pod/docs/a.txt");
    }

    #[test]
    fn test_foreign_origin_rejected() {
        let err = mapper()
            .map_url_to_path(&Url::parse("https://evil.example/docs/").unwrap())
            .unwrap_err();
        assert_matches!(err, AclError::InvalidResource { .. });
    }

    #[test]
    fn test_base_path_prefix_enforced() {
        let nested = UrlPathMapper::new(Url::parse("https://pod.example/alice/").unwrap(), "/srv/");
        let err = nested
            .map_url_to_path(&Url::parse("https://pod.example/bob/x").unwrap())
            .unwrap_err();
        assert_matches!(err, AclError::InvalidResource { .. });
        let ok = nested
            .map_url_to_path(&Url::parse("https://pod.example/alice/x").unwrap())
            .unwrap();
        assert_eq!(ok.path, "/srv/x");
    }

    #[test]
    fn test_path_to_url_round_trip() {
        let host = Url::parse("https://pod.example/docs/a.txt").unwrap();
        let url = mapper().map_path_to_url("/srv/pod/docs/.acl", &host).unwrap();
        assert_eq!(url.as_str(), "https://pod.example/docs/.acl");

        let err = mapper().map_path_to_url("/etc/passwd", &host).unwrap_err();
        assert_matches!(err, AclError::InvalidResource { .. });
    }

    #[test]
    fn test_encoded_segments_are_decoded() {
        let mapped = mapper()
            .map_url_to_path(&Url::parse("https://pod.example/docs/private%20notes.txt").unwrap())
            .unwrap();
        assert_eq!(mapped.path, "/srv/pod/docs/private notes.txt");

        let host = Url::parse("https://pod.example/").unwrap();
        let url = mapper()
            .map_path_to_url("/srv/pod/docs/private notes.txt.acl", &host)
            .unwrap();
        assert_eq!(url.as_str(), "https://pod.example/docs/private%20notes.txt.acl");
    }

    #[test]
    fn test_encoded_separator_and_nul_rejected() {
        for bad in [
            "https://pod.example/docs/a%2Fb.txt",
            "https://pod.example/docs/a%00.txt",
            "https://pod.example/docs/a%2f..%2fsecret",
            "https://pod.example/docs/%FF.txt",
        ] {
            let err = mapper().map_url_to_path(&Url::parse(bad).unwrap()).unwrap_err();
            assert_matches!(err, AclError::InvalidResource { .. }, "{bad}");
        }
    }

    #[test]
    fn test_containers_and_root_survive_re_encoding() {
        let host = Url::parse("https://pod.example/x").unwrap();
        let root = mapper().map_path_to_url("/srv/pod/", &host).unwrap();
        assert_eq!(root.as_str(), "https://pod.example/");
        let container = mapper().map_path_to_url("/srv/pod/a b/", &host).unwrap();
        assert_eq!(container.as_str(), "https://pod.example/a%20b/");

        let nested = UrlPathMapper::new(Url::parse("https://pod.example/alice/").unwrap(), "/srv/");
        let doc = nested.map_path_to_url("/srv/.acl", &host).unwrap();
        assert_eq!(doc.as_str(), "https://pod.example/alice/.acl");
    }
}
