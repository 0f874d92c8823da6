use bytes::Bytes;

/// The decomposed form of a request URI.
///
/// Every component is optional: parsing may stop partway through a URI, and
/// a transaction keeps both the best-effort record built while the request
/// line streamed in and the completed record. All components are owned by
/// the record and released with it.
#[derive(Debug, Default)]
pub struct ParsedUri {
    pub scheme: Option<Bytes>,
    pub username: Option<Bytes>,
    pub password: Option<Bytes>,
    pub hostname: Option<Bytes>,
    pub port: Option<Bytes>,
    pub path: Option<Bytes>,
    pub query: Option<Bytes>,
    pub fragment: Option<Bytes>,
}

impl ParsedUri {
    /// Returns true if no component has been populated yet.
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.hostname.is_none()
            && self.port.is_none()
            && self.path.is_none()
            && self.query.is_none()
            && self.fragment.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let uri = ParsedUri::default();
        assert!(uri.is_empty());
    }

    #[test]
    fn partial_population_is_visible() {
        let mut uri = ParsedUri::default();
        uri.path = Some(Bytes::from_static(b"/index.html"));
        uri.query = Some(Bytes::from_static(b"a=1"));

        assert!(!uri.is_empty());
        assert_eq!(uri.path.as_deref(), Some(b"/index.html".as_slice()));
        assert!(uri.hostname.is_none());
    }
}
