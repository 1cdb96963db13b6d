//! Observed HTTP resources.

use crate::core::url as uri;

use super::ResourceType;

/// A single HTTP resource observed during a page load.
///
/// Built by the observer with the consuming `with_*` setters, then
/// handed to a [`ResourceCollection`](super::ResourceCollection),
/// which takes ownership.
#[derive(Debug, Clone)]
pub struct Resource {
    request_url: String,
    host: String,
    status_code: i32,
    request_start_millis: Option<i64>,
    location: Option<String>,
    content_type: Option<String>,
}

impl Resource {
    /// Create a resource from its request URL and response status.
    pub fn new(request_url: impl Into<String>, status_code: i32) -> Self {
        let request_url = request_url.into();
        let host = uri::host_of(&request_url).unwrap_or_default();
        Self {
            request_url,
            host,
            status_code,
            request_start_millis: None,
            location: None,
            content_type: None,
        }
    }

    /// Attach the raw `Location` response-header value.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach the response media type (e.g. `text/html`).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach the request start timestamp, in milliseconds.
    pub fn with_request_start_millis(mut self, millis: i64) -> Self {
        self.request_start_millis = Some(millis);
        self
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// Host of the request URL; empty when the URL does not parse.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn request_start_millis(&self) -> Option<i64> {
        self.request_start_millis
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Classify the resource from its status code and media type.
    pub fn resource_type(&self) -> ResourceType {
        ResourceType::classify(self.status_code, self.content_type.as_deref())
    }

    pub fn is_redirect(&self) -> bool {
        self.resource_type() == ResourceType::Redirect
    }

    /// The redirect target: the `Location` value resolved against the
    /// request URL and canonicalized. `None` for non-redirects, empty
    /// locations, and unresolvable references.
    pub fn redirect_target(&self) -> Option<String> {
        if !self.is_redirect() {
            return None;
        }
        let location = self.location.as_deref()?;
        if location.is_empty() {
            return None;
        }
        uri::resolve_relative(&self.request_url, location)
    }

    pub fn has_request_start_time(&self) -> bool {
        self.request_start_millis.is_some()
    }

    /// Request-order comparator. A resource without a timestamp never
    /// orders before anything; the collection skips sorting entirely
    /// when any timestamp is missing.
    pub fn is_request_start_time_less_than(&self, other: &Resource) -> bool {
        match (self.request_start_millis, other.request_start_millis) {
            (Some(lhs), Some(rhs)) => lhs < rhs,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_derived_from_url() {
        let resource = Resource::new("https://www.example.com/a/b?q=1", 200);
        assert_eq!(resource.host(), "www.example.com");
        assert_eq!(Resource::new("not a url", 200).host(), "");
    }

    #[test]
    fn test_redirect_target_resolution() {
        let absolute = Resource::new("http://a.com/x", 302).with_location("http://b.com/y");
        assert_eq!(absolute.redirect_target().as_deref(), Some("http://b.com/y"));

        let relative = Resource::new("http://a.com/dir/page", 301).with_location("../other");
        assert_eq!(
            relative.redirect_target().as_deref(),
            Some("http://a.com/other")
        );

        let fragment = Resource::new("http://a.com/x", 302).with_location("/y#section");
        assert_eq!(fragment.redirect_target().as_deref(), Some("http://a.com/y"));
    }

    #[test]
    fn test_redirect_target_absent() {
        // Not a redirect status.
        let ok = Resource::new("http://a.com/x", 200).with_location("http://b.com/");
        assert_eq!(ok.redirect_target(), None);
        // Redirect without a Location header.
        let bare = Resource::new("http://a.com/x", 302);
        assert_eq!(bare.redirect_target(), None);
        let empty = Resource::new("http://a.com/x", 302).with_location("");
        assert_eq!(empty.redirect_target(), None);
    }

    #[test]
    fn test_request_order_comparator() {
        let early = Resource::new("http://a.com/1", 200).with_request_start_millis(10);
        let late = Resource::new("http://a.com/2", 200).with_request_start_millis(20);
        let untimed = Resource::new("http://a.com/3", 200);

        assert!(early.is_request_start_time_less_than(&late));
        assert!(!late.is_request_start_time_less_than(&early));
        assert!(!early.is_request_start_time_less_than(&early));
        assert!(!untimed.is_request_start_time_less_than(&late));
        assert!(!early.is_request_start_time_less_than(&untimed));
        assert!(!untimed.has_request_start_time());
    }
}
