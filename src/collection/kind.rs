//! Resource type classification.

use serde::Serialize;

/// Classification of an observed HTTP resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Html,
    Css,
    Javascript,
    Image,
    Text,
    Redirect,
    Other,
}

impl ResourceType {
    /// Classify from the response status code and media type.
    ///
    /// Any 3xx response except 304 is a redirect regardless of its
    /// body; a 304 revalidation keeps the type of the cached body.
    pub fn classify(status_code: i32, content_type: Option<&str>) -> Self {
        if (300..400).contains(&status_code) && status_code != 304 {
            return ResourceType::Redirect;
        }
        match content_type {
            Some(media_type) => Self::from_media_type(media_type),
            None => ResourceType::Other,
        }
    }

    /// Classify from a media type string. Parameters (`; charset=...`)
    /// are ignored.
    fn from_media_type(media_type: &str) -> Self {
        let essence = media_type.split(';').next().unwrap_or(media_type).trim();
        match essence {
            "text/html" | "application/xhtml+xml" => ResourceType::Html,
            "text/css" => ResourceType::Css,
            "text/javascript"
            | "application/javascript"
            | "application/x-javascript"
            | "application/ecmascript" => ResourceType::Javascript,
            _ if essence.starts_with("image/") => ResourceType::Image,
            _ if essence.starts_with("text/") => ResourceType::Text,
            _ => ResourceType::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_statuses() {
        for status in [300, 301, 302, 303, 307, 308] {
            assert_eq!(
                ResourceType::classify(status, Some("text/html")),
                ResourceType::Redirect
            );
        }
        // 304 keeps the cached body's type.
        assert_eq!(
            ResourceType::classify(304, Some("text/css")),
            ResourceType::Css
        );
    }

    #[test]
    fn test_media_types() {
        assert_eq!(
            ResourceType::classify(200, Some("text/html; charset=utf-8")),
            ResourceType::Html
        );
        assert_eq!(
            ResourceType::classify(200, Some("application/x-javascript")),
            ResourceType::Javascript
        );
        assert_eq!(
            ResourceType::classify(200, Some("image/png")),
            ResourceType::Image
        );
        assert_eq!(
            ResourceType::classify(200, Some("text/plain")),
            ResourceType::Text
        );
        assert_eq!(
            ResourceType::classify(200, Some("application/json")),
            ResourceType::Other
        );
        assert_eq!(ResourceType::classify(200, None), ResourceType::Other);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResourceType::Redirect).unwrap(),
            "\"redirect\""
        );
        assert_eq!(
            serde_json::to_string(&ResourceType::Javascript).unwrap(),
            "\"javascript\""
        );
    }
}
