//! Profile images (avatar, banner) uploaded on behalf of the bot

use std::fmt;

/// Image formats the platform accepts for profile images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl ImageKind {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// From a `Content-Type` value; parameters such as `charset` are ignored
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let media = raw.split(';').next().unwrap_or_default().trim().to_lowercase();
        match media.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// From the file signature
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    /// From the extension of a URL path, ignoring any query or fragment
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// Image bytes with a known format
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub kind: ImageKind,
    pub data: Vec<u8>,
}

impl ProfileImage {
    /// Decide the format of downloaded bytes
    ///
    /// Tried in order: the attachment's declared type, the response
    /// `Content-Type`, the file signature, then the URL extension.
    pub fn detect(data: Vec<u8>, declared: Option<&str>, served: Option<&str>, url: &str) -> Option<Self> {
        let kind = declared
            .and_then(ImageKind::from_content_type)
            .or_else(|| served.and_then(ImageKind::from_content_type))
            .or_else(|| ImageKind::sniff(&data))
            .or_else(|| ImageKind::from_url(url))?;
        Some(Self { kind, data })
    }
}

impl fmt::Debug for ProfileImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImage")
            .field("kind", &self.kind)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_content_type() {
        assert_eq!(ImageKind::from_content_type("image/PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_content_type("image/jpg; q=1"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_content_type("text/html"), None);
        assert_eq!(ImageKind::from_content_type(""), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ImageKind::sniff(PNG), Some(ImageKind::Png));
        assert_eq!(ImageKind::sniff(b"GIF89a..."), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(b"<html>"), None);
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(ImageKind::from_url("https://cdn.test/a/b.JPEG?size=512"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_url("https://cdn.test/avatar"), None);
    }

    #[test]
    fn test_detect_order() {
        let image = ProfileImage::detect(PNG.to_vec(), Some("image/gif"), Some("image/webp"), "x.jpg").unwrap();
        assert_eq!(image.kind, ImageKind::Gif);

        let image = ProfileImage::detect(PNG.to_vec(), None, Some("application/octet-stream"), "x.jpg").unwrap();
        assert_eq!(image.kind, ImageKind::Png);

        let image = ProfileImage::detect(b"....".to_vec(), None, None, "https://cdn.test/x.webp").unwrap();
        assert_eq!(image.kind, ImageKind::Webp);

        assert!(ProfileImage::detect(b"....".to_vec(), None, Some("text/plain"), "https://cdn.test/x").is_none());
    }
}
