use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use uuid::Uuid;

use crate::error::CoreError;

/// Raw image bytes handed over by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaPayload {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Decode a base64 upload body.
    pub fn from_base64(content_type: impl Into<String>, data: &str) -> Result<Self, CoreError> {
        let bytes = B64
            .decode(data)
            .map_err(|e| CoreError::InvalidOperation(format!("image is not valid base64: {}", e)))?;
        Ok(Self::new(content_type, bytes))
    }
}

/// Turns an image payload into an opaque, renderable reference. The core
/// stores the reference and never looks inside it.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, payload: &MediaPayload) -> Result<String, CoreError>;
}

fn check_payload(payload: &MediaPayload) -> Result<(), CoreError> {
    if payload.bytes.is_empty() {
        return Err(CoreError::InvalidOperation("image payload is empty".into()));
    }
    if !payload.content_type.starts_with("image/") {
        return Err(CoreError::InvalidOperation(format!(
            "unsupported media type '{}'",
            payload.content_type
        )));
    }
    Ok(())
}

/// Session-scoped object URLs. The reference stops resolving once the
/// process that minted it exits; stored posts keep the dead reference.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlResolver;

impl MediaResolver for ObjectUrlResolver {
    fn resolve(&self, payload: &MediaPayload) -> Result<String, CoreError> {
        check_payload(payload)?;
        Ok(format!("blob:dukehub/{}", Uuid::new_v4()))
    }
}

/// Inline `data:` URLs. Survive restarts at the cost of storing the bytes
/// in the posts slot.
#[derive(Debug, Clone, Default)]
pub struct DataUrlResolver;

impl MediaResolver for DataUrlResolver {
    fn resolve(&self, payload: &MediaPayload) -> Result<String, CoreError> {
        check_payload(payload)?;
        Ok(format!(
            "data:{};base64,{}",
            payload.content_type,
            B64.encode(&payload.bytes)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> MediaPayload {
        MediaPayload::new("image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn object_urls_are_unique() {
        let r = ObjectUrlResolver;
        let a = r.resolve(&png()).unwrap();
        let b = r.resolve(&png()).unwrap();
        assert!(a.starts_with("blob:dukehub/"));
        assert_ne!(a, b);
    }

    #[test]
    fn data_url_embeds_bytes() {
        let url = DataUrlResolver.resolve(&png()).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn rejects_empty_and_non_image_payloads() {
        let empty = MediaPayload::new("image/png", vec![]);
        assert!(matches!(ObjectUrlResolver.resolve(&empty), Err(CoreError::InvalidOperation(_))));

        let text = MediaPayload::new("text/plain", b"hi".to_vec());
        assert!(matches!(DataUrlResolver.resolve(&text), Err(CoreError::InvalidOperation(_))));
    }

    #[test]
    fn decodes_base64_upload() {
        let payload = MediaPayload::from_base64("image/png", "iVBORw==").unwrap();
        assert_eq!(payload, png());
        assert!(MediaPayload::from_base64("image/png", "***").is_err());
    }
}
