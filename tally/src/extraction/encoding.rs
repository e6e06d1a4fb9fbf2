use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Drain `reader` and return its contents as standard base64 (no data-URL prefix).
pub async fn read_to_base64<R>(mut reader: R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(encode_base64(&buffer))
}

pub async fn file_to_base64(path: &Path) -> Result<String> {
    let file = tokio::fs::File::open(path).await?;
    read_to_base64(file).await
}

/// Best-effort image media type: magic bytes first, then the file extension.
/// Anything that is not `image/*` is ignored.
pub fn detect_media_type(bytes: &[u8], path: Option<&Path>) -> Option<String> {
    let sniffed = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .filter(|mime| mime.starts_with("image/"));

    sniffed.or_else(|| {
        path.and_then(|p| mime_guess::from_path(p).first())
            .map(|mime| mime.essence_str().to_string())
            .filter(|mime| mime.starts_with("image/"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_encode_base64() {
        assert_eq!(encode_base64(&[0xFF, 0xD8, 0xFF, 0xE0]), "/9j/4A==");
        assert_eq!(encode_base64(b""), "");
    }

    #[tokio::test]
    async fn test_read_to_base64_from_slice() {
        let encoded = read_to_base64(&b"invoice"[..]).await.expect("encode");
        assert_eq!(encoded, "aW52b2ljZQ==");
    }

    #[tokio::test]
    async fn test_read_to_base64_fails_when_read_fails() {
        let reader = tokio_test::io::Builder::new()
            .read(b"partial")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk went away",
            ))
            .build();

        let result = read_to_base64(reader).await;
        match result {
            Err(crate::error::TallyError::Io(error)) => {
                assert_eq!(error.to_string(), "disk went away");
            }
            other => panic!("Expected Io error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_file_to_base64() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(JPEG_MAGIC).expect("write");

        let encoded = file_to_base64(file.path()).await.expect("encode");
        assert_eq!(encoded, encode_base64(JPEG_MAGIC));
    }

    #[test]
    fn test_detect_media_type_from_magic_bytes() {
        assert_eq!(
            detect_media_type(JPEG_MAGIC, None).as_deref(),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_detect_media_type_falls_back_to_extension() {
        let detected = detect_media_type(b"not really an image", Some(Path::new("scan.png")));
        assert_eq!(detected.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_detect_media_type_ignores_non_images() {
        assert!(detect_media_type(b"%PDF-1.7\n", Some(Path::new("invoice.pdf"))).is_none());
        assert!(detect_media_type(b"plain text", None).is_none());
    }
}
