//! Image dimension probes
//!
//! A probe answers one question asynchronously: how large is the image at
//! this source? Probes may fail independently; callers treat a failure as
//! a layer that cannot move, never as a fatal error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::geometry::Size;

/// Why an image could not be measured
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// No image exists at this source
    #[error("image not found: {0}")]
    NotFound(String),
    /// Source scheme cannot be probed (e.g. remote urls)
    #[error("unsupported image source: {0}")]
    Unsupported(String),
    /// Image exists but its header could not be decoded
    #[error("failed to read image {source_name}: {message}")]
    Decode { source_name: String, message: String },
    /// The probe task itself failed
    #[error("image probe failed for {source_name}: {message}")]
    Task { source_name: String, message: String },
}

/// Asynchronously measure the natural size of an image.
pub trait ImageProbe {
    fn probe<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<Size, ProbeError>>;
}

impl<P: ImageProbe + ?Sized> ImageProbe for &P {
    fn probe<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<Size, ProbeError>> {
        (**self).probe(source)
    }
}

/// Probe backed by a fixed table of known image sizes.
///
/// Sources missing from the table fail with [`ProbeError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    sizes: HashMap<String, Size>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the natural size of `source`
    pub fn with_image(mut self, source: impl Into<String>, width: i64, height: i64) -> Self {
        self.sizes.insert(source.into(), Size::new(width, height));
        self
    }
}

impl ImageProbe for StaticProbe {
    fn probe<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<Size, ProbeError>> {
        let result =
            self.sizes.get(source).copied().ok_or_else(|| ProbeError::NotFound(source.to_string()));
        futures::future::ready(result).boxed()
    }
}

/// Probe that reads image headers from the filesystem.
///
/// Relative sources resolve against `base_dir`; `file://` urls are accepted,
/// any other scheme is [`ProbeError::Unsupported`]. Header decoding runs on
/// tokio's blocking pool, so this probe needs a tokio runtime.
#[derive(Debug, Clone)]
pub struct FileProbe {
    base_dir: PathBuf,
}

impl FileProbe {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Map an image source onto a filesystem path.
    pub fn resolve_path(&self, source: &str) -> Result<PathBuf, ProbeError> {
        let source = source.trim();
        let local = match source.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("file") => rest,
            Some(_) => return Err(ProbeError::Unsupported(source.to_string())),
            None if source.starts_with("data:") || source.starts_with("//") => {
                return Err(ProbeError::Unsupported(source.to_string()))
            }
            None => source,
        };

        // Drop any query string or fragment
        let local = local.split(&['?', '#'][..]).next().unwrap_or(local);

        let path = Path::new(local);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.base_dir.join(path))
        }
    }
}

impl ImageProbe for FileProbe {
    fn probe<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<Size, ProbeError>> {
        async move {
            let path = self.resolve_path(source)?;
            if !path.exists() {
                return Err(ProbeError::NotFound(path.display().to_string()));
            }

            let source_name = source.to_string();
            let decoded = tokio::task::spawn_blocking(move || image::image_dimensions(&path))
                .await
                .map_err(|e| ProbeError::Task {
                    source_name: source_name.clone(),
                    message: e.to_string(),
                })?;

            let (width, height) = decoded
                .map_err(|e| ProbeError::Decode { source_name, message: e.to_string() })?;

            Ok(Size::new(i64::from(width), i64::from(height)))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_static_probe_known_and_missing() {
        let probe = StaticProbe::new().with_image("a.png", 10, 20);
        assert_eq!(probe.probe("a.png").await, Ok(Size::new(10, 20)));
        assert_eq!(probe.probe("b.png").await, Err(ProbeError::NotFound("b.png".to_string())));
    }

    #[test]
    fn test_resolve_path_relative_and_file_url() {
        let probe = FileProbe::new("/srv/site");
        assert_eq!(probe.resolve_path("img/a.png").unwrap(), PathBuf::from("/srv/site/img/a.png"));
        assert_eq!(probe.resolve_path("file:///tmp/b.png").unwrap(), PathBuf::from("/tmp/b.png"));
        assert_eq!(probe.resolve_path("c.png?v=2").unwrap(), PathBuf::from("/srv/site/c.png"));
    }

    #[test]
    fn test_resolve_path_rejects_remote() {
        let probe = FileProbe::new(".");
        let remote =
            ["http://example.com/a.png", "https://x/y.png", "//cdn/a.png", "data:image/png;base64,AA"];
        for source in remote {
            let result = probe.resolve_path(source);
            assert!(matches!(result, Err(ProbeError::Unsupported(_))), "{}", source);
        }
    }

    #[tokio::test]
    async fn test_file_probe_reads_dimensions() {
        let temp = TempDir::new().expect("should create temp dir");
        RgbaImage::new(37, 12).save(temp.path().join("tile.png")).expect("should write png");

        let probe = FileProbe::new(temp.path());
        assert_eq!(probe.probe("tile.png").await, Ok(Size::new(37, 12)));
    }

    #[tokio::test]
    async fn test_file_probe_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let probe = FileProbe::new(temp.path());
        assert!(matches!(probe.probe("nope.png").await, Err(ProbeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_probe_not_an_image() {
        let temp = TempDir::new().expect("should create temp dir");
        std::fs::write(temp.path().join("bad.png"), b"not an image").expect("should write file");

        let probe = FileProbe::new(temp.path());
        assert!(matches!(probe.probe("bad.png").await, Err(ProbeError::Decode { .. })));
    }
}
