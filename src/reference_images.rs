use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::ImageFormat;
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error_codes::CodedError;

pub const MAX_REFERENCE_IMAGES: usize = 4;

/// One base64-encoded reference image, ready to be attached to a request as
/// an inline data part.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceImage {
    pub id: String,
    pub mime_type: String,
    pub source: PathBuf,
    pub byte_len: usize,
    #[serde(skip_serializing)]
    pub data: String,
}

impl ReferenceImage {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read reference image {}", path.display()))?;
        let format = image::guess_format(&bytes).map_err(|_| {
            anyhow!(CodedError::usage(
                "UNSUPPORTED_IMAGE",
                "only image files are supported",
            )
            .with_details(json!({ "path": path.display().to_string() })))
        })?;
        let mime_type = mime_type_for(format)
            .ok_or_else(|| {
                anyhow!(CodedError::usage(
                    "UNSUPPORTED_IMAGE",
                    format!("unsupported image format {format:?}"),
                )
                .with_details(json!({ "path": path.display().to_string() })))
            })?
            .to_owned();

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        // 12 hex chars is plenty to tell four images apart.
        let id = digest
            .iter()
            .take(6)
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();

        Ok(Self {
            id,
            mime_type,
            source: path.to_owned(),
            byte_len: bytes.len(),
            data: BASE64.encode(&bytes),
        })
    }
}

fn mime_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Bounded collection of reference images. Mirrors the upload tray: at most
/// four images, and an over-cap batch is rejected whole without touching the
/// images already present.
#[derive(Debug, Clone, Default)]
pub struct ReferenceImageSet {
    images: Vec<ReferenceImage>,
}

impl ReferenceImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut set = Self::new();
        set.add_files(paths)?;
        Ok(set)
    }

    /// Atomic batch add: every file is validated and the cap is checked
    /// before anything is inserted.
    pub fn add_files(&mut self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        if self.images.len() + paths.len() > MAX_REFERENCE_IMAGES {
            return Err(anyhow!(CodedError::usage(
                "TOO_MANY_IMAGES",
                format!("a maximum of {MAX_REFERENCE_IMAGES} reference images is allowed"),
            )
            .with_details(json!({
                "current": self.images.len(),
                "adding": paths.len(),
                "max": MAX_REFERENCE_IMAGES
            }))));
        }

        let loaded = paths
            .iter()
            .map(|path| ReferenceImage::load(path))
            .collect::<Result<Vec<_>>>()?;
        self.images.extend(loaded);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        self.images.len() != before
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.images.iter()
    }
}
