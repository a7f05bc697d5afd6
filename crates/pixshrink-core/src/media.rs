//! Accepted media types and the source file held by a session.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Image formats the compressor accepts. Output always keeps the input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl MediaType {
    /// All accepted types, in picker order.
    pub const ALL: [MediaType; 2] = [MediaType::Jpeg, MediaType::Png];

    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    /// Primary file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            MediaType::Jpeg => image::ImageFormat::Jpeg,
            MediaType::Png => image::ImageFormat::Png,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Parse a declared MIME string. Case-insensitive; parameters after `;` are ignored.
impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("image/jpeg") {
            Ok(MediaType::Jpeg)
        } else if essence.eq_ignore_ascii_case("image/png") {
            Ok(MediaType::Png)
        } else {
            Err(s.to_string())
        }
    }
}

/// A file handed to the compressor by the host.
///
/// The payload is shared behind an `Arc` so a pipeline run can read it while
/// the controller keeps ownership. Nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    declared_type: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Display name, as given by the host.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The MIME string the host declared. Not verified against the bytes.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The shared payload, for handing to another owner without copying.
    pub fn bytes_arc(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The declared type, if it is one we accept.
    pub fn media_type(&self) -> Option<MediaType> {
        self.declared_type.parse().ok()
    }
}
