// Transport-safe chart payload.

use base64::Engine;
use serde::Serialize;

use crate::error::RenderError;

pub const SVG_MIME: &str = "image/svg+xml";

/// One rendered chart: an SVG document, base64-encoded (standard alphabet, padded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartArtifact {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub data: String,
}

impl ChartArtifact {
    pub fn from_svg(svg: &str, width: u32, height: u32) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD;
        Self {
            mime_type: SVG_MIME,
            width,
            height,
            data: b64.encode(svg.as_bytes()),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// The raw document bytes.
    pub fn decode(&self) -> Result<Vec<u8>, RenderError> {
        let b64 = base64::engine::general_purpose::STANDARD;
        b64.decode(&self.data)
            .map_err(|e| RenderError::Encode(format!("invalid artifact base64: {e}")))
    }
}
