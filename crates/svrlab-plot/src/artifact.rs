use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// An encoded image plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotArtifact {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl PlotArtifact {
    pub fn png(bytes: Vec<u8>) -> Self {
        PlotArtifact {
            mime_type: "image/png",
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_round_trip() {
        let artifact = PlotArtifact::png(vec![0x89, b'P', b'N', b'G']);
        let uri = artifact.to_data_uri();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), artifact.bytes);
    }
}
