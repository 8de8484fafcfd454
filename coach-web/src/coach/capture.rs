//! Captured frames and where they come from

/// Encoded still of the current video frame (a JPEG data URI)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    data_uri: String,
}

impl CapturedFrame {
    /// `None` for an empty payload (canvas not ready)
    pub fn from_data_uri(data_uri: impl Into<String>) -> Option<Self> {
        let data_uri = data_uri.into();
        if data_uri.is_empty() || data_uri == "data:," {
            return None;
        }
        Some(Self { data_uri })
    }

    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Takes a still of the frame currently being processed
pub trait FrameSource {
    fn capture(&mut self) -> Option<CapturedFrame>;
}

/// For callers that never capture (e.g. replaying recorded landmarks)
pub struct NoCapture;

impl FrameSource for NoCapture {
    fn capture(&mut self) -> Option<CapturedFrame> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payloads_rejected() {
        assert!(CapturedFrame::from_data_uri("").is_none());
        assert!(CapturedFrame::from_data_uri("data:,").is_none());
        let frame = CapturedFrame::from_data_uri("data:image/jpeg;base64,AAAA").unwrap();
        assert_eq!(frame.as_data_uri(), "data:image/jpeg;base64,AAAA");
    }
}
