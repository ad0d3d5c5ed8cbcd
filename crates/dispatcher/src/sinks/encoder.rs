//! Batch encoders - turn a parsed batch into file content

use std::collections::HashMap;

use contracts::{Track, PARAM_LINK_PREFIX, PARAM_PRETTY};

/// Prefix used by link lists when none is configured
pub const DEFAULT_LINK_PREFIX: &str = "https://open.spotify.com/track/";

/// Serializes the tracks of one batch
pub trait BatchEncoder: Send + 'static {
    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    /// Encode tracks in input order
    fn encode(&self, tracks: &[Track]) -> Result<Vec<u8>, String>;
}

/// JSON array of track objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Create from params map (for factory)
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let pretty = match params.get(PARAM_PRETTY) {
            Some(value) => value
                .parse::<bool>()
                .map_err(|_| format!("{} must be 'true' or 'false', got '{}'", PARAM_PRETTY, value))?,
            None => false,
        };
        Ok(Self::new(pretty))
    }
}

impl BatchEncoder for JsonEncoder {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, tracks: &[Track]) -> Result<Vec<u8>, String> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(tracks)
        } else {
            serde_json::to_vec(tracks)
        };
        result.map_err(|e| e.to_string())
    }
}

/// One track URL per line
#[derive(Debug, Clone)]
pub struct LinkListEncoder {
    prefix: String,
}

impl LinkListEncoder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        match params.get(PARAM_LINK_PREFIX) {
            Some(prefix) if prefix.is_empty() => Err(format!("{} must not be empty", PARAM_LINK_PREFIX)),
            Some(prefix) => Ok(Self::new(prefix.as_str())),
            None => Ok(Self::default()),
        }
    }
}

impl Default for LinkListEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_PREFIX)
    }
}

impl BatchEncoder for LinkListEncoder {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn encode(&self, tracks: &[Track]) -> Result<Vec<u8>, String> {
        let mut out = String::with_capacity(tracks.len() * (self.prefix.len() + 23));
        for track in tracks {
            out.push_str(&self.prefix);
            out.push_str(track.spotify_id());
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<Track> {
        vec![
            Track::new("id1", "t1", "al1", "ar1"),
            Track::new("id2", "t2", "al2", "ar2"),
        ]
    }

    #[test]
    fn test_json_compact() {
        let bytes = JsonEncoder::default().encode(&tracks()[..1]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[{"artist_name":"ar1","track_name":"t1","album_name":"al1","spotfy_id":"id1"}]"#
        );
    }

    #[test]
    fn test_json_empty_batch() {
        let bytes = JsonEncoder::default().encode(&[]).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_json_pretty_param() {
        let params = HashMap::from([(PARAM_PRETTY.to_string(), "true".to_string())]);
        let encoder = JsonEncoder::from_params(&params).unwrap();
        let text = String::from_utf8(encoder.encode(&tracks()).unwrap()).unwrap();
        assert!(text.starts_with("[\n  {"));

        let bad = HashMap::from([(PARAM_PRETTY.to_string(), "yes".to_string())]);
        assert!(JsonEncoder::from_params(&bad).is_err());
    }

    #[test]
    fn test_link_list() {
        let bytes = LinkListEncoder::default().encode(&tracks()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "https://open.spotify.com/track/id1\nhttps://open.spotify.com/track/id2\n"
        );
        assert!(LinkListEncoder::default().encode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_link_prefix_param() {
        let params = HashMap::from([(PARAM_LINK_PREFIX.to_string(), "spotify:track:".to_string())]);
        let encoder = LinkListEncoder::from_params(&params).unwrap();
        let bytes = encoder.encode(&tracks()[1..]).unwrap();
        assert_eq!(bytes, b"spotify:track:id2\n");
    }
}
