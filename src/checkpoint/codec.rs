//! Context codecs.

use crate::checkpoint::error::CheckpointError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts a machine context to and from the string stored in a checkpoint.
///
/// The machine does not care about the encoding; it only stores whatever
/// string the codec produces.
///
/// # Example
///
/// ```rust
/// use switchyard::checkpoint::{CheckpointError, ContextCodec};
///
/// struct Door {
///     openness: u8,
/// }
///
/// struct OpennessCodec;
///
/// impl ContextCodec<Door> for OpennessCodec {
///     fn encode(&self, context: &Door) -> Result<String, CheckpointError> {
///         Ok(context.openness.to_string())
///     }
///
///     fn decode(&self, raw: &str) -> Result<Door, CheckpointError> {
///         raw.parse()
///             .map(|openness| Door { openness })
///             .map_err(|e| CheckpointError::DeserializationFailed(format!("{e}")))
///     }
/// }
///
/// let encoded = OpennessCodec.encode(&Door { openness: 42 }).unwrap();
/// assert_eq!(encoded, "42");
/// assert_eq!(OpennessCodec.decode("7").unwrap().openness, 7);
/// ```
pub trait ContextCodec<C>: Send + Sync {
    fn encode(&self, context: &C) -> Result<String, CheckpointError>;

    fn decode(&self, raw: &str) -> Result<C, CheckpointError>;
}

/// Codec storing the context as its serde JSON representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<C> ContextCodec<C> for JsonCodec
where
    C: Serialize + DeserializeOwned,
{
    fn encode(&self, context: &C) -> Result<String, CheckpointError> {
        serde_json::to_string(context)
            .map_err(|e| CheckpointError::SerializationFailed(format!("{}", e)))
    }

    fn decode(&self, raw: &str) -> Result<C, CheckpointError> {
        serde_json::from_str(raw)
            .map_err(|e| CheckpointError::DeserializationFailed(format!("{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Door {
        openness: u8,
        label: String,
    }

    #[test]
    fn json_codec_encodes_context() {
        let door = Door {
            openness: 99,
            label: "front".to_string(),
        };

        let encoded = JsonCodec.encode(&door).unwrap();

        assert_eq!(encoded, r#"{"openness":99,"label":"front"}"#);
    }

    #[test]
    fn json_codec_decodes_context() {
        let decoded: Door = JsonCodec.decode(r#"{"openness":1,"label":"back"}"#).unwrap();

        assert_eq!(
            decoded,
            Door {
                openness: 1,
                label: "back".to_string()
            }
        );
    }

    #[test]
    fn json_codec_rejects_malformed_input() {
        let result: Result<Door, _> = JsonCodec.decode("{not json");

        assert!(matches!(
            result,
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }
}
