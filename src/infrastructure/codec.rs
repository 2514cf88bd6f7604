// Wire codec - `[kind, payload]` text frames to inbound messages
use crate::domain::message::{InboundMessage, SETUP_TOPOLOGY, UPDATE_DATA};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not a [kind, payload] pair")]
    Shape,

    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one inbound text frame.
///
/// Unknown kinds are not an error; they decode to [`InboundMessage::Unknown`]
/// so the caller can log and move on.
pub fn decode_frame(text: &str) -> Result<InboundMessage, ProtocolError> {
    let frame: Value = serde_json::from_str(text)?;
    let (kind, payload) = match frame {
        Value::Array(mut parts) if parts.len() == 2 => {
            let payload = parts.pop().unwrap_or(Value::Null);
            match parts.pop() {
                Some(Value::String(kind)) => (kind, payload),
                _ => return Err(ProtocolError::Shape),
            }
        }
        _ => return Err(ProtocolError::Shape),
    };

    let payload_error = |source| ProtocolError::Payload {
        kind: kind.clone(),
        source,
    };

    match kind.as_str() {
        SETUP_TOPOLOGY => serde_json::from_value(payload)
            .map(InboundMessage::SetupTopology)
            .map_err(payload_error),
        UPDATE_DATA => serde_json::from_value(payload)
            .map(InboundMessage::UpdateData)
            .map_err(payload_error),
        other => Ok(InboundMessage::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::Reading;

    #[test]
    fn test_decode_setup() {
        let message = decode_frame(
            r#"["setup_topology", {
                "etypes": {"PV": {"cls": "pv", "min": 0, "max": 5, "unit": "kW"}},
                "nodes": [{"name": "PV1", "type": "PV"}],
                "links": [],
                "time": 0, "disable_heatmap": true, "start_date": "2014-01-01 00:00:00",
                "update_interval": 60, "timeline_hours": 2}]"#,
        )
        .unwrap();
        let InboundMessage::SetupTopology(setup) = message else {
            panic!("expected setup");
        };
        assert!(setup.disable_heatmap);
        assert_eq!(setup.nodes[0].name, "PV1");
        assert_eq!(setup.etypes["PV"].max, 5.0);
    }

    #[test]
    fn test_decode_update_with_null_value() {
        let message = decode_frame(
            r#"["update_data", {"progress": 3.5, "time": 60, "node_data": [{"N1": {"value": null}, "N2": {"value": 4}}]}]"#,
        )
        .unwrap();
        let InboundMessage::UpdateData(update) = message else {
            panic!("expected update");
        };
        let snapshot = update.latest().unwrap();
        assert_eq!(snapshot["N1"].value, Reading::Missing);
        assert_eq!(snapshot["N2"].value.scalar(), Some(4.0));
    }

    #[test]
    fn test_unknown_kind_is_not_an_error() {
        assert_eq!(
            decode_frame(r#"["shutdown", null]"#).unwrap(),
            InboundMessage::Unknown("shutdown".to_string())
        );
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(decode_frame("not json"), Err(ProtocolError::Json(_))));
        assert!(matches!(decode_frame(r#"["update_data"]"#), Err(ProtocolError::Shape)));
        assert!(matches!(decode_frame(r#"[1, {}]"#), Err(ProtocolError::Shape)));
        assert!(matches!(decode_frame(r#"{"kind": "x"}"#), Err(ProtocolError::Shape)));
        assert!(matches!(
            decode_frame(r#"["update_data", {"progress": 1}]"#),
            Err(ProtocolError::Payload { .. })
        ));
    }
}
