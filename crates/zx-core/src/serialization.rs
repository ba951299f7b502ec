use crate::errors::{ErrorInfo, ZxError};
use crate::diagram::ZxDiagram;

fn serde_error(code: &str, err: impl ToString) -> ZxError {
    ZxError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serializes a diagram to pretty JSON.
pub fn diagram_to_json(diagram: &ZxDiagram) -> Result<String, ZxError> {
    serde_json::to_string_pretty(diagram).map_err(|err| serde_error("json-encode", err))
}

/// Deserializes and validates a diagram from JSON.
pub fn diagram_from_json(payload: &str) -> Result<ZxDiagram, ZxError> {
    let diagram: ZxDiagram =
        serde_json::from_str(payload).map_err(|err| serde_error("json-decode", err))?;
    diagram.validate()?;
    Ok(diagram)
}

/// Serializes a diagram to a compact byte payload.
pub fn diagram_to_bytes(diagram: &ZxDiagram) -> Result<Vec<u8>, ZxError> {
    bincode::serialize(diagram).map_err(|err| serde_error("bincode-encode", err))
}

/// Deserializes and validates a diagram from a byte payload.
pub fn diagram_from_bytes(payload: &[u8]) -> Result<ZxDiagram, ZxError> {
    let diagram: ZxDiagram =
        bincode::deserialize(payload).map_err(|err| serde_error("bincode-decode", err))?;
    diagram.validate()?;
    Ok(diagram)
}
