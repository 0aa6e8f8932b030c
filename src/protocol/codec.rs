use super::*;

/// Line codec between wire text and protocol messages.
/// Centralizes framing so transports only ever move whole lines.
pub struct Protocol;

impl Protocol {
    pub fn encode(message: &ServerMessage) -> String {
        serde_json::to_string(message).expect("serialize server message")
    }
    pub fn decode(line: &str) -> Result<ClientMessage, Fault> {
        serde_json::from_str(line.trim()).map_err(|_| Fault::MalformedMessage(line.to_string()))
    }
    /// Client side of the codec.
    pub fn request(message: &ClientMessage) -> String {
        serde_json::to_string(message).expect("serialize client message")
    }
    /// Client side of the codec.
    pub fn response(line: &str) -> Result<ServerMessage, Fault> {
        serde_json::from_str(line.trim()).map_err(|_| Fault::MalformedMessage(line.to_string()))
    }
}
