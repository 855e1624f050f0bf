use super::prelude::*;
use super::universe::Universe;

// ENTTEC USB PRO message delimiters
pub const ENTTEC_START_OF_MESSAGE: u8 = 0x7e;
pub const ENTTEC_END_OF_MESSAGE: u8 = 0xe7;

/// ENTTEC USB PRO request labels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnttecLabel {
    // Output Only Send DMX Packet Request
    SendDmx = 6,
}

/// one ENTTEC frame, built fresh from the universe for every send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnttecFrame {
    pub label: EnttecLabel,
    pub payload: Vec<DmxValue>,
}

impl EnttecFrame {
    /// send dmx request carrying the full universe
    pub fn send_dmx(universe: &Universe) -> Self {
        EnttecFrame {
            label: EnttecLabel::SendDmx,
            payload: universe.as_slice().to_vec(),
        }
    }

    /// header + payload + footer
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len() + 1
    }
}
