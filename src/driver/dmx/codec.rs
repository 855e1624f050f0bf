//! ENTTEC USB PRO codec
//!
//! 0x7e   0x06   len_lo  len_hi  data ...  0xe7
//! start  label  payload length LE         end

use tokio_util::{
    bytes::{BufMut, BytesMut},
    codec::Encoder,
};
use super::entity::*;
use super::prelude::DMX_UNIVERSE_MAX_LEN;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnttecProCodec;

impl Encoder<EnttecFrame> for EnttecProCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: EnttecFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.payload.len() > DMX_UNIVERSE_MAX_LEN {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("payload too long for a dmx packet: {}", item.payload.len()),
            ));
        }
        dst.reserve(item.encoded_len());
        dst.put_u8(ENTTEC_START_OF_MESSAGE);
        dst.put_u8(item.label as u8);
        dst.put_u16_le(item.payload.len() as u16);
        dst.put_slice(&item.payload);
        dst.put_u8(ENTTEC_END_OF_MESSAGE);
        Ok(())
    }
}
