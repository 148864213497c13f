//! Structured message types.
//!
//! Anything stored as a record is a [`Message`]: a serde type with a stable,
//! fully-qualified type identifier. Bytes are CBOR.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};

pub trait Message: Serialize + DeserializeOwned {
    /// Fully-qualified type identifier, e.g. `"io.acme.loan.Borrower"`.
    const TYPE_NAME: &'static str;

    /// Serialize to CBOR bytes.
    fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| CoreError::EncodingError {
            type_name: Self::TYPE_NAME.to_string(),
            reason: e.to_string(),
        })?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    fn decode(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError {
            type_name: Self::TYPE_NAME.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ping {
        nonce: u64,
    }

    impl Message for Ping {
        const TYPE_NAME: &'static str = "test.Ping";
    }

    #[test]
    fn test_decode_garbage_names_type() {
        let err = Ping::decode(&[0xff, 0x00]).unwrap_err();
        match err {
            CoreError::DecodingError { type_name, .. } => assert_eq!(type_name, "test.Ping"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encode_decode() {
        let ping = Ping { nonce: 7 };
        assert_eq!(Ping::decode(&ping.encode().unwrap()).unwrap(), ping);
    }
}
