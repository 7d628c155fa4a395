//! Property tests for envelope decoding.
//!
//! 1. Arbitrary bytes never panic in `ApiEnvelope::from_slice`.
//! 2. Any non-zero code surfaces as `EnvelopeError::Api` with the message intact.
//! 3. A zero code always hands back the payload unchanged.

use dida_proto::envelope::{ApiEnvelope, CODE_OK, EnvelopeError};
use proptest::prelude::*;
use serde_json::Value;

proptest! {
    #[test]
    fn random_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = ApiEnvelope::from_slice(&bytes);
    }

    #[test]
    fn non_zero_code_is_api_error(
        code in any::<i32>().prop_filter("non-zero", |c| *c != CODE_OK),
        message in "[^\x00]{0,64}",
    ) {
        let body = serde_json::to_vec(&ApiEnvelope::error(code, message.clone())).unwrap();
        let err = ApiEnvelope::from_slice(&body).unwrap().into_data::<Value>().unwrap_err();
        match err {
            EnvelopeError::Api { code: got, message: got_message } => {
                prop_assert_eq!(got, code);
                prop_assert_eq!(got_message, message);
            }
            EnvelopeError::Decode(e) => prop_assert!(false, "unexpected decode error: {}", e),
        }
    }

    #[test]
    fn zero_code_returns_payload(data in "[^\x00]{0,128}") {
        let body = serde_json::to_vec(&ApiEnvelope::ok(data.clone())).unwrap();
        let decoded: String = ApiEnvelope::from_slice(&body).unwrap().into_data().unwrap();
        prop_assert_eq!(decoded, data);
    }
}
