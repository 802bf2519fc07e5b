//! # Confidential Execution Flows
//!
//! Contract execution on a chain that requires client-side encryption:
//! code hash lookup, derivation ordering and the assembled message shape.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::Value;
    use shared_crypto::open;
    use tx_composer::{
        fields, CollaboratorError, ComposerApi, ComposerConfig, ComposerError, FieldError,
        MessageUnit, MockConfidentialEndpoint, MsgTypeId, SlotKey,
    };

    use crate::fixtures::*;

    const CONTRACT_ON_HUB: &str =
        "cosmos1pyysjzgfpyysjzgfpyysjzgfpyysjzgfpyysjzgfpyysjzgfpyysrhqpcg";

    fn decrypt_body(msg_value: &Value) -> String {
        let sealed = STANDARD
            .decode(msg_value["msg"].as_str().expect("encrypted body is a string"))
            .unwrap();
        String::from_utf8(open(&CHAIN_SECRET, &sealed).unwrap()).unwrap()
    }

    async fn execute_slot(h: &mut Harness, body: &str) -> SlotKey {
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);
        h.service
            .edit_field(slot, fields::CONTRACT_ADDRESS, SCRT_CONTRACT)
            .await
            .unwrap();
        h.service.edit_body(slot, body, false).await.unwrap();
        slot
    }

    // =========================================================================
    // LOOKUP AND ENCRYPTION
    // =========================================================================

    #[tokio::test]
    async fn test_missing_code_hash_then_lookup_then_valid() {
        let mut h = confidential_harness();
        let slot = execute_slot(&mut h, r#"{ "swap": { "min_out": "5", "asset": "uscrt" } }"#).await;

        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert_eq!(
            h.service.slot_errors(slot).unwrap().get(fields::CODE_HASH),
            Some(&FieldError::MissingCodeHash)
        );
        assert_eq!(h.endpoint.key_fetches(), 0);

        let code_hash = h.service.fetch_code_hash(slot).await.unwrap();
        assert_eq!(code_hash, SCRT_CODE_HASH);
        assert_eq!(h.endpoint.key_fetches(), 1);
        assert!(h.service.is_slot_valid(slot).unwrap());
        assert!(h.service.slot_errors(slot).unwrap().is_empty());

        let id = h.service.submit().await.unwrap();
        let stored = h.store.get(&id).unwrap();
        let msg = &stored.draft.msgs[0];
        assert_eq!(msg.type_url, "/cosmwasm.wasm.v1.MsgExecuteContract");
        assert_eq!(msg.value["sender"], SCRT_SENDER);
        assert_eq!(msg.value["contract"], SCRT_CONTRACT);
        assert!(msg.value.get("encryptedMsg").is_none());
        assert_eq!(
            decrypt_body(&msg.value),
            format!(r#"{SCRT_CODE_HASH}{{"swap":{{"asset":"uscrt","min_out":"5"}}}}"#)
        );
    }

    #[tokio::test]
    async fn test_edit_after_encryption_is_pending_until_rederived() {
        let mut h = confidential_harness();
        let slot = execute_slot(&mut h, r#"{"a":1}"#).await;
        h.service.fetch_code_hash(slot).await.unwrap();
        assert!(h.service.is_slot_valid(slot).unwrap());

        let ticket = h
            .service
            .edit_field_deferred(slot, fields::BODY, r#"{"a":2}"#)
            .unwrap()
            .expect("body change issues a derivation");
        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert_eq!(
            h.service.slot_errors(slot).unwrap().get(fields::BODY),
            Some(&FieldError::EncryptionPending)
        );

        let outcome = h.service.derive(ticket).await;
        assert!(h.service.apply_derivation(outcome));
        assert!(h.service.is_slot_valid(slot).unwrap());
        let draft = h.service.build().unwrap();
        assert_eq!(
            decrypt_body(&draft.msgs[0].value),
            format!(r#"{SCRT_CODE_HASH}{{"a":2}}"#)
        );
    }

    #[tokio::test]
    async fn test_unknown_contract_lookup_failure_recorded() {
        let mut h = confidential_harness();
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);
        h.service
            .edit_field(slot, fields::CONTRACT_ADDRESS, SCRT_SENDER)
            .await
            .unwrap();

        let err = h.service.fetch_code_hash(slot).await.unwrap_err();
        assert!(matches!(
            err,
            ComposerError::CodeHashLookup(CollaboratorError::LookupFailed(_))
        ));
        let unit = h.service.slot(slot).unwrap().unit();
        assert!(matches!(
            unit.confidential().unwrap().lookup_error(),
            Some(FieldError::CodeHashLookupFailed(_))
        ));
        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert!(matches!(
            h.service.slot_errors(slot).unwrap().get(fields::CODE_HASH),
            Some(FieldError::CodeHashLookupFailed(_))
        ));
        assert_eq!(
            h.service.slot(slot).unwrap().unit().errors().get(fields::CODE_HASH),
            Some(&FieldError::MissingCodeHash)
        );
    }

    #[tokio::test]
    async fn test_lookup_without_contract_skips_endpoint() {
        let mut h = confidential_harness();
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);

        assert!(h.service.fetch_code_hash(slot).await.is_err());
        assert_eq!(h.endpoint.code_hash_queries(), 0);
        assert_eq!(
            h.service.slot_errors(slot).unwrap().get(fields::CONTRACT_ADDRESS),
            Some(&FieldError::Required)
        );
    }

    #[tokio::test]
    async fn test_key_fetch_failure_distinct_from_missing_hash() {
        let mut h = HarnessBuilder::new(confidential_chain(), SCRT_SENDER)
            .endpoint(endpoint().failing_key_fetch())
            .build();
        let slot = execute_slot(&mut h, "{}").await;
        h.service.fetch_code_hash(slot).await.unwrap();

        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert!(matches!(
            h.service.slot_errors(slot).unwrap().get(fields::ENDPOINT),
            Some(FieldError::EndpointFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_cleared_endpoint_reported() {
        let mut h = confidential_harness();
        let slot = execute_slot(&mut h, "{}").await;
        h.service.edit_field(slot, fields::ENDPOINT, "").await.unwrap();

        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert_eq!(
            h.service.slot_errors(slot).unwrap().get(fields::ENDPOINT),
            Some(&FieldError::MissingEndpoint)
        );
        assert!(matches!(
            h.service.fetch_code_hash(slot).await,
            Err(ComposerError::CodeHashLookup(CollaboratorError::Unreachable(_)))
        ));
    }

    #[tokio::test]
    async fn test_plain_chain_sends_plaintext_body() {
        let mut h = hub_harness();
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);
        h.service
            .edit_field(slot, fields::CONTRACT_ADDRESS, CONTRACT_ON_HUB)
            .await
            .unwrap();
        h.service.edit_body(slot, r#"{"b":1,"a":0}"#, false).await.unwrap();
        assert_eq!(
            h.service.edit_field(slot, fields::CODE_HASH, "x").await,
            Err(ComposerError::NotConfidential(MsgTypeId::ExecuteContract))
        );

        let draft = h.service.build().unwrap();
        assert_eq!(draft.msgs[0].value["msg"], serde_json::json!({"a": 0, "b": 1}));
        assert!(draft.msgs[0].value.get("encryptedMsg").is_none());
        assert_eq!(h.endpoint.key_fetches(), 0);
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_later_edit_wins_when_it_completes_first() {
        let mut h = HarnessBuilder::new(confidential_chain(), SCRT_SENDER)
            .endpoint(
                MockConfidentialEndpoint::new(CHAIN_SECRET)
                    .with_code_hash(SCRT_CONTRACT, SCRT_CODE_HASH)
                    .with_delays([Duration::from_millis(50), Duration::from_millis(10)]),
            )
            .build();
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);
        h.service
            .edit_field_deferred(slot, fields::CONTRACT_ADDRESS, SCRT_CONTRACT)
            .unwrap();
        h.service
            .edit_field_deferred(slot, fields::CODE_HASH, SCRT_CODE_HASH)
            .unwrap();

        let t1 = h
            .service
            .edit_field_deferred(slot, fields::BODY, r#"{"v":1}"#)
            .unwrap()
            .unwrap();
        let t2 = h
            .service
            .edit_field_deferred(slot, fields::BODY, r#"{"v":2}"#)
            .unwrap()
            .unwrap();
        assert!(t2.seq > t1.seq);

        let mut completed = Vec::new();
        {
            let service = &h.service;
            let first = async {
                let outcome = service.derive(t1).await;
                (tokio::time::Instant::now(), outcome)
            };
            let second = async {
                let outcome = service.derive(t2).await;
                (tokio::time::Instant::now(), outcome)
            };
            let (a, b) = tokio::join!(first, second);
            completed.push(a);
            completed.push(b);
        }
        completed.sort_by_key(|(at, _)| *at);

        let applied: Vec<bool> = completed
            .into_iter()
            .map(|(_, outcome)| h.service.apply_derivation(outcome))
            .collect();
        assert_eq!(applied, vec![true, false]);

        let draft = h.service.build().unwrap();
        assert_eq!(
            decrypt_body(&draft.msgs[0].value),
            format!(r#"{SCRT_CODE_HASH}{{"v":2}}"#)
        );
    }

    #[tokio::test]
    async fn test_replaced_unit_ignores_in_flight_derivation() {
        let mut h = confidential_harness();
        let slot = h.service.add_message_type(MsgTypeId::ExecuteContract);
        h.service
            .edit_field_deferred(slot, fields::CONTRACT_ADDRESS, SCRT_CONTRACT)
            .unwrap();
        h.service
            .edit_field_deferred(slot, fields::BODY, r#"{"old":1}"#)
            .unwrap();
        let in_flight = h
            .service
            .edit_field_deferred(slot, fields::CODE_HASH, SCRT_CODE_HASH)
            .unwrap()
            .unwrap();

        let mut replacement = MessageUnit::new(
            MsgTypeId::ExecuteContract,
            &confidential_chain(),
            &ComposerConfig::for_testing(),
        );
        replacement
            .set_field(fields::CONTRACT_ADDRESS, SCRT_CONTRACT)
            .unwrap();
        replacement.set_field(fields::BODY, r#"{"new":2}"#).unwrap();
        replacement
            .set_field(fields::CODE_HASH, SCRT_CODE_HASH)
            .unwrap();
        h.service.set_unit_for_slot(0, replacement).unwrap();

        let outcome = h.service.derive(in_flight).await;
        assert!(!h.service.apply_derivation(outcome));
        assert!(!h.service.is_slot_valid(slot).unwrap());
        assert!(h.service.build().is_err());

        let fresh = h
            .service
            .edit_field_deferred(slot, fields::BODY, r#"{"new":2}"#)
            .unwrap()
            .expect("replacement issues its own derivation");
        let outcome = h.service.derive(fresh).await;
        assert!(h.service.apply_derivation(outcome));

        let draft = h.service.build().unwrap();
        assert_eq!(
            decrypt_body(&draft.msgs[0].value),
            format!(r#"{SCRT_CODE_HASH}{{"new":2}}"#)
        );
    }

    #[tokio::test]
    async fn test_outcome_for_removed_slot_dropped() {
        let mut h = confidential_harness();
        let doomed = h.service.add_message_type(MsgTypeId::ExecuteContract);
        let kept = execute_slot(&mut h, r#"{"keep":true}"#).await;
        h.service.fetch_code_hash(kept).await.unwrap();

        h.service
            .edit_field_deferred(doomed, fields::CONTRACT_ADDRESS, SCRT_CONTRACT)
            .unwrap();
        h.service.edit_field_deferred(doomed, fields::BODY, "{}").unwrap();
        let ticket = h
            .service
            .edit_field_deferred(doomed, fields::CODE_HASH, SCRT_CODE_HASH)
            .unwrap()
            .unwrap();

        h.service.remove_slot(0).unwrap();
        let outcome = h.service.derive(ticket).await;
        assert!(!h.service.apply_derivation(outcome));

        let draft = h.service.build().unwrap();
        assert_eq!(draft.msgs.len(), 1);
        assert_eq!(
            decrypt_body(&draft.msgs[0].value),
            format!(r#"{SCRT_CODE_HASH}{{"keep":true}}"#)
        );
    }
}
