//! # Validator Reference Data Flows
//!
//! Staking slots and the session-wide bonded-validator cache.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tx_composer::{fields, CacheStatus, ComposerApi, FieldError, MsgTypeId};

    use crate::fixtures::*;

    #[tokio::test(start_paused = true)]
    async fn test_slots_created_before_validators_arrive() {
        let mut h = HarnessBuilder::new(hub(), ALICE)
            .loader_delay(Duration::from_millis(200))
            .build();

        let delegate = h
            .service
            .add_message_type_requiring_validator_data(MsgTypeId::Delegate);
        let redelegate = h
            .service
            .add_message_type_requiring_validator_data(MsgTypeId::BeginRedelegate);
        assert_eq!(h.service.slots().len(), 2);
        assert!(h.service.validator_options(delegate).unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.service.validator_cache().status(), CacheStatus::Loading);
        let withdraw = h
            .service
            .add_message_type_requiring_validator_data(MsgTypeId::WithdrawDelegatorReward);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(h.service.validator_cache().status(), CacheStatus::Loaded);
        assert_eq!(h.loader.calls(), 1);
        for slot in [delegate, redelegate, withdraw] {
            let options = h.service.validator_options(slot).unwrap();
            assert_eq!(options, validators());
        }
    }

    #[tokio::test]
    async fn test_non_staking_slot_has_no_options() {
        let mut h = hub_harness();
        h.service
            .add_message_type_requiring_validator_data(MsgTypeId::Delegate);
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.validator_cache().load().await;

        assert!(h.service.validator_options(send).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_empty_options_and_retries() {
        let mut h = HarnessBuilder::new(hub(), ALICE).loader_failing().build();
        let first = h
            .service
            .add_message_type_requiring_validator_data(MsgTypeId::Undelegate);
        h.service.validator_cache().load().await;

        assert_eq!(h.service.validator_cache().status(), CacheStatus::Unloaded);
        assert!(h.service.validator_options(first).unwrap().is_empty());

        h.service.validator_cache().load().await;
        assert!(h.loader.calls() >= 2);
    }

    #[tokio::test]
    async fn test_staking_messages_build_without_loaded_set() {
        let mut h = hub_harness();
        let delegate = h.service.add_message_type(MsgTypeId::Delegate);
        let redelegate = h.service.add_message_type(MsgTypeId::BeginRedelegate);
        h.service
            .edit_field(delegate, fields::VALIDATOR_ADDRESS, VALOPER_A)
            .await
            .unwrap();
        h.service.edit_field(delegate, fields::AMOUNT, "3").await.unwrap();
        h.service
            .edit_field(redelegate, fields::VALIDATOR_SRC_ADDRESS, VALOPER_A)
            .await
            .unwrap();
        h.service
            .edit_field(redelegate, fields::VALIDATOR_DST_ADDRESS, VALOPER_A)
            .await
            .unwrap();
        h.service.edit_field(redelegate, fields::AMOUNT, "3").await.unwrap();

        assert!(h.service.build().is_err());
        assert_eq!(
            h.service
                .slot_errors(redelegate)
                .unwrap()
                .get(fields::VALIDATOR_DST_ADDRESS),
            Some(&FieldError::SameValidator)
        );

        h.service
            .edit_field(redelegate, fields::VALIDATOR_DST_ADDRESS, VALOPER_B)
            .await
            .unwrap();
        let draft = h.service.build().unwrap();
        assert_eq!(draft.msgs[1].value["validatorDstAddress"], VALOPER_B);
        assert_eq!(h.loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_staking_rejects_foreign_denom() {
        let mut h = hub_harness();
        let delegate = h.service.add_message_type(MsgTypeId::Delegate);
        h.service
            .edit_field(delegate, fields::VALIDATOR_ADDRESS, VALOPER_A)
            .await
            .unwrap();
        h.service.edit_field(delegate, fields::DENOM, "custom").await.unwrap();
        h.service
            .edit_field(delegate, fields::CUSTOM_DENOM, "uosmo")
            .await
            .unwrap();
        h.service.edit_field(delegate, fields::AMOUNT, "4").await.unwrap();

        assert!(!h.service.is_slot_valid(delegate).unwrap());
        assert!(matches!(
            h.service.slot_errors(delegate).unwrap().get(fields::DENOM),
            Some(FieldError::WrongDenom { .. })
        ));
    }
}
