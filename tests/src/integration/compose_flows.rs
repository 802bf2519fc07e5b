//! # Composition Flows
//!
//! Multi-message drafts on a plain chain: ordering, gas, all-or-nothing
//! assembly and persistence.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use shared_types::AccountInfo;
    use tx_composer::{
        fields, gas_of_tx, BuildError, CollaboratorError, ComposerApi, ComposerConfig,
        ComposerError, FieldError, MessageUnit, MsgTypeId,
    };

    use crate::fixtures::*;

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[tokio::test]
    async fn test_send_and_vote_build_in_add_order() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        let vote = h.service.add_message_type(MsgTypeId::Vote);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        h.service.edit_field(send, fields::AMOUNT, "0.25").await.unwrap();
        h.service.edit_field(send, fields::DENOM, "atom").await.unwrap();
        h.service.edit_field(vote, fields::PROPOSAL_ID, "311").await.unwrap();
        h.service.edit_field(vote, fields::OPTION, "no_with_veto").await.unwrap();

        let draft = h.service.build().unwrap();

        assert_eq!(draft.msgs.len(), 2);
        assert_eq!(draft.msgs[0].type_url, "/cosmos.bank.v1beta1.MsgSend");
        assert_eq!(
            draft.msgs[0].value,
            json!({
                "fromAddress": ALICE,
                "toAddress": BOB,
                "amount": [{"amount": "250000", "denom": "uatom"}],
            })
        );
        assert_eq!(draft.msgs[1].type_url, "/cosmos.gov.v1beta1.MsgVote");
        assert_eq!(
            draft.msgs[1].value,
            json!({"proposalId": "311", "voter": ALICE, "option": 4})
        );
        assert_eq!(draft.account_number, 12);
        assert_eq!(draft.sequence, 5);
        assert_eq!(draft.fee.gas, "300000");
    }

    #[tokio::test]
    async fn test_submit_persists_canonical_json() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        h.service.set_memo("invoice-7");

        let id = h.service.submit().await.unwrap();
        assert_eq!(h.store.len(), 1);

        let stored = h.store.get(&id).unwrap();
        assert_eq!(stored.sender_address, ALICE);
        assert_eq!(stored.chain_id, "cosmoshub-4");

        let reparsed: Value = serde_json::from_str(&stored.canonical_json).unwrap();
        assert_eq!(reparsed["memo"], "invoice-7");
        assert!(!stored.canonical_json.contains(' '));
        let account_at = stored.canonical_json.find("\"accountNumber\"").unwrap();
        let chain_at = stored.canonical_json.find("\"chainId\"").unwrap();
        assert!(account_at < chain_at);
    }

    #[tokio::test]
    async fn test_mixed_types_estimate_and_encode() {
        let mut h = hub_harness();
        let delegate = h.service.add_message_type(MsgTypeId::Delegate);
        let transfer = h.service.add_message_type(MsgTypeId::Transfer);
        let withdraw = h.service.add_message_type(MsgTypeId::WithdrawDelegatorReward);
        assert_eq!(h.service.gas_estimate(), 100_000 + 100_000 + 180_000 + 100_000);

        h.service.edit_field(delegate, fields::VALIDATOR_ADDRESS, VALOPER_A).await.unwrap();
        h.service.edit_field(delegate, fields::AMOUNT, "10").await.unwrap();
        h.service.edit_field(transfer, fields::RECEIVER, OSMO_ADDR).await.unwrap();
        h.service.edit_field(transfer, fields::SOURCE_CHANNEL, "channel-141").await.unwrap();
        h.service.edit_field(transfer, fields::AMOUNT, "1").await.unwrap();
        h.service.edit_field(transfer, fields::DENOM, "atom").await.unwrap();
        h.service.edit_field(transfer, fields::TIMEOUT_TIMESTAMP, "1700000000").await.unwrap();
        h.service.edit_field(withdraw, fields::VALIDATOR_ADDRESS, VALOPER_B).await.unwrap();

        let draft = h.service.build().unwrap();
        let types: Vec<&str> = draft.msgs.iter().map(|m| m.type_url.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "/cosmos.staking.v1beta1.MsgDelegate",
                "/ibc.applications.transfer.v1.MsgTransfer",
                "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward",
            ]
        );
        assert_eq!(draft.msgs[0].value["amount"], json!({"amount": "10", "denom": "uatom"}));
        assert_eq!(draft.msgs[1].value["token"], json!({"amount": "1000000", "denom": "uatom"}));
        assert_eq!(draft.msgs[1].value["timeoutTimestamp"], "1700000000000000000");
        assert_eq!(draft.fee.gas, "480000");
        assert_eq!(draft.fee.amount[0].amount, "12000");
    }

    #[tokio::test]
    async fn test_custom_denom_requires_integral_amount() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        h.service.edit_field(send, fields::DENOM, "custom").await.unwrap();
        h.service.edit_field(send, fields::AMOUNT, "2.5").await.unwrap();

        assert!(!h.service.is_slot_valid(send).unwrap());
        assert_eq!(
            h.service.slot_errors(send).unwrap().get(fields::CUSTOM_DENOM),
            Some(&FieldError::CustomDenomRequired)
        );

        h.service
            .edit_field(send, fields::CUSTOM_DENOM, "ibc/27394FB092D2ECCD")
            .await
            .unwrap();
        assert!(!h.service.is_slot_valid(send).unwrap());
        assert_eq!(
            h.service.slot_errors(send).unwrap().get(fields::AMOUNT),
            Some(&FieldError::FractionalCustomAmount)
        );

        h.service.edit_field(send, fields::AMOUNT, "25").await.unwrap();
        assert!(h.service.is_slot_valid(send).unwrap());
        let draft = h.service.build().unwrap();
        assert_eq!(
            draft.msgs[0].value["amount"],
            json!([{"amount": "25", "denom": "ibc/27394FB092D2ECCD"}])
        );
    }

    // =========================================================================
    // LIST MAINTENANCE
    // =========================================================================

    #[tokio::test]
    async fn test_remove_middle_slot_keeps_neighbours() {
        let mut h = hub_harness();
        let first = h.service.add_message_type(MsgTypeId::Send);
        h.service.add_message_type(MsgTypeId::Transfer);
        let third = h.service.add_message_type(MsgTypeId::Vote);
        h.service.edit_field(first, fields::TO_ADDRESS, BOB).await.unwrap();
        h.service.edit_field(third, fields::PROPOSAL_ID, "9").await.unwrap();
        assert_eq!(h.service.gas_estimate(), 480_000);

        h.service.remove_slot(1).unwrap();
        assert_eq!(h.service.gas_estimate(), 300_000);
        assert_eq!(h.service.gas_limit_input(), "300000");

        let keys: Vec<_> = h.service.slots().iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec![first, third]);
        let draft = h.service.build().unwrap();
        assert_eq!(draft.msgs[0].value["toAddress"], BOB);
        assert_eq!(draft.msgs[1].value["proposalId"], "9");
    }

    #[tokio::test]
    async fn test_late_registration_never_lands_in_neighbour() {
        let mut h = hub_harness();
        let gone = h.service.add_message_type(MsgTypeId::Send);
        let kept = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(kept, fields::TO_ADDRESS, CAROL).await.unwrap();
        h.service.remove_slot(0).unwrap();

        let mut stale =
            MessageUnit::new(MsgTypeId::Send, &hub(), &ComposerConfig::for_testing());
        stale.set_field(fields::TO_ADDRESS, BOB).unwrap();

        assert_eq!(
            h.service.register_unit(gone, stale),
            Err(ComposerError::SlotNotFound(gone))
        );
        let draft = h.service.build().unwrap();
        assert_eq!(draft.msgs.len(), 1);
        assert_eq!(draft.msgs[0].value["toAddress"], CAROL);
    }

    #[tokio::test]
    async fn test_set_unit_for_slot_replaces_by_position() {
        let mut h = hub_harness();
        h.service.add_message_type(MsgTypeId::Vote);
        let mut unit = MessageUnit::new(MsgTypeId::Vote, &hub(), &ComposerConfig::for_testing());
        unit.set_field(fields::PROPOSAL_ID, "77").unwrap();

        h.service.set_unit_for_slot(0, unit).unwrap();
        assert_eq!(h.service.build().unwrap().msgs[0].value["proposalId"], "77");
        assert!(matches!(
            h.service.set_unit_for_slot(3, MessageUnit::new(
                MsgTypeId::Vote,
                &hub(),
                &ComposerConfig::for_testing()
            )),
            Err(ComposerError::SlotIndexOutOfRange { index: 3, len: 1 })
        ));
    }

    // =========================================================================
    // ALL-OR-NOTHING ASSEMBLY
    // =========================================================================

    #[tokio::test]
    async fn test_one_invalid_message_blocks_everything() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        let vote = h.service.add_message_type(MsgTypeId::Vote);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        h.service.edit_field(vote, fields::PROPOSAL_ID, "0").await.unwrap();

        let err = h.service.submit().await.unwrap_err();
        assert_eq!(
            err,
            ComposerError::Build(BuildError::InvalidMessages { invalid: 1, total: 2 })
        );
        assert!(h.store.is_empty());
        assert_eq!(h.service.slots().len(), 2);
        assert!(matches!(
            h.service.slot_errors(vote).unwrap().get(fields::PROPOSAL_ID),
            Some(FieldError::NotPositiveInteger(_))
        ));
        assert!(h.service.slot_errors(send).unwrap().is_empty());

        h.service.edit_field(vote, fields::PROPOSAL_ID, "1").await.unwrap();
        assert!(h.service.slot_errors(vote).unwrap().is_empty());
        h.service.submit().await.unwrap();
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_prefix_reports_chain() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, OSMO_ADDR).await.unwrap();

        assert!(h.service.build().is_err());
        match h.service.slot_errors(send).unwrap().get(fields::TO_ADDRESS) {
            Some(FieldError::InvalidAddress { chain_id, .. }) => {
                assert_eq!(chain_id, "cosmoshub-4")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_list_and_missing_account() {
        let mut h = hub_harness();
        assert_eq!(
            h.service.build(),
            Err(ComposerError::Build(BuildError::NoMessages))
        );

        let mut h = HarnessBuilder::new(hub(), ALICE)
            .account(AccountInfo {
                address: ALICE.to_string(),
                account_number: None,
                sequence: 0,
            })
            .build();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        assert_eq!(
            h.service.build(),
            Err(ComposerError::Build(BuildError::MissingAccountNumber))
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
        h.store.set_failing(true);

        assert!(matches!(
            h.service.submit().await,
            Err(ComposerError::Build(BuildError::Store(CollaboratorError::Storage(_))))
        ));
        assert!(h.store.is_empty());

        h.store.set_failing(false);
        h.service.submit().await.unwrap();
        assert_eq!(h.store.len(), 1);
    }

    // =========================================================================
    // GAS LIMIT
    // =========================================================================

    #[tokio::test]
    async fn test_gas_limit_bounds() {
        let mut h = hub_harness();
        let send = h.service.add_message_type(MsgTypeId::Send);
        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();

        for bad in ["0", "-1", "1.5", "9007199254740992"] {
            h.service.set_gas_limit(bad);
            match h.service.build() {
                Err(ComposerError::Build(e)) => {
                    assert_eq!(e.field(), Some(fields::GAS_LIMIT), "input {bad}")
                }
                other => panic!("input {bad}: {other:?}"),
            }
        }

        for good in ["1", "250000", "9007199254740991"] {
            h.service.set_gas_limit(good);
            let draft = h.service.build().unwrap();
            assert_eq!(draft.fee.gas, good);
        }
    }

    #[tokio::test]
    async fn test_user_gas_override_reset_by_add() {
        let mut h = hub_harness();
        h.service.add_message_type(MsgTypeId::Send);
        h.service.set_gas_limit("777777");
        assert_eq!(h.service.gas_limit_input(), "777777");
        h.service.add_message_type(MsgTypeId::Vote);
        assert_eq!(h.service.gas_limit_input(), "300000");
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    proptest! {
        #[test]
        fn test_identical_inputs_identical_drafts(
            whole in 0u32..1_000_000,
            frac in 0u32..1_000_000,
            proposal in 1u64..1_000_000,
        ) {
            let amount = format!("{whole}.{frac:06}");
            let proposal = proposal.to_string();
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let drafts: Vec<_> = (0..2)
                .map(|_| {
                    runtime.block_on(async {
                        let mut h = hub_harness();
                        let send = h.service.add_message_type(MsgTypeId::Send);
                        let vote = h.service.add_message_type(MsgTypeId::Vote);
                        h.service.edit_field(send, fields::TO_ADDRESS, BOB).await.unwrap();
                        h.service.edit_field(send, fields::AMOUNT, &amount).await.unwrap();
                        h.service.edit_field(send, fields::DENOM, "atom").await.unwrap();
                        h.service.edit_field(vote, fields::PROPOSAL_ID, &proposal).await.unwrap();
                        h.service.build().unwrap()
                    })
                })
                .collect();

            prop_assert_eq!(&drafts[0], &drafts[1]);
            prop_assert_eq!(
                drafts[0].to_canonical_json().unwrap(),
                drafts[1].to_canonical_json().unwrap()
            );
        }

        #[test]
        fn test_estimate_is_flat_plus_weights(indices in proptest::collection::vec(0usize..15, 0..10)) {
            let types: Vec<MsgTypeId> = indices.iter().map(|i| MsgTypeId::ALL[*i]).collect();
            let mut h = hub_harness();
            for t in &types {
                h.service.add_message_type(*t);
            }
            let weights = ComposerConfig::for_testing().gas;
            let expected = weights.tx_flat + types.iter().map(|t| weights.weight(*t)).sum::<u64>();
            prop_assert_eq!(h.service.gas_estimate(), expected);
            prop_assert_eq!(h.service.gas_estimate(), gas_of_tx(&types, &weights));
        }
    }
}
