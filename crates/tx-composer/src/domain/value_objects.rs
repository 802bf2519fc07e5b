//! # Value Objects
//!
//! Message type identifiers, slot keys and small parsed field values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of supported message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgTypeId {
    /// Bank transfer.
    Send,
    /// Stake with a validator.
    Delegate,
    /// Unstake from a validator.
    Undelegate,
    /// Move stake between validators.
    BeginRedelegate,
    /// Claim staking rewards.
    WithdrawDelegatorReward,
    /// Change the reward withdraw address.
    SetWithdrawAddress,
    /// Donate to the community pool.
    FundCommunityPool,
    /// Governance vote.
    Vote,
    /// Create a vesting account.
    CreateVestingAccount,
    /// IBC token transfer.
    Transfer,
    /// Instantiate a contract.
    InstantiateContract,
    /// Instantiate a contract at a predictable address.
    InstantiateContract2,
    /// Execute a contract.
    ExecuteContract,
    /// Migrate a contract to new code.
    MigrateContract,
    /// Change a contract's admin.
    UpdateAdmin,
}

impl MsgTypeId {
    /// Every supported type, in menu order.
    pub const ALL: [MsgTypeId; 15] = [
        MsgTypeId::Send,
        MsgTypeId::Delegate,
        MsgTypeId::Undelegate,
        MsgTypeId::BeginRedelegate,
        MsgTypeId::WithdrawDelegatorReward,
        MsgTypeId::SetWithdrawAddress,
        MsgTypeId::FundCommunityPool,
        MsgTypeId::Vote,
        MsgTypeId::CreateVestingAccount,
        MsgTypeId::Transfer,
        MsgTypeId::InstantiateContract,
        MsgTypeId::InstantiateContract2,
        MsgTypeId::ExecuteContract,
        MsgTypeId::MigrateContract,
        MsgTypeId::UpdateAdmin,
    ];

    /// Protobuf type URL of the encoded message.
    pub fn type_url(self) -> &'static str {
        match self {
            MsgTypeId::Send => "/cosmos.bank.v1beta1.MsgSend",
            MsgTypeId::Delegate => "/cosmos.staking.v1beta1.MsgDelegate",
            MsgTypeId::Undelegate => "/cosmos.staking.v1beta1.MsgUndelegate",
            MsgTypeId::BeginRedelegate => "/cosmos.staking.v1beta1.MsgBeginRedelegate",
            MsgTypeId::WithdrawDelegatorReward => {
                "/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward"
            }
            MsgTypeId::SetWithdrawAddress => "/cosmos.distribution.v1beta1.MsgSetWithdrawAddress",
            MsgTypeId::FundCommunityPool => "/cosmos.distribution.v1beta1.MsgFundCommunityPool",
            MsgTypeId::Vote => "/cosmos.gov.v1beta1.MsgVote",
            MsgTypeId::CreateVestingAccount => "/cosmos.vesting.v1beta1.MsgCreateVestingAccount",
            MsgTypeId::Transfer => "/ibc.applications.transfer.v1.MsgTransfer",
            MsgTypeId::InstantiateContract => "/cosmwasm.wasm.v1.MsgInstantiateContract",
            MsgTypeId::InstantiateContract2 => "/cosmwasm.wasm.v1.MsgInstantiateContract2",
            MsgTypeId::ExecuteContract => "/cosmwasm.wasm.v1.MsgExecuteContract",
            MsgTypeId::MigrateContract => "/cosmwasm.wasm.v1.MsgMigrateContract",
            MsgTypeId::UpdateAdmin => "/cosmwasm.wasm.v1.MsgUpdateAdmin",
        }
    }

    /// Short snake_case id.
    pub fn as_str(self) -> &'static str {
        match self {
            MsgTypeId::Send => "send",
            MsgTypeId::Delegate => "delegate",
            MsgTypeId::Undelegate => "undelegate",
            MsgTypeId::BeginRedelegate => "begin_redelegate",
            MsgTypeId::WithdrawDelegatorReward => "withdraw_delegator_reward",
            MsgTypeId::SetWithdrawAddress => "set_withdraw_address",
            MsgTypeId::FundCommunityPool => "fund_community_pool",
            MsgTypeId::Vote => "vote",
            MsgTypeId::CreateVestingAccount => "create_vesting_account",
            MsgTypeId::Transfer => "transfer",
            MsgTypeId::InstantiateContract => "instantiate_contract",
            MsgTypeId::InstantiateContract2 => "instantiate_contract2",
            MsgTypeId::ExecuteContract => "execute_contract",
            MsgTypeId::MigrateContract => "migrate_contract",
            MsgTypeId::UpdateAdmin => "update_admin",
        }
    }

    /// Whether the unit offers a bonded-validator option list.
    pub fn requires_validator_data(self) -> bool {
        matches!(
            self,
            MsgTypeId::Delegate
                | MsgTypeId::Undelegate
                | MsgTypeId::BeginRedelegate
                | MsgTypeId::WithdrawDelegatorReward
        )
    }

    /// Whether the unit carries a structured JSON body.
    pub fn has_body(self) -> bool {
        matches!(
            self,
            MsgTypeId::InstantiateContract
                | MsgTypeId::InstantiateContract2
                | MsgTypeId::ExecuteContract
                | MsgTypeId::MigrateContract
        )
    }
}

impl fmt::Display for MsgTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MsgTypeId {
    type Err = String;

    /// Accepts the snake_case id or the full type URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MsgTypeId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted) || t.type_url() == wanted)
            .ok_or_else(|| format!("unknown message type: {wanted}"))
    }
}

/// Stable identity of a slot. Generated once, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey(Uuid);

impl SlotKey {
    /// Fresh random key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SlotKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Governance vote option with its protobuf enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOption {
    /// Yes.
    Yes = 1,
    /// Abstain.
    Abstain = 2,
    /// No.
    No = 3,
    /// No with veto.
    NoWithVeto = 4,
}

impl VoteOption {
    /// Protobuf enum value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl FromStr for VoteOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "yes" | "1" | "vote_option_yes" => Ok(VoteOption::Yes),
            "abstain" | "2" | "vote_option_abstain" => Ok(VoteOption::Abstain),
            "no" | "3" | "vote_option_no" => Ok(VoteOption::No),
            "no_with_veto" | "nowithveto" | "veto" | "4" | "vote_option_no_with_veto" => {
                Ok(VoteOption::NoWithVeto)
            }
            _ => Err(s.to_string()),
        }
    }
}

/// Denom selection of an amount field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenomChoice {
    /// A registered asset, by any of its display names.
    Registered(String),
    /// A free-form base denom typed by the user.
    Custom,
}

impl DenomChoice {
    /// Selector value meaning "custom denom".
    pub const CUSTOM: &'static str = "custom";

    /// Parse a selector value.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(Self::CUSTOM) {
            DenomChoice::Custom
        } else {
            DenomChoice::Registered(value.to_string())
        }
    }
}
