//! Protobuf messages exchanged with the chain node and their JSON form.
//!
//! Only the fields this gateway serves are declared; unknown fields are
//! skipped on decode. JSON output follows the protobuf JSON mapping used by
//! Cosmos nodes: original field names, 64-bit integers as strings, bytes as
//! base64 and enums by name.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const VALIDATORS_PATH: &str = "/cosmos.staking.v1beta1.Query/Validators";
pub const DELEGATOR_DELEGATIONS_PATH: &str = "/cosmos.staking.v1beta1.Query/DelegatorDelegations";
pub const ZONE_INFOS_PATH: &str = "/quicksilver.interchainstaking.v1.Query/ZoneInfos";

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct PageRequest {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(serialize_with = "as_base64")]
    pub key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    #[serde(serialize_with = "as_string")]
    pub offset: u64,
    #[prost(uint64, tag = "3")]
    #[serde(serialize_with = "as_string")]
    pub limit: u64,
    #[prost(bool, tag = "4")]
    pub count_total: bool,
    #[prost(bool, tag = "5")]
    pub reverse: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct PageResponse {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(serialize_with = "as_optional_base64")]
    pub next_key: Vec<u8>,
    #[prost(uint64, tag = "2")]
    #[serde(serialize_with = "as_string")]
    pub total: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum BondStatus {
    Unspecified = 0,
    Unbonded = 1,
    Unbonding = 2,
    Bonded = 3,
}

impl BondStatus {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "BOND_STATUS_UNSPECIFIED",
            Self::Unbonded => "BOND_STATUS_UNBONDED",
            Self::Unbonding => "BOND_STATUS_UNBONDING",
            Self::Bonded => "BOND_STATUS_BONDED",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Description {
    #[prost(string, tag = "1")]
    pub moniker: String,
    #[prost(string, tag = "2")]
    pub identity: String,
    #[prost(string, tag = "3")]
    pub website: String,
    #[prost(string, tag = "4")]
    pub security_contact: String,
    #[prost(string, tag = "5")]
    pub details: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct CommissionRates {
    #[prost(string, tag = "1")]
    pub rate: String,
    #[prost(string, tag = "2")]
    pub max_rate: String,
    #[prost(string, tag = "3")]
    pub max_change_rate: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Commission {
    #[prost(message, optional, tag = "1")]
    pub commission_rates: Option<CommissionRates>,
    #[prost(message, optional, tag = "2")]
    pub update_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Validator {
    #[prost(string, tag = "1")]
    pub operator_address: String,
    #[prost(message, optional, tag = "2")]
    pub consensus_pubkey: Option<Any>,
    #[prost(bool, tag = "3")]
    pub jailed: bool,
    #[prost(enumeration = "BondStatus", tag = "4")]
    #[serde(serialize_with = "bond_status_name")]
    pub status: i32,
    #[prost(string, tag = "5")]
    pub tokens: String,
    #[prost(string, tag = "6")]
    pub delegator_shares: String,
    #[prost(message, optional, tag = "7")]
    pub description: Option<Description>,
    #[prost(int64, tag = "8")]
    #[serde(serialize_with = "as_string")]
    pub unbonding_height: i64,
    #[prost(message, optional, tag = "9")]
    pub unbonding_time: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub commission: Option<Commission>,
    #[prost(string, tag = "11")]
    pub min_self_delegation: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryValidatorsRequest {
    #[prost(string, tag = "1")]
    pub status: String,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryValidatorsResponse {
    #[prost(message, repeated, tag = "1")]
    pub validators: Vec<Validator>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Delegation {
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    #[prost(string, tag = "2")]
    pub validator_address: String,
    #[prost(string, tag = "3")]
    pub shares: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct DelegationResponse {
    #[prost(message, optional, tag = "1")]
    pub delegation: Option<Delegation>,
    #[prost(message, optional, tag = "2")]
    pub balance: Option<Coin>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryDelegatorDelegationsRequest {
    #[prost(string, tag = "1")]
    pub delegator_addr: String,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryDelegatorDelegationsResponse {
    #[prost(message, repeated, tag = "1")]
    pub delegation_responses: Vec<DelegationResponse>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

/// Interchain-staking zone, limited to its identity and rate fields.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Zone {
    #[prost(string, tag = "1")]
    pub connection_id: String,
    #[prost(string, tag = "2")]
    pub chain_id: String,
    #[prost(string, tag = "7")]
    pub account_prefix: String,
    #[prost(string, tag = "8")]
    pub local_denom: String,
    #[prost(string, tag = "9")]
    pub base_denom: String,
    #[prost(string, tag = "10")]
    pub redemption_rate: String,
    #[prost(string, tag = "11")]
    pub last_redemption_rate: String,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryZonesInfoRequest {
    #[prost(message, optional, tag = "1")]
    pub pagination: Option<PageRequest>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct QueryZonesInfoResponse {
    #[prost(message, repeated, tag = "1")]
    pub zones: Vec<Zone>,
    #[prost(message, optional, tag = "2")]
    pub pagination: Option<PageResponse>,
}

impl Serialize for Any {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("@type", &self.type_url)?;
        map.serialize_entry("value", &STANDARD.encode(&self.value))?;
        map.end()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u32::try_from(self.nanos).unwrap_or_default();
        match DateTime::from_timestamp(self.seconds, nanos) {
            Some(time) => serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => Err(serde::ser::Error::custom(format!(
                "timestamp {}s out of range",
                self.seconds
            ))),
        }
    }
}

fn as_string<T: ToString, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn as_base64<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(value))
}

fn as_optional_base64<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_none()
    } else {
        as_base64(value, serializer)
    }
}

fn bond_status_name<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    match BondStatus::try_from(*value) {
        Ok(status) => serializer.serialize_str(status.as_str_name()),
        Err(_) => serializer.serialize_i32(*value),
    }
}
