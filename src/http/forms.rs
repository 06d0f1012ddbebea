//! Form parsing and validation.
//!
//! Field names match the wallet's HTML forms (`transferTo`,
//! `numberOfCoins`, `gas_unit_price`, `max_gas_amount`). Every field is
//! optional at the serde level so a bad submission reaches validation and
//! gets a readable message instead of an extractor rejection.

use std::num::ParseIntError;

use alloy::primitives::{Address, U256};
use serde::Deserialize;
use thiserror::Error;

use crate::blockchain::TransferRequest;

/// A rejected form submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        source: ParseIntError,
    },

    #[error("invalid destination address '{0}'")]
    InvalidAddress(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is too large")]
    Overflow { field: &'static str },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub mnemonic: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TransferForm {
    #[serde(rename = "transferTo")]
    pub transfer_to: String,
    #[serde(rename = "numberOfCoins")]
    pub number_of_coins: String,
    pub gas_unit_price: String,
    pub max_gas_amount: String,
}

impl TransferForm {
    /// Validate into a transfer. Numbers are checked before the address.
    pub fn parse(&self) -> Result<TransferRequest, FormError> {
        let amount = parse_u64("numberOfCoins", &self.number_of_coins)?;
        let gas_unit_price = parse_u64("gas_unit_price", &self.gas_unit_price)?;
        let max_gas_amount = parse_u64("max_gas_amount", &self.max_gas_amount)?;

        let to = self.transfer_to.trim();
        if to.is_empty() {
            return Err(FormError::MissingField("transferTo"));
        }
        let to = parse_address(to)?;

        Ok(TransferRequest {
            to,
            amount,
            gas_unit_price,
            max_gas_amount,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MintForm {
    #[serde(rename = "transferTo")]
    pub transfer_to: String,
    #[serde(rename = "numberOfCoins")]
    pub number_of_coins: String,
}

/// A validated faucet request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub receiver: Address,
    /// Amount in base units (coins × unit scale).
    pub amount: U256,
}

impl MintForm {
    /// Validate into a mint. An empty destination means `own_address`.
    pub fn parse(&self, own_address: Address, unit_scale: u64) -> Result<MintRequest, FormError> {
        let destination = self.transfer_to.trim();
        let receiver = if destination.is_empty() {
            own_address
        } else {
            parse_address(destination)?
        };

        let coins = parse_u64("numberOfCoins", &self.number_of_coins)?;
        let amount = coins
            .checked_mul(unit_scale)
            .ok_or(FormError::Overflow {
                field: "numberOfCoins",
            })?;

        Ok(MintRequest {
            receiver,
            amount: U256::from(amount),
        })
    }
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, FormError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|source| FormError::InvalidNumber {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_address(value: &str) -> Result<Address, FormError> {
    value
        .parse()
        .map_err(|_| FormError::InvalidAddress(value.to_string()))
}
