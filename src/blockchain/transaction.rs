//! Transfer transaction building.
//!
//! The caller supplies every field that matters for ordering and fees: the
//! sequence number comes from the account-state query made right before the
//! transfer, gas price and gas limit come from the form. Nothing here talks
//! to the network.

use alloy::network::TransactionBuilder;
use alloy::primitives::U256;
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::types::TransferRequest;
use crate::blockchain::wallet::Account;

/// Build an unsigned transfer from `account` using `sequence_number` as nonce.
pub fn build_transfer(
    account: &Account,
    sequence_number: u64,
    request: &TransferRequest,
    chain_id: u64,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(account.address())
        .with_to(request.to)
        .with_value(U256::from(request.amount))
        .with_nonce(sequence_number)
        .with_gas_price(u128::from(request.gas_unit_price))
        .with_gas_limit(request.max_gas_amount)
        .with_chain_id(chain_id)
}
