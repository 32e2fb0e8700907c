//! Minimal ERC-20 read interface: `balanceOf`, `decimals`, `symbol`

use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address as EvmAddress, U256};
use ethers::utils::id;

use crate::core::network_switch::ChainHandle;
use crate::shared::constants::{ERC20_BALANCE_OF, ERC20_DECIMALS, ERC20_SYMBOL, MAX_DECIMALS};
use crate::shared::error::WalletError;

fn decode_single(output: &[u8], kind: ParamType) -> Result<Token, WalletError> {
    abi::decode(&[kind], output)?
        .pop()
        .ok_or_else(|| WalletError::decode("Empty contract output"))
}

pub async fn balance_of(handle: &ChainHandle<'_>, token: EvmAddress, owner: EvmAddress) -> Result<U256, WalletError> {
    let mut data = id(ERC20_BALANCE_OF).to_vec();
    data.extend(abi::encode(&[Token::Address(owner)]));
    let output = handle.call(token, &data).await?;
    decode_single(&output, ParamType::Uint(256))?
        .into_uint()
        .ok_or_else(|| WalletError::decode("balanceOf did not return a uint256"))
}

pub async fn decimals(handle: &ChainHandle<'_>, token: EvmAddress) -> Result<u32, WalletError> {
    let output = handle.call(token, &id(ERC20_DECIMALS)).await?;
    let value = decode_single(&output, ParamType::Uint(8))?
        .into_uint()
        .ok_or_else(|| WalletError::decode("decimals did not return a uint8"))?;
    if value > U256::from(MAX_DECIMALS) {
        return Err(WalletError::decode(format!("Unsupported decimals {}", value)));
    }
    Ok(value.as_u32())
}

pub async fn symbol(handle: &ChainHandle<'_>, token: EvmAddress) -> Result<String, WalletError> {
    let output = handle.call(token, &id(ERC20_SYMBOL)).await?;
    decode_single(&output, ParamType::String)?
        .into_string()
        .ok_or_else(|| WalletError::decode("symbol did not return a string"))
}
