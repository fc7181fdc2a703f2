//! Encoding of 0x v2 asset data.
//!
//! Asset data identifies both the asset proxy in charge of transferring an
//! asset and the asset itself. Only the ERC-20 proxy is supported here.

use {
    alloy::{
        primitives::{Address, Bytes},
        sol,
        sol_types::SolCall,
    },
    hex_literal::hex,
};

sol! {
    interface IAssetData {
        function ERC20Token(address tokenContract) external;
    }
}

/// Proxy id of the ERC-20 asset proxy, `bytes4(keccak256("ERC20Token(address)"))`.
pub const ERC20_PROXY_ID: [u8; 4] = hex!("f47261b0");

/// Length in bytes of ERC-20 asset data: proxy id plus one ABI word.
pub const ERC20_ASSET_DATA_LEN: usize = 4 + 32;

/// Encodes the asset data referencing an ERC-20 token.
pub fn erc20(token: Address) -> Bytes {
    IAssetData::ERC20TokenCall {
        tokenContract: token,
    }
    .abi_encode()
    .into()
}

/// Returns the token referenced by ERC-20 asset data, or `None` if the data
/// belongs to another asset proxy or is malformed.
pub fn erc20_token(data: &[u8]) -> Option<Address> {
    if data.len() != ERC20_ASSET_DATA_LEN {
        return None;
    }
    IAssetData::ERC20TokenCall::abi_decode(data)
        .ok()
        .map(|call| call.tokenContract)
}
