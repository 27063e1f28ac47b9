use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;

use crate::chain::ChainId;

/// A fully-encoded contract call, ready to hand to a [`TxSubmitter`](crate::TxSubmitter).
///
/// Built once from a typed `sol!` call and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    to: Address,
    signature: &'static str,
    selector: [u8; 4],
    calldata: Bytes,
    chain_id: ChainId,
}

impl TransactionRequest {
    pub fn new<C: SolCall>(to: Address, chain_id: ChainId, call: &C) -> Self {
        Self {
            to,
            signature: C::SIGNATURE,
            selector: C::SELECTOR,
            calldata: Bytes::from(call.abi_encode()),
            chain_id,
        }
    }

    /// Target contract.
    pub fn to(&self) -> Address {
        self.to
    }

    /// Canonical signature, eg `selfStake(uint88,uint64)`.
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Function name without the parameter list.
    pub fn function_name(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map_or(self.signature, |(name, _)| name)
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// Selector followed by the ABI-encoded arguments.
    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Decode the arguments back into `C`, if this request is a `C` call.
    pub fn decode<C: SolCall>(&self) -> Option<C> {
        if self.selector != C::SELECTOR {
            return None;
        }
        C::abi_decode(&self.calldata, true).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::IERC20;
    use alloy_primitives::U256;

    #[test]
    fn test_approve_request_is_self_describing() {
        let spender = Address::repeat_byte(0x22);
        let call = IERC20::approveCall {
            spender,
            amount: U256::from(200u64),
        };
        let request = TransactionRequest::new(Address::repeat_byte(0x11), 10, &call);

        assert_eq!(request.signature(), "approve(address,uint256)");
        assert_eq!(request.function_name(), "approve");
        assert_eq!(request.selector(), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(&request.calldata()[..4], &request.selector());
        assert_eq!(request.chain_id(), 10);

        let decoded = request.decode::<IERC20::approveCall>().unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, U256::from(200u64));
        assert!(request.decode::<IERC20::allowanceCall>().is_none());
    }
}
