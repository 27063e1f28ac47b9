//! Solidity ABI surface of the contracts we talk to.

use alloy_sol_types::sol;

sol! {
    /// The subset of ERC20 needed for the spending-approval dance.
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Identity Staking self-stake entrypoints.
    interface IIdentityStaking {
        function selfStake(uint88 amount, uint64 duration) external;
        function extendSelfStake(uint64 duration) external;
        function selfStakes(address staker)
            external
            view
            returns (uint64 unlockTime, uint88 amount, uint88 slashedAmount, uint16 slashedInRound);
    }
}
