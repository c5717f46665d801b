//! ABI bindings for the contracts the action adapters call.

use alloy_sol_types::sol;

sol! {
    /// Minimal ERC-20 surface used for approvals.
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Token sale contract.
    interface ILaunchpad {
        function contribute(uint256 projectId, uint256 amount) external;
        function deposit(uint256 projectId, uint256 amount) external;
        function finalize(uint256 projectId) external;
        function refund(uint256 projectId) external;
        function withdraw(uint256 projectId) external;
    }

    /// Liquidity router of the AMM.
    interface IAmmRouter {
        function addLiquidity(uint256 poolId, uint256 amount) external returns (uint256 liquidity);
        function removeLiquidity(uint256 poolId, uint256 liquidity) external returns (uint256 amount);
    }
}
