//! Wager contract ABI.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract Wager {
        struct BetInfo {
            uint256 id;
            string title;
            uint256 threshold;
            uint256 totalPoolForExceed;
            uint256 totalPoolForNotExceed;
            bool epochEnded;
        }

        function createBet(string title, uint256 threshold) external;
        function placeBet(uint256 betId, bool betForExceed) external payable;
        function endEpoch(uint256 betId, bytes[] priceUpdate) external payable;
        function getAllBets() external view returns (BetInfo[] memory);
    }
}
