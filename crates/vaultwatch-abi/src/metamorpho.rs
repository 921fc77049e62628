//! Event signatures emitted by a MetaMorpho vault.
//!
//! Covers the vault's own governance and allocation events plus the
//! inherited ERC-20, ERC-4626, Ownable2Step and EIP-712 events. Market ids
//! (`Id` in Solidity) are plain `bytes32` on the wire.

pub const EVENTS: &[&str] = &[
    // ERC-20 / ERC-4626
    "event Transfer(address indexed from, address indexed to, uint256 value)",
    "event Approval(address indexed owner, address indexed spender, uint256 value)",
    "event Deposit(address indexed sender, address indexed owner, uint256 assets, uint256 shares)",
    "event Withdraw(address indexed sender, address indexed receiver, address indexed owner, uint256 assets, uint256 shares)",
    // Ownable2Step / EIP-712
    "event OwnershipTransferStarted(address indexed previousOwner, address indexed newOwner)",
    "event OwnershipTransferred(address indexed previousOwner, address indexed newOwner)",
    "event EIP712DomainChanged()",
    // Vault
    "event SubmitTimelock(uint256 newTimelock)",
    "event SetTimelock(address indexed caller, uint256 newTimelock)",
    "event SetSkimRecipient(address indexed newSkimRecipient)",
    "event SetFee(address indexed caller, uint256 newFee)",
    "event SetFeeRecipient(address indexed newFeeRecipient)",
    "event SubmitGuardian(address indexed newGuardian)",
    "event SetGuardian(address indexed caller, address indexed guardian)",
    "event SubmitCap(address indexed caller, bytes32 indexed id, uint256 cap)",
    "event SetCap(address indexed caller, bytes32 indexed id, uint256 cap)",
    "event UpdateLastTotalAssets(uint256 updatedTotalAssets)",
    "event SubmitMarketRemoval(address indexed caller, bytes32 indexed id)",
    "event SetCurator(address indexed newCurator)",
    "event SetIsAllocator(address indexed allocator, bool isAllocator)",
    "event RevokePendingTimelock(address indexed caller)",
    "event RevokePendingCap(address indexed caller, bytes32 indexed id)",
    "event RevokePendingGuardian(address indexed caller)",
    "event RevokePendingMarketRemoval(address indexed caller, bytes32 indexed id)",
    "event SetSupplyQueue(address indexed caller, bytes32[] newSupplyQueue)",
    "event SetWithdrawQueue(address indexed caller, bytes32[] newWithdrawQueue)",
    "event ReallocateSupply(address indexed caller, bytes32 indexed id, uint256 suppliedAssets, uint256 suppliedShares)",
    "event ReallocateWithdraw(address indexed caller, bytes32 indexed id, uint256 withdrawnAssets, uint256 withdrawnShares)",
    "event AccrueInterest(uint256 newTotalAssets, uint256 feeShares)",
    "event Skim(address indexed caller, address indexed token, uint256 amount)",
];
