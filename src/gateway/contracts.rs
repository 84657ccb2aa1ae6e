//! ABI tables for the registry, token and faucet contracts.

#![allow(missing_docs)]

use alloy::sol;

// Calls present in every deployed registry version.
sol! {
    #[sol(rpc)]
    interface IAgentRegistry {
        function totalSupply() external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function balanceOf(address owner) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function getAgentsByCreator(address creator) external view returns (uint256[] memory);
        function hasLicense(uint256 agentId, string calldata licenseType) external view returns (bool);
    }
}

// Co-signed layout: human principal and lineage inline, batched licenses.
sol! {
    #[sol(rpc)]
    interface IAgentRegistryV1 {
        struct Agent {
            string name;
            string agentType;
            address creator;
            address humanPrincipal;
            uint256 parentId;
            uint256 lineageDepth;
            uint256 createdAt;
            bool active;
        }

        struct License {
            string licenseType;
            string licenseNumber;
            string jurisdiction;
            uint256 issuedAt;
        }

        function getAgent(uint256 agentId) external view returns (Agent memory);
        function getLicenses(uint256 agentId) external view returns (License[] memory);
    }
}

// Verified-flag layout: separate lineage accessor, per-index licenses.
sol! {
    #[sol(rpc)]
    interface IAgentRegistryV2 {
        struct Agent {
            string name;
            string agentType;
            uint256 birthTimestamp;
            bool active;
        }

        struct License {
            string licenseType;
            string identifier;
            string holder;
            uint256 issuedAt;
            bool active;
        }

        function getAgent(uint256 agentId) external view returns (Agent memory);
        function isVerified(uint256 agentId) external view returns (bool);
        function getLineage(uint256 agentId) external view returns (uint256 parentId, uint256 depth);
        function getLicenseCount(uint256 agentId) external view returns (uint256);
        function getLicense(uint256 agentId, uint256 index) external view returns (License memory);
    }
}

sol! {
    #[sol(rpc)]
    interface IClamsToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

sol! {
    #[sol(rpc)]
    interface IClamsFaucet {
        function hasClaimed(address account) external view returns (bool);
        function totalClaims() external view returns (uint256);
    }
}
