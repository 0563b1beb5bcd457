//! Contract bindings generated from ABIs

use ethers::prelude::*;

// Generate type-safe bindings for the arena contract
abigen!(
    FighterArenaContract,
    "src/blockchain/abi/FighterArena.json",
    event_derives(serde::Deserialize, serde::Serialize)
);
