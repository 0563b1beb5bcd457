//! Arena contract client

use std::sync::Arc;

use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U256};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::blockchain::contracts::FighterArenaContract;
use crate::models::tournament::{BattleRecord, FighterId, FighterState};
use crate::services::ledger::{FighterRegistry, LedgerBackend, LedgerError};

type ArenaMiddleware = ethers::middleware::SignerMiddleware<Provider<Http>, LocalWallet>;

/// Token amounts on the ledger carry 18 decimals.
const TOKEN_DECIMALS: u32 = 18;
const WEI_PER_TOKEN: u64 = 1_000_000_000_000_000_000;

/// Largest wei value a `Decimal` mantissa can hold (2^96 - 1).
const MAX_DECIMAL_WEI: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Client for the arena contract: roster and stake reads, plus the three
/// settlement writes.
#[derive(Clone)]
pub struct ArenaClient {
    contract: FighterArenaContract<ArenaMiddleware>,
}

impl ArenaClient {
    /// Create a signing client for the arena contract.
    pub fn new(
        rpc_url: &str,
        private_key: &str,
        contract_address: &str,
        chain_id: u64,
    ) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let wallet: LocalWallet = private_key.parse::<LocalWallet>()?.with_chain_id(chain_id);
        let signer = SignerMiddleware::new(provider, wallet);
        let address: Address = contract_address.parse()?;

        Ok(Self { contract: FighterArenaContract::new(address, Arc::new(signer)) })
    }

    /// Current on-ledger balance of one fighter, in whole tokens.
    pub async fn fighter_balance(&self, fighter: FighterId) -> Result<Decimal, LedgerError> {
        let wei = self
            .contract
            .fighter_balances(to_token_id(fighter))
            .call()
            .await
            .map_err(rpc_err)?;
        wei_to_decimal(wei)
    }

    async fn submit<D: ethers::abi::Detokenize>(
        &self,
        call: ContractCall<ArenaMiddleware, D>,
    ) -> Result<String, LedgerError> {
        let pending = call.send().await.map_err(rpc_err)?;
        let tx_hash = format!("{:?}", *pending);
        let receipt = pending.await.map_err(rpc_err)?;

        match receipt {
            Some(r) if r.status == Some(0.into()) => {
                Err(LedgerError::Rpc(format!("transaction {} reverted", tx_hash)))
            }
            _ => Ok(tx_hash),
        }
    }
}

impl FighterRegistry for ArenaClient {
    async fn fighters_by_state(
        &self,
        state: FighterState,
    ) -> Result<Vec<FighterId>, LedgerError> {
        let raw = self
            .contract
            .get_fighters_by_state(state.code())
            .call()
            .await
            .map_err(rpc_err)?;
        raw.into_iter().map(from_token_id).collect()
    }

    async fn required_stake(&self) -> Result<Decimal, LedgerError> {
        let wei = self.contract.req_stake().call().await.map_err(rpc_err)?;
        wei_to_decimal(wei)
    }
}

impl LedgerBackend for ArenaClient {
    async fn update_fighter_states(
        &self,
        fighters: &[FighterId],
        states: &[FighterState],
    ) -> Result<String, LedgerError> {
        let token_ids: Vec<U256> = fighters.iter().map(|f| to_token_id(*f)).collect();
        let codes: Vec<u8> = states.iter().map(|s| s.code()).collect();
        self.submit(self.contract.update_fighter_states(token_ids, codes)).await
    }

    async fn add_to_balances(
        &self,
        fighters: &[FighterId],
        amounts: &[Decimal],
    ) -> Result<String, LedgerError> {
        let token_ids: Vec<U256> = fighters.iter().map(|f| to_token_id(*f)).collect();
        let wei_amounts: Vec<U256> =
            amounts.iter().map(|a| decimal_to_wei(*a)).collect::<Result<_, _>>()?;

        for (fighter, amount) in fighters.iter().zip(amounts) {
            let current = self.fighter_balance(*fighter).await?;
            debug!(
                "fighter #{} balance: {} + {} = {}",
                fighter,
                current,
                amount,
                current + amount
            );
        }

        self.submit(self.contract.add_to_fighter_balances(token_ids, wei_amounts)).await
    }

    async fn record_tournament(&self, record: &BattleRecord) -> Result<String, LedgerError> {
        let as_of = U256::from(record.as_of.timestamp().max(0) as u64);
        let match_ids: Vec<U256> = record.match_ids.iter().map(|id| to_token_id(*id)).collect();
        let winners: Vec<U256> = record.winner_ids.iter().map(|f| to_token_id(*f)).collect();
        let losers: Vec<U256> = record.loser_ids.iter().map(|f| to_token_id(*f)).collect();

        self.submit(self.contract.record_tournament(
            as_of,
            match_ids,
            winners,
            losers,
            to_token_id(record.champion_id),
        ))
        .await
    }
}

fn rpc_err<E: std::fmt::Display>(err: E) -> LedgerError {
    LedgerError::Rpc(err.to_string())
}

fn to_token_id(id: i64) -> U256 {
    U256::from(id.max(0) as u64)
}

fn from_token_id(raw: U256) -> Result<FighterId, LedgerError> {
    if raw > U256::from(i64::MAX as u64) {
        return Err(LedgerError::AmountOutOfRange(format!("fighter id {raw} exceeds i64")));
    }
    Ok(raw.as_u64() as i64)
}

/// Convert a wei amount from the contract into whole tokens.
fn wei_to_decimal(wei: U256) -> Result<Decimal, LedgerError> {
    if wei > U256::from(MAX_DECIMAL_WEI) {
        return Err(LedgerError::AmountOutOfRange(format!("{wei} wei")));
    }
    Ok(Decimal::from_i128_with_scale(wei.as_u128() as i128, TOKEN_DECIMALS))
}

/// Convert a whole-token amount into wei for the contract.
fn decimal_to_wei(amount: Decimal) -> Result<U256, LedgerError> {
    if amount.is_sign_negative() {
        return Err(LedgerError::AmountOutOfRange(amount.to_string()));
    }
    let wei = amount
        .checked_mul(Decimal::from(WEI_PER_TOKEN))
        .ok_or_else(|| LedgerError::AmountOutOfRange(amount.to_string()))?;
    let wei = wei
        .trunc()
        .to_u128()
        .ok_or_else(|| LedgerError::AmountOutOfRange(amount.to_string()))?;
    Ok(U256::from(wei))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_wei_round_trip() {
        let amount = dec!(12.5);
        let wei = decimal_to_wei(amount).unwrap();
        assert_eq!(wei, U256::from(12_500_000_000_000_000_000u128));
        assert_eq!(wei_to_decimal(wei).unwrap(), amount);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(matches!(
            decimal_to_wei(dec!(-1)),
            Err(LedgerError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_oversized_wei_rejected() {
        assert!(matches!(
            wei_to_decimal(U256::MAX),
            Err(LedgerError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_fighter_id_conversion_bounds() {
        assert_eq!(from_token_id(U256::from(42u64)).unwrap(), 42);
        assert!(from_token_id(U256::from(u64::MAX)).is_err());
    }
}
