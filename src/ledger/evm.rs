//! EVM ledger adapter.
//!
//! Talks to the deployed voting contract over JSON-RPC, signing every
//! transaction with the gateway's own wallet (voters do not hold keys; the
//! service wallet is the on-chain voter identity). Rejections surface either
//! at submission, when gas estimation replays the revert, or at confirmation
//! time via a failed receipt, in which case the original call is replayed as
//! an `eth_call` to recover the revert reason.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::RawLog;
use ethers::contract::{abigen, ContractError, EthLogDecode};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, BlockId, TransactionReceipt as EthReceipt, TxHash, U256};
use tracing::{debug, warn};

use super::traits::{
    ConfirmationReport, LedgerCall, LedgerClient, LedgerEvent, TransactionId,
};
use crate::config::LedgerConfig;
use crate::domain::{Organization, PollSummary};
use crate::error::LedgerError;

abigen!(
    VotingContract,
    r#"[
        function createOrganization(string _name)
        function createPoll(uint256 _orgId, string _title, string _description, string[] _options, string[] _imageHashes, uint256 _startTime, uint256 _endTime)
        function vote(uint256 _pollId, uint256 _optionId)
        function getPollResults(uint256 _pollId) view returns (uint256[] memory)
        function organizations(uint256) view returns (uint256 id, string name, bool exists)
        function polls(uint256) view returns (uint256 id, uint256 orgId, string title, string description, uint256 startTime, uint256 endTime, bool exists)
        event OrganizationCreated(uint256 orgId, string name)
        event PollCreated(uint256 pollId, uint256 orgId, string title)
        event Voted(uint256 pollId, uint256 optionId, address voter)
    ]"#
);

type EvmMiddleware = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct EvmLedger {
    contract: VotingContract<EvmMiddleware>,
    client: Arc<EvmMiddleware>,
}

impl EvmLedger {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| LedgerError::Connection(e.to_string()))?;
        let key = config
            .private_key
            .as_deref()
            .ok_or_else(|| LedgerError::Signing("no private key configured".to_string()))?;
        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|e| LedgerError::Signing(e.to_string()))?
            .with_chain_id(config.chain_id);
        let address: Address = config.contract_address.parse().map_err(|_| {
            LedgerError::Connection(format!(
                "invalid contract address: {}",
                config.contract_address
            ))
        })?;
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = VotingContract::new(address, client.clone());
        Ok(Self { contract, client })
    }

    fn contract_error(err: ContractError<EvmMiddleware>) -> LedgerError {
        if let Some(reason) = err.decode_revert::<String>() {
            return LedgerError::Rejected(reason);
        }
        match err {
            ContractError::MiddlewareError { e } => LedgerError::Connection(e.to_string()),
            ContractError::ProviderError { e } => LedgerError::Connection(e.to_string()),
            other => LedgerError::Rejected(other.to_string()),
        }
    }

    /// Replay a failed transaction as a call at its block to recover the
    /// revert reason. Best effort: nodes differ in what they report.
    async fn revert_reason(&self, receipt: &EthReceipt) -> String {
        let tx = match self.client.get_transaction(receipt.transaction_hash).await {
            Ok(Some(tx)) => tx,
            _ => return "execution reverted".to_string(),
        };
        let request: TypedTransaction = (&tx).into();
        let block = receipt.block_number.map(|n| BlockId::from(n.as_u64()));
        match self.client.call(&request, block).await {
            Err(e) => e.to_string(),
            Ok(_) => "execution reverted".to_string(),
        }
    }
}

fn decode_events(receipt: &EthReceipt) -> Vec<LedgerEvent> {
    let mut events = Vec::new();
    for log in &receipt.logs {
        let raw = RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        };
        if let Ok(ev) = OrganizationCreatedFilter::decode_log(&raw) {
            events.push(LedgerEvent::OrganizationCreated {
                org_id: ev.org_id.as_u64(),
                name: ev.name,
            });
        } else if let Ok(ev) = PollCreatedFilter::decode_log(&raw) {
            events.push(LedgerEvent::PollCreated {
                poll_id: ev.poll_id.as_u64(),
                org_id: ev.org_id.as_u64(),
                title: ev.title,
            });
        } else if let Ok(ev) = VotedFilter::decode_log(&raw) {
            events.push(LedgerEvent::Voted {
                poll_id: ev.poll_id.as_u64(),
                option_id: ev.option_id.as_u64(),
                voter: format!("{:#x}", ev.voter),
            });
        }
    }
    events
}

#[async_trait]
impl LedgerClient for EvmLedger {
    async fn submit(&self, call: LedgerCall) -> Result<TransactionId, LedgerError> {
        let op = call.name();
        let tx_hash: TxHash = match call {
            LedgerCall::CreateOrganization { name } => {
                let call = self.contract.create_organization(name);
                let pending = call.send().await.map_err(Self::contract_error)?;
                *pending
            }
            LedgerCall::CreatePoll {
                org_id,
                title,
                description,
                options,
                image_hashes,
                start_time,
                end_time,
            } => {
                let call = self.contract.create_poll(
                    U256::from(org_id),
                    title,
                    description,
                    options,
                    image_hashes,
                    U256::from(start_time as u64),
                    U256::from(end_time as u64),
                );
                let pending = call.send().await.map_err(Self::contract_error)?;
                *pending
            }
            LedgerCall::Vote { poll_id, option_id } => {
                let call = self
                    .contract
                    .vote(U256::from(poll_id), U256::from(option_id));
                let pending = call.send().await.map_err(Self::contract_error)?;
                *pending
            }
        };
        debug!(op, tx = %format!("{tx_hash:#x}"), "transaction submitted");
        Ok(TransactionId(format!("{tx_hash:#x}")))
    }

    async fn confirmation(&self, tx_id: &TransactionId) -> Result<ConfirmationReport, LedgerError> {
        let hash: TxHash = tx_id
            .0
            .parse()
            .map_err(|_| LedgerError::Connection(format!("malformed transaction id: {tx_id}")))?;
        let receipt = self
            .client
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;
        let Some(receipt) = receipt else {
            return Ok(ConfirmationReport::pending());
        };

        let included = receipt.status.map(|s| s.as_u64() == 1).unwrap_or(false);
        if !included {
            let reason = self.revert_reason(&receipt).await;
            warn!(tx = %tx_id, %reason, "transaction reverted on chain");
            return Ok(ConfirmationReport::rejected(reason));
        }

        let block = receipt
            .block_hash
            .map(|h| format!("{h:#x}"))
            .or_else(|| receipt.block_number.map(|n| n.to_string()));
        Ok(ConfirmationReport::confirmed(block, decode_events(&receipt)))
    }

    async fn organization(&self, org_id: u64) -> Result<Option<Organization>, LedgerError> {
        let (id, name, exists) = self
            .contract
            .organizations(U256::from(org_id))
            .call()
            .await
            .map_err(Self::contract_error)?;
        if !exists {
            return Ok(None);
        }
        Ok(Some(Organization {
            id: id.as_u64(),
            name,
            exists,
        }))
    }

    async fn poll(&self, poll_id: u64) -> Result<Option<PollSummary>, LedgerError> {
        let (id, org_id, title, description, start_time, end_time, exists) = self
            .contract
            .polls(U256::from(poll_id))
            .call()
            .await
            .map_err(Self::contract_error)?;
        if !exists {
            return Ok(None);
        }
        Ok(Some(PollSummary {
            id: id.as_u64(),
            org_id: org_id.as_u64(),
            title,
            description,
            start_time: start_time.as_u64() as i64,
            end_time: end_time.as_u64() as i64,
            exists,
        }))
    }

    async fn poll_results(&self, poll_id: u64) -> Result<Option<Vec<u64>>, LedgerError> {
        // The results call on a nonexistent poll is indistinguishable from an
        // empty tally on some nodes, so check existence first.
        if self.poll(poll_id).await?.is_none() {
            return Ok(None);
        }
        let counts = self
            .contract
            .get_poll_results(U256::from(poll_id))
            .call()
            .await
            .map_err(Self::contract_error)?;
        Ok(Some(counts.into_iter().map(|c| c.as_u64()).collect()))
    }
}
