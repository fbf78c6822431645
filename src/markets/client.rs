// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{
    shortfall, ClientDeal, Error, MarketBalance, StorageDeal, StorageProviderInfo,
};
use crate::actors::market::{
    ClientDealProposal, DealProposal, DealState, Method, PublishStorageDealsParams,
    PublishStorageDealsReturn,
};
use crate::actors::{account, market, miner, power};
use crate::actors::{STORAGE_MARKET_ACTOR_ADDR, STORAGE_POWER_ACTOR_ADDR};
use crate::blocks::{TipsetKey, TipsetToken};
use crate::chain::{ChainReader, MessageIndex, Outbox, Signer};
use crate::message::SignedMessage;
use cid::Cid;
use fvm_ipld_amt::Amt;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::{to_vec, RawBytes};
use fvm_shared::address::{Address, Protocol};
use fvm_shared::clock::ChainEpoch;
use fvm_shared::deal::DealID;
use fvm_shared::econ::TokenAmount;
use fvm_shared::{MethodNum, METHOD_SEND};
use std::sync::Arc;
use tracing::debug;

/// Client-side connector to the on-chain storage market.
///
/// Holds no chain state of its own: every operation reads against a snapshot
/// token through the [`ChainReader`] and the blockstore, so concurrent calls
/// against distinct (or equal) snapshots are safe. Outbound traffic goes
/// through the [`Outbox`].
pub struct StorageMarketClient<DB, C> {
    store: Arc<DB>,
    chain: Arc<C>,
    waiter: Arc<dyn MessageIndex>,
    outbox: Arc<dyn Outbox>,
    signer: Arc<dyn Signer>,
    client_addr: Address,
}

impl<DB, C> StorageMarketClient<DB, C>
where
    DB: Blockstore,
    C: ChainReader,
{
    pub fn new(
        store: Arc<DB>,
        chain: Arc<C>,
        waiter: Arc<dyn MessageIndex>,
        outbox: Arc<dyn Outbox>,
        signer: Arc<dyn Signer>,
        client_addr: Address,
    ) -> Self {
        Self {
            store,
            chain,
            waiter,
            outbox,
            signer,
            client_addr,
        }
    }

    /// The default account this client funds deals from.
    pub fn default_wallet_address(&self) -> Address {
        self.client_addr
    }

    /// Returns the current head as an opaque snapshot token plus its epoch.
    pub fn chain_head(&self) -> Result<(TipsetToken, ChainEpoch), Error> {
        let (key, epoch) = self.chain.chain_head()?;
        let token = TipsetToken::new(&key)
            .map_err(|e| Error::State(format!("failed to encode tipset token: {e}")))?;
        Ok((token, epoch))
    }

    fn decode_token(tok: &TipsetToken) -> Result<TipsetKey, Error> {
        tok.key()
            .map_err(|e| Error::State(format!("failed to decode tipset token: {e}")))
    }

    /// Resolves `addr` to the key address that signs for it. Key and
    /// delegated addresses resolve to themselves; ID addresses resolve
    /// through the account actor state at the given tipset.
    fn resolve_to_key_addr(&self, key: &TipsetKey, addr: &Address) -> Result<Address, Error> {
        match addr.protocol() {
            Protocol::BLS | Protocol::Secp256k1 | Protocol::Delegated => Ok(*addr),
            Protocol::Actor => Err(Error::State(
                "cannot resolve actor address to key address".to_string(),
            )),
            Protocol::ID => {
                let account: account::State = self.chain.get_actor_state_at(key, addr)?;
                Ok(account.address)
            }
        }
    }

    fn miner_worker_address_at(
        &self,
        key: &TipsetKey,
        miner: &Address,
    ) -> Result<Address, Error> {
        let state: miner::State = self.chain.get_actor_state_at(key, miner)?;
        self.resolve_to_key_addr(key, &state.info.worker)
    }

    /// Returns the key address authorized to sign operational messages for
    /// `miner`, as of the tipset the token identifies.
    pub fn get_miner_worker_address(
        &self,
        miner: &Address,
        tok: &TipsetToken,
    ) -> Result<Address, Error> {
        let key = Self::decode_token(tok)?;
        self.miner_worker_address_at(&key, miner)
    }

    /// Validates that a deal has been published correctly.
    ///
    /// The publication is reconstructed entirely from primitive chain data:
    /// the message is located by its claimed CID, its sender is checked
    /// against the provider's current worker key, its target and method are
    /// checked against the storage market actor ABI, its parameters are
    /// decoded and searched for a proposal exactly equal to the local one,
    /// and finally the deal id is read out of the execution receipt at the
    /// matched proposal's position.
    ///
    /// Each failure mode surfaces as a distinct [`Error`] kind; callers pick
    /// retry policy per kind.
    pub async fn validate_published_deal(&self, deal: &ClientDeal) -> Result<DealID, Error> {
        let publish_cid = deal.publish_message;
        let lookup = self
            .waiter
            .find(&move |_: &SignedMessage, cid: &Cid| cid == &publish_cid)
            .await?
            .ok_or(Error::PublishedDealNotFound(publish_cid))?;

        let message = lookup.message.message();

        // The worker is resolved at the current head: key rotation must not
        // retroactively invalidate the historical publication check.
        let (head_key, _) = self.chain.chain_head()?;
        let worker = self.miner_worker_address_at(&head_key, &deal.proposal.provider)?;
        if message.from != worker {
            return Err(Error::UnauthorizedPublisher {
                from: message.from,
                worker,
            });
        }

        if message.to != STORAGE_MARKET_ACTOR_ADDR
            || message.method_num != Method::PublishStorageDeals as MethodNum
        {
            return Err(Error::WrongMessageTarget {
                to: message.to,
                method: message.method_num,
            });
        }

        let params: PublishStorageDealsParams = message
            .params
            .deserialize()
            .map_err(|e| Error::State(format!("failed to decode publish params: {e}")))?;

        // The return value does not recapitulate the deals, so the match
        // index in the params is the only link to the assigned id.
        let index = params
            .deals
            .iter()
            .position(|published| published.proposal == deal.proposal)
            .ok_or(Error::ProposalMismatch)?;

        let ret: PublishStorageDealsReturn = lookup
            .receipt
            .return_data
            .deserialize()
            .map_err(|e| Error::ReceiptDecode(e.to_string()))?;
        let deal_id = ret
            .ids
            .get(index)
            .copied()
            .ok_or_else(|| {
                Error::ReceiptDecode(format!("receipt assigns no deal id at index {index}"))
            })?;

        debug!(%publish_cid, deal_id, "verified published deal");
        Ok(deal_id)
    }

    /// Finds all miners currently able to provide storage, by walking the
    /// power actor's claims registry at the given snapshot.
    ///
    /// Returns the complete list or the first error encountered; a corrupt
    /// registry entry aborts the whole walk rather than yield partial
    /// results. Output order follows trie key order, which is deterministic
    /// but otherwise meaningless.
    pub fn list_storage_providers(
        &self,
        tok: &TipsetToken,
    ) -> Result<Vec<StorageProviderInfo>, Error> {
        let key = Self::decode_token(tok)?;
        let power_state: power::State = self
            .chain
            .get_actor_state_at(&key, &STORAGE_POWER_ACTOR_ADDR)?;

        let mut infos = Vec::new();
        power_state
            .for_each_claim(self.store.as_ref(), |address, _claim| {
                let state: miner::State = self.chain.get_actor_state_at(&key, &address)?;
                let info = state.info;
                infos.push(StorageProviderInfo {
                    address,
                    owner: info.owner,
                    worker: info.worker,
                    sector_size: info.sector_size,
                    peer_id: info.peer_id,
                });
                Ok(())
            })
            .map_err(|e| Error::State(format!("failed to walk provider claims: {e}")))?;
        Ok(infos)
    }

    /// Returns all deals published on chain for the given client account.
    pub fn list_client_deals(
        &self,
        addr: &Address,
        tok: &TipsetToken,
    ) -> Result<Vec<StorageDeal>, Error> {
        let key = Self::decode_token(tok)?;
        let market_state: market::State = self
            .chain
            .get_actor_state_at(&key, &STORAGE_MARKET_ACTOR_ADDR)?;

        let proposals: Amt<DealProposal, _> = Amt::load(&market_state.proposals, self.store.as_ref())
            .map_err(|e| Error::State(format!("failed to load deal proposals: {e}")))?;
        let states: Amt<DealState, _> = Amt::load(&market_state.states, self.store.as_ref())
            .map_err(|e| Error::State(format!("failed to load deal states: {e}")))?;

        let mut deals = Vec::new();
        proposals
            .for_each(|deal_id, proposal| {
                if &proposal.client != addr {
                    return Ok(());
                }
                // A proposal without activation state is published but not
                // yet active; its epochs stay undefined.
                let state = states.get(deal_id)?.copied().unwrap_or_default();
                deals.push(StorageDeal {
                    deal_id,
                    proposal: proposal.clone(),
                    state,
                });
                Ok(())
            })
            .map_err(|e| Error::State(format!("failed to walk deal proposals: {e}")))?;
        Ok(deals)
    }

    /// Returns the market escrow balance held for `addr` at the given
    /// snapshot. Addresses without a table entry hold zero.
    pub fn get_balance(&self, addr: &Address, tok: &TipsetToken) -> Result<MarketBalance, Error> {
        let key = Self::decode_token(tok)?;
        let market_state: market::State = self
            .chain
            .get_actor_state_at(&key, &STORAGE_MARKET_ACTOR_ADDR)?;

        let escrow = market_state
            .escrow_table(self.store.as_ref())
            .and_then(|table| table.get(addr))
            .map_err(|e| Error::State(format!("failed to read escrow table: {e}")))?;
        let locked = market_state
            .locked_table(self.store.as_ref())
            .and_then(|table| table.get(addr))
            .map_err(|e| Error::State(format!("failed to read locked table: {e}")))?;

        Ok(MarketBalance { escrow, locked })
    }

    /// Checks the available balance for `addr` and tops it up from `wallet`
    /// when it falls short of `amount`.
    ///
    /// An address whose available balance already covers `amount` is left
    /// untouched; the call is an idempotent no-op. Otherwise exactly one
    /// transfer message for exactly the shortfall is issued. Failures of the
    /// balance read or the transfer propagate unchanged; no retries happen
    /// at this layer.
    pub async fn ensure_funds(
        &self,
        addr: &Address,
        wallet: &Address,
        amount: &TokenAmount,
        tok: &TipsetToken,
    ) -> Result<(), Error> {
        let balance = self.get_balance(addr, tok)?;
        let available = balance.available();
        match shortfall(&available, amount) {
            None => Ok(()),
            Some(missing) => self.add_funds(wallet, addr, missing).await.map(|_| ()),
        }
    }

    /// Sends `amount` from `from` to `to` as a plain value transfer.
    pub async fn add_funds(
        &self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<Cid, Error> {
        debug!(%from, %to, %amount, "adding funds");
        let cid = self
            .outbox
            .send(from, to, amount, METHOD_SEND, RawBytes::default())
            .await?;
        Ok(cid)
    }

    /// Signs `proposal` with the key held for `signer_addr`, binding the
    /// client to its exact terms.
    pub async fn sign_proposal(
        &self,
        signer_addr: &Address,
        proposal: DealProposal,
    ) -> Result<ClientDealProposal, Error> {
        let bytes = to_vec(&proposal)
            .map_err(|e| Error::State(format!("failed to serialize deal proposal: {e}")))?;
        let client_signature = self.signer.sign_bytes(signer_addr, &bytes).await?;
        Ok(ClientDealProposal {
            proposal,
            client_signature,
        })
    }

    /// Subscribing to sector-commitment events for a published deal is a
    /// declared capability gap of this connector.
    pub fn on_deal_sector_committed(
        &self,
        _provider: &Address,
        _deal_id: DealID,
    ) -> Result<(), Error> {
        Err(Error::NotImplemented("on_deal_sector_committed"))
    }
}
