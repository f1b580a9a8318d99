use {
  crate::{Address, Hash, Wei},
  ed25519_dalek::{Keypair, PublicKey, Signature, Signer, Verifier},
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
  std::fmt::Debug,
};

/// Contracts that can be created by a deploy transaction, together
/// with their constructor arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Deployment {
  /// Crowdfunding ledger. The deployer becomes its immutable owner.
  FundMe { price_feed: Address },

  /// Mock price feed for development chains.
  MockV3Aggregator { decimals: u8, initial_answer: i128 },
}

/// Calls that can be made on an existing account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Call {
  /// Contribute the attached value to a FundMe ledger.
  Fund,

  /// Owner-only withdrawal of the whole ledger balance.
  Withdraw,

  /// Same as `Withdraw`, with fewer storage reads.
  CheaperWithdraw,

  /// Sets a new latest answer on a mock price feed.
  UpdateAnswer { answer: i128 },

  /// Sets the full data of a round on a mock price feed.
  UpdateRoundData {
    round_id: u64,
    answer: i128,
    timestamp: u64,
    started_at: u64,
  },

  /// Plain value transfer without call data. FundMe ledgers treat
  /// it as a contribution, wallets simply receive the value.
  Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
  Deploy(Deployment),
  Call { to: Address, call: Call },
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Transaction {
  /// Sender wallet, the bytes of its ed25519 public key.
  pub from: Address,

  /// Must equal the current nonce of the sender account.
  pub nonce: u64,

  /// Price in wei paid for each unit of gas consumed.
  pub gas_price: Wei,

  /// Native currency attached to the transaction.
  pub value: Wei,

  pub action: Action,

  /// ed25519 signature of the signing hash by the sender.
  pub signature: Vec<u8>,

  #[serde(skip)]
  hash_cache: OnceCell<Hash>,
}

impl Transaction {
  /// Creates an unsigned transaction.
  pub fn new(
    from: Address,
    nonce: u64,
    gas_price: Wei,
    value: Wei,
    action: Action,
  ) -> Self {
    Self {
      from,
      nonce,
      gas_price,
      value,
      action,
      signature: vec![],
      hash_cache: OnceCell::new(),
    }
  }

  /// Creates a transaction sent from the wallet of the given keypair
  /// and signs it.
  pub fn signed(
    keypair: &Keypair,
    nonce: u64,
    gas_price: Wei,
    value: Wei,
    action: Action,
  ) -> Self {
    let mut tx =
      Self::new(keypair.public.into(), nonce, gas_price, value, action);
    tx.sign(keypair);
    tx
  }

  pub fn sign(&mut self, keypair: &Keypair) {
    self.signature = keypair
      .sign(self.signing_hash().as_ref())
      .to_bytes()
      .to_vec();
    self.hash_cache = OnceCell::new();
  }

  /// Checks that the signature was produced by the private key
  /// of the sender address over the signing hash.
  pub fn verify(&self) -> bool {
    let Ok(pubkey) = PublicKey::from_bytes(&self.from) else {
      return false;
    };
    let Ok(signature) = Signature::try_from(self.signature.as_slice()) else {
      return false;
    };
    pubkey
      .verify(self.signing_hash().as_ref(), &signature)
      .is_ok()
  }

  /// Hash of the contents of the transaction without the signature.
  /// This is the message signed by the sender.
  pub fn signing_hash(&self) -> Hash {
    Hash::of(&[
      &self.from,
      &self.nonce.to_le_bytes(),
      &self.gas_price.to_le_bytes(),
      &self.value.to_le_bytes(),
      &rmp_serde::to_vec(&self.action).unwrap(),
    ])
  }

  /// Hash of the transaction that uniquely identitifies it.
  pub fn hash(&self) -> &Hash {
    self.hash_cache.get_or_init(|| {
      Hash::of(&[self.signing_hash().as_ref(), &self.signature])
    })
  }
}

impl Debug for Transaction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transaction")
      .field("from", &self.from)
      .field("nonce", &self.nonce)
      .field("value", &self.value)
      .field("action", &self.action)
      .field("hash", self.hash())
      .finish()
  }
}
