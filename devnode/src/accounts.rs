use {
  ed25519_dalek::{Keypair, PublicKey, SecretKey},
  fundme_primitives::{Account, Address, Hash, Wei, WEI_PER_ETHER},
  fundme_vm::{State, StateDiff},
};

/// Balance each development signer starts with.
pub const GENESIS_BALANCE: Wei = 10_000 * WEI_PER_ETHER;

/// Deterministic signing keys of a local chain.
///
/// Keys are derived from their index, so every node instance and every
/// run of the same network ends up with the same signers. Signer `0` is
/// the deployer and owner of all contracts deployed by the scripts.
pub struct Signers {
  keypairs: Vec<Keypair>,
}

impl Signers {
  pub fn new(count: usize) -> anyhow::Result<Self> {
    let keypairs = (0..count)
      .map(|index| -> Result<Keypair, ed25519_dalek::SignatureError> {
        let seed = format!("fundme/devnode/signer/{index}");
        let digest = Hash::of(&[seed.as_bytes()]);
        let secret = SecretKey::from_bytes(digest.as_ref())?;
        let public = PublicKey::from(&secret);
        Ok(Keypair { secret, public })
      })
      .collect::<Result<_, _>>()?;
    Ok(Self { keypairs })
  }

  pub fn get(&self, index: usize) -> anyhow::Result<&Keypair> {
    self.keypairs.get(index).ok_or_else(|| {
      anyhow::anyhow!(
        "signer {index} does not exist, there are {} signers",
        self.keypairs.len()
      )
    })
  }

  pub fn deployer(&self) -> anyhow::Result<&Keypair> {
    self.get(0)
  }

  pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
    self.keypairs.iter().map(|keypair| keypair.public.into())
  }

  /// Wallets of the signers that do not exist yet in `state`,
  /// each holding [`GENESIS_BALANCE`].
  pub fn genesis(&self, state: &impl State) -> StateDiff {
    let mut diff = StateDiff::default();
    for address in self.addresses() {
      if state.get(&address).is_none() {
        diff.set(address, Account::wallet(GENESIS_BALANCE));
      }
    }
    diff
  }
}
