use {
  fundme_primitives::{Account, Address, Block},
  fundme_vm::{InMemoryStateStore, State, StateDiff},
  rmp_serde::{from_slice, to_vec},
  serde::{de::DeserializeOwned, Serialize},
  sled::{transaction::ConflictableTransactionError, Transactional},
  std::{collections::BTreeMap, path::Path},
};

const HEAD_KEY: &str = "head";

pub struct OnDiskStateStore {
  tree: sled::Tree,
}

impl OnDiskStateStore {
  pub fn new(db: &sled::Db, name: &str) -> Result<Self, sled::Error> {
    Ok(Self {
      tree: db.open_tree(name)?,
    })
  }
}

impl State for OnDiskStateStore {
  fn get(&self, address: &Address) -> Option<Account> {
    match self.tree.get(address).expect("db io error") {
      Some(bytes) => Some(from_slice(&bytes).expect("db corrupt")),
      None => None,
    }
  }

  fn apply(&mut self, diff: StateDiff) {
    for (acc, item) in diff.iter() {
      self
        .tree
        .insert(acc, to_vec(item).expect("serialization failed"))
        .expect("db error");
    }
    self.tree.flush().expect("db tree flush failed");
  }
}

/// Chain state of one network together with its node metadata,
/// the deployments registry and the chain head.
///
/// Ephemeral if no data directory is given, otherwise kept in a
/// sled database with one pair of trees per network. Every store
/// opens its own database, so a data directory can back only one
/// open store at a time.
pub enum Store {
  Memory {
    state: InMemoryStateStore,
    meta: BTreeMap<String, Vec<u8>>,
  },
  Disk {
    state: OnDiskStateStore,
    meta: sled::Tree,
  },
}

impl Store {
  pub fn open(data_dir: Option<&Path>, network: &str) -> anyhow::Result<Self> {
    Ok(match data_dir {
      None => Store::Memory {
        state: InMemoryStateStore::default(),
        meta: BTreeMap::new(),
      },
      Some(path) => {
        let db = sled::open(path)?;
        Store::Disk {
          state: OnDiskStateStore::new(&db, &format!("{network}/accounts"))?,
          meta: db.open_tree(format!("{network}/meta"))?,
        }
      }
    })
  }

  /// The last block committed to this store.
  pub fn head(&self) -> anyhow::Result<Option<Block>> {
    self.get_meta(HEAD_KEY)
  }

  /// Applies the account changes of a block and makes it the new head.
  ///
  /// On disk both writes happen in a single transaction, the accounts
  /// never advance past the stored head.
  pub fn commit(&mut self, diff: StateDiff, head: &Block) -> anyhow::Result<()> {
    let head = to_vec(head)?;
    match self {
      Store::Memory { state, meta } => {
        state.apply(diff);
        meta.insert(HEAD_KEY.to_owned(), head);
      }
      Store::Disk { state, meta } => {
        let accounts = diff
          .iter()
          .map(|(address, account)| to_vec(account).map(|bytes| (*address, bytes)))
          .collect::<Result<Vec<_>, _>>()?;

        (&state.tree, &*meta)
          .transaction(|(tx_accounts, tx_meta)| {
            for (address, account) in &accounts {
              tx_accounts.insert(&address[..], account.as_slice())?;
            }
            tx_meta.insert(HEAD_KEY, head.as_slice())?;
            Ok::<_, ConflictableTransactionError>(())
          })
          .map_err(|e| anyhow::anyhow!("block commit failed: {e:?}"))?;
        meta.flush()?;
      }
    }
    Ok(())
  }

  pub fn get_meta<T: DeserializeOwned>(
    &self,
    key: &str,
  ) -> anyhow::Result<Option<T>> {
    let bytes = match self {
      Store::Memory { meta, .. } => meta.get(key).cloned(),
      Store::Disk { meta, .. } => meta.get(key)?.map(|ivec| ivec.to_vec()),
    };
    Ok(match bytes {
      Some(bytes) => Some(from_slice(&bytes)?),
      None => None,
    })
  }

  pub fn put_meta<T: Serialize>(
    &mut self,
    key: &str,
    value: &T,
  ) -> anyhow::Result<()> {
    let bytes = to_vec(value)?;
    match self {
      Store::Memory { meta, .. } => {
        meta.insert(key.to_owned(), bytes);
      }
      Store::Disk { meta, .. } => {
        meta.insert(key, bytes)?;
        meta.flush()?;
      }
    }
    Ok(())
  }
}

impl State for Store {
  fn get(&self, address: &Address) -> Option<Account> {
    match self {
      Store::Memory { state, .. } => state.get(address),
      Store::Disk { state, .. } => state.get(address),
    }
  }

  fn apply(&mut self, diff: StateDiff) {
    match self {
      Store::Memory { state, .. } => state.apply(diff),
      Store::Disk { state, .. } => state.apply(diff),
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    fundme_primitives::WEI_PER_ETHER,
    std::path::PathBuf,
  };

  fn data_dir(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("fundme-devnode-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&path);
    path
  }

  fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 32])
  }

  fn wallet(byte: u8, balance: u128) -> StateDiff {
    let mut diff = StateDiff::default();
    diff.set(addr(byte), Account::wallet(balance));
    diff
  }

  #[test]
  fn commit_persists_accounts_and_head_together() -> anyhow::Result<()> {
    let path = data_dir("commit");
    let head = Block::new(&Block::zero(), 10, vec![]);

    {
      let mut store = Store::open(Some(&path), "hardhat")?;
      assert!(store.head()?.is_none());
      store.commit(wallet(1, WEI_PER_ETHER), &head)?;
    }

    {
      let store = Store::open(Some(&path), "hardhat")?;
      assert_eq!(store.head()?.map(|block| *block.hash()), Some(*head.hash()));
      assert_eq!(store.get(&addr(1)).map(|a| a.balance), Some(WEI_PER_ETHER));
    }

    // networks keep separate trees in the same database
    {
      let store = Store::open(Some(&path), "sepolia")?;
      assert!(store.head()?.is_none());
      assert!(store.get(&addr(1)).is_none());
    }

    std::fs::remove_dir_all(path)?;
    Ok(())
  }

  #[test]
  fn stores_at_different_paths_are_independent() -> anyhow::Result<()> {
    let first_path = data_dir("first");
    let second_path = data_dir("second");
    let head = Block::zero();

    let mut first = Store::open(Some(&first_path), "hardhat")?;
    let mut second = Store::open(Some(&second_path), "hardhat")?;
    first.commit(wallet(1, 1), &head)?;
    second.commit(wallet(2, 2), &head)?;

    assert_eq!(first.get(&addr(1)).map(|a| a.balance), Some(1));
    assert!(first.get(&addr(2)).is_none());
    assert_eq!(second.get(&addr(2)).map(|a| a.balance), Some(2));
    assert!(second.get(&addr(1)).is_none());

    drop((first, second));
    std::fs::remove_dir_all(first_path)?;
    std::fs::remove_dir_all(second_path)?;
    Ok(())
  }

  #[test]
  fn memory_store_commits_head() -> anyhow::Result<()> {
    let mut store = Store::open(None, "hardhat")?;
    let head = Block::new(&Block::zero(), 5, vec![]);
    store.commit(wallet(3, 7), &head)?;
    assert_eq!(store.head()?.map(|block| block.height), Some(1));
    assert_eq!(store.get(&addr(3)).map(|a| a.balance), Some(7));
    Ok(())
  }
}
