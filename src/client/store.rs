use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use file_lock::{FileLock, FileOptions};
use log::warn;

use crate::types::token::TokenPair;

/// Holds the active token pair in one of two scopes: a session scope that
/// dies with the process, and a durable scope that survives it. The client
/// only reads, replaces, and clears; login decides the scope.
pub trait TokenStore: Send + Sync {
    /// Active pair from whichever scope holds one; session wins.
    fn get(&self) -> Result<Option<TokenPair>>;

    /// Write the pair into the chosen scope and empty the other one, so the
    /// two scopes can never disagree.
    fn set(&self, pair: TokenPair, persist: bool) -> Result<()>;

    /// Replace the pair in whichever scope currently holds it, falling back
    /// to the session scope when both are empty. Used by token refresh so a
    /// durable login stays durable.
    fn replace(&self, pair: TokenPair) -> Result<()>;

    /// Remove the pair from both scopes.
    fn clear(&self) -> Result<()>;
}

/// Both scopes in memory. Embedders and tests use this one.
#[derive(Default)]
pub struct MemoryTokenStore {
    scopes: Mutex<MemoryScopes>,
}

#[derive(Default)]
struct MemoryScopes {
    session: Option<TokenPair>,
    durable: Option<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<TokenPair>> {
        let scopes = self.scopes.lock().unwrap();
        Ok(scopes.session.clone().or_else(|| scopes.durable.clone()))
    }

    fn set(&self, pair: TokenPair, persist: bool) -> Result<()> {
        let mut scopes = self.scopes.lock().unwrap();
        if persist {
            scopes.durable = Some(pair);
            scopes.session = None;
        } else {
            scopes.session = Some(pair);
            scopes.durable = None;
        }
        Ok(())
    }

    fn replace(&self, pair: TokenPair) -> Result<()> {
        let mut scopes = self.scopes.lock().unwrap();
        if scopes.session.is_none() && scopes.durable.is_some() {
            scopes.durable = Some(pair);
        } else {
            scopes.session = Some(pair);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut scopes = self.scopes.lock().unwrap();
        scopes.session = None;
        scopes.durable = None;
        Ok(())
    }
}

/// Session scope in memory, durable scope as a JSON file guarded by an OS
/// file lock so concurrent invocations don't interleave partial writes.
pub struct FileTokenStore {
    path: String,
    session: Mutex<Option<TokenPair>>,
}

impl FileTokenStore {
    pub fn new(path: String) -> Self {
        Self {
            path,
            session: Mutex::new(None),
        }
    }

    fn read_file(&self) -> Result<Option<TokenPair>> {
        let data = match read_file_lock(&self.path)? {
            Some(data) => data,
            None => return Ok(None),
        };

        match serde_json::from_slice(&data) {
            Ok(pair) => Ok(Some(pair)),
            Err(_) => {
                warn!("Token file has invalid data, we will ignore it");
                Ok(None)
            }
        }
    }

    fn write_file(&self, pair: &TokenPair) -> Result<()> {
        if let Some(dir) = Path::new(&self.path).parent() {
            fs::create_dir_all(dir).context("create token directory")?;
        }
        let data = serde_json::to_vec(pair)?;
        write_file_lock(&self.path, &data)
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("remove token file"),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<TokenPair>> {
        let session = self.session.lock().unwrap();
        if session.is_some() {
            return Ok(session.clone());
        }
        drop(session);
        self.read_file()
    }

    fn set(&self, pair: TokenPair, persist: bool) -> Result<()> {
        let mut session = self.session.lock().unwrap();
        if persist {
            *session = None;
            self.write_file(&pair)
        } else {
            *session = Some(pair);
            self.remove_file()
        }
    }

    fn replace(&self, pair: TokenPair) -> Result<()> {
        let mut session = self.session.lock().unwrap();
        if session.is_some() {
            *session = Some(pair);
            return Ok(());
        }
        drop(session);
        if self.read_file()?.is_some() {
            return self.write_file(&pair);
        }
        *self.session.lock().unwrap() = Some(pair);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        self.remove_file()
    }
}

fn read_file_lock(path: &str) -> Result<Option<Vec<u8>>> {
    let opts = FileOptions::new().read(true);
    let mut file = match FileLock::lock(path, true, opts) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut data = Vec::new();
    file.file.read_to_end(&mut data)?;
    Ok(Some(data))
}

fn write_file_lock(path: &str, data: &[u8]) -> Result<()> {
    let opts = FileOptions::new().write(true).truncate(true).create(true);
    let mut file = FileLock::lock(path, true, opts)?;
    file.file.write_all(data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(tag: &str) -> TokenPair {
        TokenPair {
            access_token: format!("A-{tag}"),
            refresh_token: format!("R-{tag}"),
            token_type: String::from("Bearer"),
        }
    }

    #[test]
    fn memory_scopes_are_exclusive() {
        let store = MemoryTokenStore::new();
        assert!(store.get().unwrap().is_none());

        store.set(pair("session"), false).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), pair("session"));

        store.set(pair("durable"), true).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), pair("durable"));
        {
            let scopes = store.scopes.lock().unwrap();
            assert!(scopes.session.is_none());
        }

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn memory_replace_keeps_scope() {
        let store = MemoryTokenStore::new();
        store.set(pair("old"), true).unwrap();
        store.replace(pair("new")).unwrap();

        let scopes = store.scopes.lock().unwrap();
        assert_eq!(scopes.durable, Some(pair("new")));
        assert!(scopes.session.is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("sharepay-store-test-{}", std::process::id()))
            .join("token.json");
        let store = FileTokenStore::new(path.to_str().unwrap().to_string());

        assert!(store.get().unwrap().is_none());

        store.set(pair("durable"), true).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), pair("durable"));

        // A fresh store instance must see the durable pair.
        let other = FileTokenStore::new(path.to_str().unwrap().to_string());
        assert_eq!(other.get().unwrap().unwrap(), pair("durable"));

        store.replace(pair("rotated")).unwrap();
        assert_eq!(other.get().unwrap().unwrap(), pair("rotated"));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
        assert!(other.get().unwrap().is_none());
    }

    #[test]
    fn file_store_session_scope_stays_local() {
        let path = std::env::temp_dir()
            .join(format!("sharepay-session-test-{}", std::process::id()))
            .join("token.json");
        let store = FileTokenStore::new(path.to_str().unwrap().to_string());

        store.set(pair("session"), false).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), pair("session"));

        // Nothing on disk for another instance to pick up.
        let other = FileTokenStore::new(path.to_str().unwrap().to_string());
        assert!(other.get().unwrap().is_none());

        store.replace(pair("rotated")).unwrap();
        assert_eq!(store.get().unwrap().unwrap(), pair("rotated"));
        assert!(other.get().unwrap().is_none());
    }

    #[test]
    fn corrupt_token_file_is_ignored() {
        let dir = std::env::temp_dir().join(format!("sharepay-corrupt-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token.json");
        fs::write(&path, b"not json").unwrap();

        let store = FileTokenStore::new(path.to_str().unwrap().to_string());
        assert!(store.get().unwrap().is_none());
    }
}
