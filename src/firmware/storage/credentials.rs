use heapless::String;

use super::kv::{KeyValueStore, StoreError};
use crate::firmware::{
    config::{NVS_WIFI_NAMESPACE, NVS_WIFI_PASS, NVS_WIFI_SSID},
    types::{NetworkCredentials, WIFI_PASSWORD_MAX, WIFI_SSID_MAX},
};

/// Last known-good Wi-Fi credentials. Only written once a connection made with them succeeded.
pub struct CredentialStore<S> {
    kv: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    /// `None` unless both fields are stored and non-empty.
    pub fn load(&mut self) -> Option<NetworkCredentials> {
        let ssid = self.read::<WIFI_SSID_MAX>(NVS_WIFI_SSID)?;
        let password = self.read::<WIFI_PASSWORD_MAX>(NVS_WIFI_PASS)?;
        match NetworkCredentials::new(&ssid, &password) {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                log::warn!("net: stored credentials ignored err={}", err);
                None
            }
        }
    }

    pub fn load_or(&mut self, fallback: Option<NetworkCredentials>) -> Option<NetworkCredentials> {
        match self.load() {
            Some(stored) => {
                log::info!("net: boot credentials source=store ssid={}", stored.ssid());
                Some(stored)
            }
            None => {
                if let Some(compiled) = fallback.as_ref() {
                    log::info!(
                        "net: boot credentials source=compiled ssid={}",
                        compiled.ssid()
                    );
                }
                fallback
            }
        }
    }

    /// Writes ssid then password. When the password write fails the previous ssid is put back,
    /// so storage never pairs the new ssid with the old password.
    pub fn commit(&mut self, credentials: &NetworkCredentials) -> Result<(), StoreError> {
        let previous_ssid = self
            .kv
            .get::<WIFI_SSID_MAX>(NVS_WIFI_NAMESPACE, NVS_WIFI_SSID)?;
        self.kv
            .put(NVS_WIFI_NAMESPACE, NVS_WIFI_SSID, credentials.ssid())?;
        if let Err(err) = self
            .kv
            .put(NVS_WIFI_NAMESPACE, NVS_WIFI_PASS, credentials.password())
        {
            // An empty ssid reads back as "nothing stored".
            let restore = previous_ssid.as_deref().unwrap_or("");
            if let Err(restore_err) = self.kv.put(NVS_WIFI_NAMESPACE, NVS_WIFI_SSID, restore) {
                log::warn!(
                    "net: ssid restore failed err={}; stored pair is mismatched",
                    restore_err.as_str()
                );
            }
            return Err(err);
        }
        Ok(())
    }

    fn read<const N: usize>(&mut self, key: &str) -> Option<String<N>> {
        match self.kv.get::<N>(NVS_WIFI_NAMESPACE, key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                log::warn!("net: credential read failed key={} err={}", key, err.as_str());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::storage::{FlashKvStore, RamStorage, KV_SLOT_LEN};

    type Flash = RamStorage<{ KV_SLOT_LEN * 4 }>;

    fn store() -> CredentialStore<FlashKvStore<Flash>> {
        CredentialStore::new(FlashKvStore::new(Flash::new(), 0, 4))
    }

    fn creds(ssid: &str, password: &str) -> NetworkCredentials {
        NetworkCredentials::new(ssid, password).expect("valid credentials")
    }

    #[test]
    fn empty_store_loads_nothing() {
        assert_eq!(store().load(), None);
    }

    #[test]
    fn commit_then_load() {
        let mut store = store();
        store.commit(&creds("lab", "pw")).expect("commit");
        assert_eq!(store.load(), Some(creds("lab", "pw")));
    }

    #[test]
    fn half_written_pair_is_ignored() {
        let mut kv = FlashKvStore::new(Flash::new(), 0, 4);
        kv.put(NVS_WIFI_NAMESPACE, NVS_WIFI_SSID, "lab").expect("put");
        let mut store = CredentialStore::new(&mut kv);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn empty_password_is_ignored() {
        let mut kv = FlashKvStore::new(Flash::new(), 0, 4);
        kv.put(NVS_WIFI_NAMESPACE, NVS_WIFI_SSID, "lab").expect("put");
        kv.put(NVS_WIFI_NAMESPACE, NVS_WIFI_PASS, "").expect("put");
        let mut store = CredentialStore::new(&mut kv);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_or_prefers_stored_pair() {
        let mut store = store();
        assert_eq!(
            store.load_or(Some(creds("compiled", "pw"))),
            Some(creds("compiled", "pw"))
        );
        store.commit(&creds("stored", "pw2")).expect("commit");
        assert_eq!(
            store.load_or(Some(creds("compiled", "pw"))),
            Some(creds("stored", "pw2"))
        );
    }

    /// Fails every write to one key while armed.
    struct FailingKey<'a> {
        inner: &'a mut FlashKvStore<Flash>,
        failing_key: &'static str,
    }

    impl KeyValueStore for FailingKey<'_> {
        fn get<const N: usize>(
            &mut self,
            namespace: &str,
            key: &str,
        ) -> Result<Option<String<N>>, StoreError> {
            self.inner.get(namespace, key)
        }

        fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.failing_key {
                return Err(StoreError::Io);
            }
            self.inner.put(namespace, key, value)
        }
    }

    #[test]
    fn failed_password_write_keeps_previous_pair() {
        let mut kv = FlashKvStore::new(Flash::new(), 0, 4);
        CredentialStore::new(&mut kv)
            .commit(&creds("A", "pw-a"))
            .expect("seed");

        let mut faulty = CredentialStore::new(FailingKey {
            inner: &mut kv,
            failing_key: NVS_WIFI_PASS,
        });
        assert_eq!(faulty.commit(&creds("B", "pw-b")), Err(StoreError::Io));

        assert_eq!(CredentialStore::new(&mut kv).load(), Some(creds("A", "pw-a")));
    }

    #[test]
    fn failed_first_password_write_leaves_nothing_loadable() {
        let mut kv = FlashKvStore::new(Flash::new(), 0, 4);
        let mut faulty = CredentialStore::new(FailingKey {
            inner: &mut kv,
            failing_key: NVS_WIFI_PASS,
        });
        assert_eq!(faulty.commit(&creds("B", "pw-b")), Err(StoreError::Io));

        assert_eq!(CredentialStore::new(&mut kv).load(), None);
    }

    #[test]
    fn commit_surfaces_full_store() {
        let mut store = CredentialStore::new(FlashKvStore::new(Flash::new(), 0, 1));
        assert_eq!(store.commit(&creds("lab", "pw")), Err(StoreError::Full));
    }
}
