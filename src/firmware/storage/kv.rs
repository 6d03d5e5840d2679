use heapless::String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failed")]
    Io,
    #[error("no free slot")]
    Full,
    #[error("namespace or key too long")]
    NameTooLong,
    #[error("value too long")]
    ValueTooLong,
    #[error("stored value is not valid utf-8")]
    InvalidData,
}

impl StoreError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::Full => "full",
            Self::NameTooLong => "name_too_long",
            Self::ValueTooLong => "value_too_long",
            Self::InvalidData => "invalid_data",
        }
    }
}

/// Namespaced string store, NVS style.
pub trait KeyValueStore {
    /// `Ok(None)` when the key was never written.
    fn get<const N: usize>(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String<N>>, StoreError>;

    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore> KeyValueStore for &mut T {
    fn get<const N: usize>(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String<N>>, StoreError> {
        (**self).get(namespace, key)
    }

    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(namespace, key, value)
    }
}
