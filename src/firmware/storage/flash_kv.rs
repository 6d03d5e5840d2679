use embedded_storage::Storage;
use heapless::String;

use super::kv::{KeyValueStore, StoreError};

pub const KV_SLOT_LEN: usize = 128;
pub const KV_NAME_MAX: usize = 16;
pub const KV_VALUE_MAX: usize = 80;

const KV_MAGIC: u32 = 0x4B56_5331;
const KV_VERSION: u8 = 1;
const OFFSET_VERSION: usize = 4;
const OFFSET_NS_LEN: usize = 5;
const OFFSET_KEY_LEN: usize = 6;
const OFFSET_VALUE_LEN: usize = 7;
const OFFSET_NS: usize = 8;
const OFFSET_KEY: usize = OFFSET_NS + KV_NAME_MAX;
const OFFSET_VALUE: usize = OFFSET_KEY + KV_NAME_MAX;
const OFFSET_CHECKSUM: usize = KV_SLOT_LEN - 1;

type SlotBytes = [u8; KV_SLOT_LEN];

enum SlotState<'s> {
    Blank,
    Corrupt,
    Valid {
        namespace: &'s [u8],
        key: &'s [u8],
        value: &'s [u8],
    },
}

fn decode_slot(slot: &SlotBytes) -> SlotState<'_> {
    if slot.iter().all(|&byte| byte == 0xFF) {
        return SlotState::Blank;
    }
    if u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]) != KV_MAGIC
        || slot[OFFSET_VERSION] != KV_VERSION
        || slot[OFFSET_CHECKSUM] != checksum8(&slot[..OFFSET_CHECKSUM])
    {
        return SlotState::Corrupt;
    }
    let ns_len = slot[OFFSET_NS_LEN] as usize;
    let key_len = slot[OFFSET_KEY_LEN] as usize;
    let value_len = slot[OFFSET_VALUE_LEN] as usize;
    if ns_len > KV_NAME_MAX || key_len > KV_NAME_MAX || value_len > KV_VALUE_MAX {
        return SlotState::Corrupt;
    }
    SlotState::Valid {
        namespace: &slot[OFFSET_NS..OFFSET_NS + ns_len],
        key: &slot[OFFSET_KEY..OFFSET_KEY + key_len],
        value: &slot[OFFSET_VALUE..OFFSET_VALUE + value_len],
    }
}

fn encode_slot(namespace: &str, key: &str, value: &str) -> SlotBytes {
    let mut slot = [0xFFu8; KV_SLOT_LEN];
    slot[0..4].copy_from_slice(&KV_MAGIC.to_le_bytes());
    slot[OFFSET_VERSION] = KV_VERSION;
    slot[OFFSET_NS_LEN] = namespace.len() as u8;
    slot[OFFSET_KEY_LEN] = key.len() as u8;
    slot[OFFSET_VALUE_LEN] = value.len() as u8;
    slot[OFFSET_NS..OFFSET_NS + namespace.len()].copy_from_slice(namespace.as_bytes());
    slot[OFFSET_KEY..OFFSET_KEY + key.len()].copy_from_slice(key.as_bytes());
    slot[OFFSET_VALUE..OFFSET_VALUE + value.len()].copy_from_slice(value.as_bytes());
    slot[OFFSET_CHECKSUM] = checksum8(&slot[..OFFSET_CHECKSUM]);
    slot
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

/// Key/value pairs in fixed 128-byte flash slots: magic, version, lengths, namespace, key,
/// value, checksum. Blank or corrupt slots are reusable.
pub struct FlashKvStore<S> {
    storage: S,
    offset: u32,
    slots: u32,
}

impl<S: Storage> FlashKvStore<S> {
    pub fn new(storage: S, offset: u32, slots: u32) -> Self {
        Self {
            storage,
            offset,
            slots,
        }
    }

    /// Places the slot table at the tail of the device.
    pub fn at_end(storage: S, slots: u32) -> Self {
        let capacity = storage.capacity() as u32;
        let offset = capacity.saturating_sub(slots.saturating_mul(KV_SLOT_LEN as u32));
        Self::new(storage, offset, slots)
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn slot_offset(&self, index: u32) -> u32 {
        self.offset + index * KV_SLOT_LEN as u32
    }

    fn read_slot(&mut self, index: u32) -> Result<SlotBytes, StoreError> {
        let mut slot = [0u8; KV_SLOT_LEN];
        let offset = self.slot_offset(index);
        self.storage
            .read(offset, &mut slot)
            .map_err(|_| StoreError::Io)?;
        Ok(slot)
    }

    fn locate(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<(Option<(u32, SlotBytes)>, Option<u32>), StoreError> {
        let mut free = None;
        for index in 0..self.slots {
            let slot = self.read_slot(index)?;
            match decode_slot(&slot) {
                SlotState::Valid {
                    namespace: stored_ns,
                    key: stored_key,
                    ..
                } => {
                    if stored_ns == namespace.as_bytes() && stored_key == key.as_bytes() {
                        return Ok((Some((index, slot)), free));
                    }
                }
                SlotState::Blank | SlotState::Corrupt => {
                    if free.is_none() {
                        free = Some(index);
                    }
                }
            }
        }
        Ok((None, free))
    }
}

fn check_names(namespace: &str, key: &str) -> Result<(), StoreError> {
    if namespace.is_empty()
        || key.is_empty()
        || namespace.len() > KV_NAME_MAX
        || key.len() > KV_NAME_MAX
    {
        return Err(StoreError::NameTooLong);
    }
    Ok(())
}

impl<S: Storage> KeyValueStore for FlashKvStore<S> {
    fn get<const N: usize>(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String<N>>, StoreError> {
        check_names(namespace, key)?;
        let Some((_, slot)) = self.locate(namespace, key)?.0 else {
            return Ok(None);
        };
        let SlotState::Valid { value, .. } = decode_slot(&slot) else {
            return Ok(None);
        };
        let value = core::str::from_utf8(value).map_err(|_| StoreError::InvalidData)?;
        String::try_from(value)
            .map(Some)
            .map_err(|_| StoreError::ValueTooLong)
    }

    fn put(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        check_names(namespace, key)?;
        if value.len() > KV_VALUE_MAX {
            return Err(StoreError::ValueTooLong);
        }
        let encoded = encode_slot(namespace, key, value);
        let (existing, free) = self.locate(namespace, key)?;
        let index = match existing {
            Some((_, slot)) if slot == encoded => return Ok(()),
            Some((index, _)) => index,
            None => free.ok_or(StoreError::Full)?,
        };
        let offset = self.slot_offset(index);
        self.storage
            .write(offset, &encoded)
            .map_err(|_| StoreError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::storage::RamStorage;

    type Flash = RamStorage<{ KV_SLOT_LEN * 4 }>;

    #[test]
    fn missing_key_reads_none() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 4);
        assert_eq!(store.get::<32>("wifi_cred", "ssid"), Ok(None));
    }

    #[test]
    fn put_then_get_and_overwrite_in_place() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 4);
        store.put("wifi_cred", "ssid", "lab").expect("put");
        store.put("wifi_cred", "pass", "pw").expect("put");
        store.put("wifi_cred", "ssid", "office").expect("overwrite");

        let ssid: Option<String<32>> = store.get("wifi_cred", "ssid").expect("get");
        let pass: Option<String<64>> = store.get("wifi_cred", "pass").expect("get");
        assert_eq!(ssid.as_deref(), Some("office"));
        assert_eq!(pass.as_deref(), Some("pw"));

        let flash = store.into_inner();
        let blank_slots = flash
            .as_bytes()
            .chunks(KV_SLOT_LEN)
            .filter(|slot| slot.iter().all(|&byte| byte == 0xFF))
            .count();
        assert_eq!(blank_slots, 2);
    }

    #[test]
    fn namespaces_are_distinct() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 4);
        store.put("a", "k", "one").expect("put");
        store.put("b", "k", "two").expect("put");
        assert_eq!(store.get::<8>("a", "k").expect("get").as_deref(), Some("one"));
        assert_eq!(store.get::<8>("b", "k").expect("get").as_deref(), Some("two"));
    }

    #[test]
    fn full_table_rejects_new_keys() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 2);
        store.put("ns", "a", "1").expect("put");
        store.put("ns", "b", "2").expect("put");
        assert_eq!(store.put("ns", "c", "3"), Err(StoreError::Full));
        assert_eq!(store.put("ns", "a", "9"), Ok(()));
    }

    #[test]
    fn corrupted_slot_is_ignored_and_reused() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 1);
        store.put("ns", "a", "1").expect("put");
        let mut flash = store.into_inner();
        flash.as_bytes_mut()[OFFSET_VALUE] ^= 0x01;

        let mut store = FlashKvStore::new(flash, 0, 1);
        assert_eq!(store.get::<8>("ns", "a"), Ok(None));
        store.put("ns", "b", "2").expect("reuse corrupt slot");
        assert_eq!(store.get::<8>("ns", "b").expect("get").as_deref(), Some("2"));
    }

    #[test]
    fn rejects_oversized_names_and_values() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 4);
        let long_value = "v".repeat(KV_VALUE_MAX + 1);
        assert_eq!(
            store.put("namespace_far_too_long", "k", "v"),
            Err(StoreError::NameTooLong)
        );
        assert_eq!(store.put("ns", "k", &long_value), Err(StoreError::ValueTooLong));
    }

    #[test]
    fn value_larger_than_read_buffer_is_reported() {
        let mut store = FlashKvStore::new(Flash::new(), 0, 4);
        store.put("ns", "k", "twelve chars").expect("put");
        assert_eq!(store.get::<4>("ns", "k"), Err(StoreError::ValueTooLong));
    }

    #[test]
    fn at_end_uses_tail_of_device() {
        let mut store = FlashKvStore::at_end(RamStorage::<{ KV_SLOT_LEN * 8 }>::new(), 2);
        store.put("ns", "k", "v").expect("put");
        let flash = store.into_inner();
        assert!(flash.as_bytes()[..KV_SLOT_LEN * 6].iter().all(|&byte| byte == 0xFF));
        assert!(flash.as_bytes()[KV_SLOT_LEN * 6..].iter().any(|&byte| byte != 0xFF));
    }
}
