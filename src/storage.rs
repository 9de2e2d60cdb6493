//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//

/// Value kinds a storage slot can hold. Accessors panic on a kind mismatch;
/// reusing one key for different kinds is a caller bug.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StorageValue {
    /// Signed integer payload (also backs booleans).
    Int(i32),
    /// Float payload.
    Float(f32),
    /// Opaque index/handle payload.
    Ptr(usize),
}

impl StorageValue {
    fn as_int(&self) -> i32 {
        match self {
            StorageValue::Int(v) => *v,
            _ => panic!("storage entry is not an int"),
        }
    }

    fn as_int_mut(&mut self) -> &mut i32 {
        match self {
            StorageValue::Int(v) => v,
            _ => panic!("storage entry is not an int"),
        }
    }

    fn as_float(&self) -> f32 {
        match self {
            StorageValue::Float(v) => *v,
            _ => panic!("storage entry is not a float"),
        }
    }

    fn as_float_mut(&mut self) -> &mut f32 {
        match self {
            StorageValue::Float(v) => v,
            _ => panic!("storage entry is not a float"),
        }
    }

    fn as_ptr(&self) -> usize {
        match self {
            StorageValue::Ptr(v) => *v,
            _ => panic!("storage entry is not a ptr"),
        }
    }
}

#[derive(Clone, Debug)]
struct StorageEntry {
    key: u32,
    value: StorageValue,
}

/// Persistent per-widget state keyed by id hash: an insertion-sorted vector
/// probed with a binary lower bound.
#[derive(Default)]
pub struct Storage {
    data: Vec<StorageEntry>,
}

impl Storage {
    /// Creates an empty storage.
    pub fn new() -> Self { Self::default() }

    // index of the first entry with key >= `key`
    fn lower_bound(&self, key: u32) -> usize {
        let mut first = 0;
        let mut count = self.data.len();
        while count > 0 {
            let half = count >> 1;
            let middle = first + half;
            if self.data[middle].key < key {
                first = middle + 1;
                count -= half + 1;
            } else {
                count = half;
            }
        }
        first
    }

    fn get(&self, key: u32) -> Option<&StorageValue> {
        let i = self.lower_bound(key);
        match self.data.get(i) {
            Some(entry) if entry.key == key => Some(&entry.value),
            _ => None,
        }
    }

    // inserts a default when absent and returns a stable index; the index is
    // valid until the next insertion
    fn get_or_insert(&mut self, key: u32, default: StorageValue) -> usize {
        let i = self.lower_bound(key);
        match self.data.get(i) {
            Some(entry) if entry.key == key => i,
            _ => {
                self.data.insert(i, StorageEntry { key, value: default });
                i
            }
        }
    }

    /// Reads an int, returning `default` when absent.
    pub fn get_int(&self, key: u32, default: i32) -> i32 { self.get(key).map(|v| v.as_int()).unwrap_or(default) }

    /// Writes an int.
    pub fn set_int(&mut self, key: u32, value: i32) {
        let i = self.get_or_insert(key, StorageValue::Int(value));
        self.data[i].value = StorageValue::Int(value);
    }

    /// Reads a bool, returning `default` when absent.
    pub fn get_bool(&self, key: u32, default: bool) -> bool { self.get_int(key, default as i32) != 0 }

    /// Writes a bool.
    pub fn set_bool(&mut self, key: u32, value: bool) { self.set_int(key, value as i32); }

    /// Reads a float, returning `default` when absent.
    pub fn get_float(&self, key: u32, default: f32) -> f32 { self.get(key).map(|v| v.as_float()).unwrap_or(default) }

    /// Writes a float.
    pub fn set_float(&mut self, key: u32, value: f32) {
        let i = self.get_or_insert(key, StorageValue::Float(value));
        self.data[i].value = StorageValue::Float(value);
    }

    /// Reads a ptr slot, returning `None` when absent.
    pub fn get_ptr(&self, key: u32) -> Option<usize> { self.get(key).map(|v| v.as_ptr()) }

    /// Writes a ptr slot.
    pub fn set_ptr(&mut self, key: u32, value: usize) {
        let i = self.get_or_insert(key, StorageValue::Ptr(value));
        self.data[i].value = StorageValue::Ptr(value);
    }

    /// Inserts `default` when absent and returns a mutable int slot. The
    /// reference is stable until the next insertion into this storage.
    pub fn get_int_mut(&mut self, key: u32, default: i32) -> &mut i32 {
        let i = self.get_or_insert(key, StorageValue::Int(default));
        self.data[i].value.as_int_mut()
    }

    /// Inserts `default` when absent and returns a mutable float slot.
    pub fn get_float_mut(&mut self, key: u32, default: f32) -> &mut f32 {
        let i = self.get_or_insert(key, StorageValue::Float(default));
        self.data[i].value.as_float_mut()
    }

    /// Toggles and returns a bool slot, inserting `default` when absent.
    pub fn toggle_bool(&mut self, key: u32, default: bool) -> bool {
        let slot = self.get_int_mut(key, default as i32);
        *slot = (*slot == 0) as i32;
        *slot != 0
    }

    /// Number of live entries.
    pub fn len(&self) -> usize { self.data.len() }

    /// Returns `true` when the storage holds no entries.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Drops every entry.
    pub fn clear(&mut self) { self.data.clear(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_stay_sorted() {
        let mut storage = Storage::new();
        for key in [42u32, 7, 99, 1, 63] {
            storage.set_int(key, key as i32);
        }
        let mut last = 0;
        for key in [1u32, 7, 42, 63, 99] {
            assert_eq!(storage.get_int(key, -1), key as i32);
            assert!(key >= last);
            last = key;
        }
        assert_eq!(storage.len(), 5);
    }

    #[test]
    fn missing_keys_return_default() {
        let storage = Storage::new();
        assert_eq!(storage.get_int(5, 123), 123);
        assert_eq!(storage.get_float(5, 2.5), 2.5);
        assert!(storage.get_bool(5, true));
        assert!(storage.get_ptr(5).is_none());
    }

    #[test]
    fn get_mut_inserts_default_once() {
        let mut storage = Storage::new();
        {
            let v = storage.get_int_mut(9, 4);
            assert_eq!(*v, 4);
            *v = 10;
        }
        assert_eq!(storage.get_int(9, 0), 10);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    #[should_panic(expected = "not a float")]
    fn kind_mismatch_panics() {
        let mut storage = Storage::new();
        storage.set_int(1, 5);
        storage.get_float(1, 0.0);
    }
}
