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
use std::any::Any;
use std::rc::Rc;

/// Process-wide map from API names (e.g. `"EMBER_API_UI"`) to shared API
/// objects. Consumers fetch on module load and cache the handle.
#[derive(Default)]
pub struct ApiRegistry {
    entries: Vec<(String, Rc<dyn Any>)>,
}

impl ApiRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Publishes an API object under `name`. Multiple versions may coexist;
    /// [`ApiRegistry::first`] returns the oldest still registered.
    pub fn add(&mut self, name: &str, api: Rc<dyn Any>) { self.entries.push((name.to_string(), api)); }

    /// Returns the first API registered under `name`.
    pub fn first(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, api)| api.clone())
    }

    /// Returns the first API registered under `name`, downcast to `T`.
    pub fn first_as<T: 'static>(&self, name: &str) -> Option<Rc<T>> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .find_map(|(_, api)| api.clone().downcast::<T>().ok())
    }

    /// Swaps an API object for a newer one, keeping its registration slot so
    /// cached lookups by name observe the replacement.
    pub fn replace(&mut self, old: &Rc<dyn Any>, new: Rc<dyn Any>) {
        for (_, api) in self.entries.iter_mut() {
            if Rc::ptr_eq(api, old) {
                *api = new;
                return;
            }
        }
    }

    /// Removes an API object.
    pub fn remove(&mut self, api: &Rc<dyn Any>) { self.entries.retain(|(_, a)| !Rc::ptr_eq(a, api)); }

    /// Number of registered entries.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

const DATA_INLINE_CAPACITY: usize = 64;

struct DataEntry {
    name: String,
    data: Rc<dyn Any>,
}

/// String-keyed blackboard shared between modules. The first 64 entries live
/// in an inline table; later registrations overflow into a heap vector.
pub struct DataRegistry {
    inline: [Option<DataEntry>; DATA_INLINE_CAPACITY],
    inline_len: usize,
    overflow: Vec<DataEntry>,
}

impl Default for DataRegistry {
    fn default() -> Self { Self::new() }
}

impl DataRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inline: std::array::from_fn(|_| None),
            inline_len: 0,
            overflow: Vec::new(),
        }
    }

    /// Publishes a value under `name`, replacing any previous registration.
    pub fn set(&mut self, name: &str, data: Rc<dyn Any>) {
        for slot in self.inline.iter_mut().take(self.inline_len) {
            if let Some(entry) = slot {
                if entry.name == name {
                    entry.data = data;
                    return;
                }
            }
        }
        for entry in self.overflow.iter_mut() {
            if entry.name == name {
                entry.data = data;
                return;
            }
        }

        let entry = DataEntry { name: name.to_string(), data };
        if self.inline_len < DATA_INLINE_CAPACITY {
            self.inline[self.inline_len] = Some(entry);
            self.inline_len += 1;
        } else {
            self.overflow.push(entry);
        }
    }

    /// Fetches the value registered under `name`.
    pub fn get(&self, name: &str) -> Option<Rc<dyn Any>> {
        for slot in self.inline.iter().take(self.inline_len) {
            if let Some(entry) = slot {
                if entry.name == name {
                    return Some(entry.data.clone());
                }
            }
        }
        self.overflow.iter().find(|entry| entry.name == name).map(|entry| entry.data.clone())
    }

    /// Fetches the value registered under `name`, downcast to `T`.
    pub fn get_as<T: 'static>(&self, name: &str) -> Option<Rc<T>> {
        self.get(name).and_then(|data| data.downcast::<T>().ok())
    }

    /// Removes the value registered under `name`.
    pub fn remove(&mut self, name: &str) {
        for slot in self.inline.iter_mut().take(self.inline_len) {
            if slot.as_ref().is_some_and(|entry| entry.name == name) {
                *slot = None;
                return;
            }
        }
        self.overflow.retain(|entry| entry.name != name);
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inline.iter().take(self.inline_len).filter(|slot| slot.is_some()).count() + self.overflow.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_add_first_replace_remove() {
        let mut registry = ApiRegistry::new();
        let v1: Rc<dyn Any> = Rc::new(1u32);
        let v2: Rc<dyn Any> = Rc::new(2u32);
        registry.add("EMBER_API_UI", v1.clone());
        assert_eq!(*registry.first_as::<u32>("EMBER_API_UI").unwrap(), 1);

        registry.replace(&v1, v2.clone());
        assert_eq!(*registry.first_as::<u32>("EMBER_API_UI").unwrap(), 2);

        registry.remove(&v2);
        assert!(registry.first("EMBER_API_UI").is_none());
    }

    #[test]
    fn first_returns_oldest_registration() {
        let mut registry = ApiRegistry::new();
        registry.add("api", Rc::new("old"));
        registry.add("api", Rc::new("new"));
        assert_eq!(*registry.first_as::<&str>("api").unwrap(), "old");
    }

    #[test]
    fn data_registry_overflows_past_inline_capacity() {
        let mut registry = DataRegistry::new();
        for i in 0..100usize {
            registry.set(&format!("entry-{}", i), Rc::new(i));
        }
        assert_eq!(registry.len(), 100);
        assert_eq!(*registry.get_as::<usize>("entry-0").unwrap(), 0);
        assert_eq!(*registry.get_as::<usize>("entry-99").unwrap(), 99);

        registry.set("entry-99", Rc::new(1234usize));
        assert_eq!(registry.len(), 100);
        assert_eq!(*registry.get_as::<usize>("entry-99").unwrap(), 1234);

        registry.remove("entry-50");
        assert!(registry.get("entry-50").is_none());
        assert_eq!(registry.len(), 99);
    }
}
