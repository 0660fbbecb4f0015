use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};

use super::{AssetHandle, AssetId, AssetKind, AssetProvider};

/// Two-way map between the handles of one asset kind and their [`AssetId`]s.
/// Name groups are pulled from the provider the first time they are needed.
pub struct AssetCache {
    kind: AssetKind,
    loaded_groups: BTreeSet<String>,
    all_loaded: bool,
    by_handle: HashMap<AssetHandle, AssetId>,
    by_id: HashMap<AssetId, AssetHandle>,
}

impl AssetCache {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            loaded_groups: BTreeSet::new(),
            all_loaded: false,
            by_handle: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn get_asset_id(
        &mut self,
        provider: &dyn AssetProvider,
        handle: AssetHandle,
    ) -> Option<AssetId> {
        if let Some(id) = self.by_handle.get(&handle) {
            return Some(id.clone());
        }
        let Some(name) = provider.asset_name(self.kind, handle) else {
            warn!("No {:?} asset is known for handle {:?}", self.kind, handle);
            return None;
        };
        self.load_group(provider, &name);
        let id = self.by_handle.get(&handle).cloned();
        if id.is_none() {
            warn!(
                "{:?} asset \"{}\" ({:?}) is missing from its name group",
                self.kind, name, handle
            );
        }
        id
    }

    pub fn get_asset(&mut self, provider: &dyn AssetProvider, id: &AssetId) -> Option<AssetHandle> {
        if let Some(handle) = self.by_id.get(id) {
            return Some(*handle);
        }
        self.load_group(provider, id.name());
        let handle = self.by_id.get(id).copied();
        if handle.is_none() {
            warn!("Could not find {:?} asset {}", self.kind, id);
        }
        handle
    }

    /// Loads every asset of this kind up front
    pub fn load_all(&mut self, provider: &dyn AssetProvider) {
        if self.all_loaded {
            return;
        }
        for descriptor in provider.enumerate(self.kind) {
            self.loaded_groups.insert(descriptor.name.clone());
            self.insert(descriptor.handle, AssetId::new(&descriptor.name, descriptor.key));
        }
        self.all_loaded = true;
        debug!("Preloaded {} {:?} assets", self.len(), self.kind);
    }

    pub fn invalidate(&mut self) {
        self.loaded_groups.clear();
        self.all_loaded = false;
        self.by_handle.clear();
        self.by_id.clear();
    }

    fn load_group(&mut self, provider: &dyn AssetProvider, name: &str) {
        if self.all_loaded || self.loaded_groups.contains(name) {
            return;
        }
        self.loaded_groups.insert(name.to_string());
        for descriptor in provider.load_group(self.kind, name) {
            self.insert(descriptor.handle, AssetId::new(&descriptor.name, descriptor.key));
        }
    }

    fn insert(&mut self, handle: AssetHandle, id: AssetId) {
        self.by_id.insert(id.clone(), handle);
        self.by_handle.insert(handle, id);
    }
}

/// One [`AssetCache`] per [`AssetKind`], invalidated together whenever the
/// provider reports a new revision.
pub struct AssetCaches {
    caches: BTreeMap<AssetKind, AssetCache>,
    revision: Option<u64>,
    force_load_all: bool,
}

impl AssetCaches {
    pub fn new(force_load_all: bool) -> Self {
        let caches = AssetKind::ALL
            .iter()
            .map(|kind| (*kind, AssetCache::new(*kind)))
            .collect();
        Self {
            caches,
            revision: None,
            force_load_all,
        }
    }

    /// Drops stale entries if the provider's asset set changed since the last call,
    /// and preloads everything when forced to
    pub fn refresh(&mut self, provider: &dyn AssetProvider) {
        let revision = provider.revision();
        if self.revision != Some(revision) {
            if self.revision.is_some() {
                debug!("Asset revision changed to {}, invalidating caches", revision);
            }
            self.reset();
            self.revision = Some(revision);
        }
        if self.force_load_all {
            for cache in self.caches.values_mut() {
                cache.load_all(provider);
            }
        }
    }

    pub fn reset(&mut self) {
        for cache in self.caches.values_mut() {
            cache.invalidate();
        }
        self.revision = None;
    }

    pub fn cache_mut(&mut self, kind: AssetKind) -> Option<&mut AssetCache> {
        self.caches.get_mut(&kind)
    }

    pub fn get_asset_id(
        &mut self,
        provider: &dyn AssetProvider,
        kind: AssetKind,
        handle: AssetHandle,
    ) -> Option<AssetId> {
        self.cache_mut(kind)?.get_asset_id(provider, handle)
    }

    pub fn get_asset(
        &mut self,
        provider: &dyn AssetProvider,
        kind: AssetKind,
        id: &AssetId,
    ) -> Option<AssetHandle> {
        self.cache_mut(kind)?.get_asset(provider, id)
    }
}
