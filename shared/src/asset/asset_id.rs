use std::hash::{Hash, Hasher};

use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};
use uuid::Uuid;

/// Categories of engine asset a scene references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Mesh,
    Material,
    Texture,
    AudioClip,
    AudioMixerGroup,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Mesh,
        AssetKind::Material,
        AssetKind::Texture,
        AssetKind::AudioClip,
        AssetKind::AudioMixerGroup,
    ];
}

/// Opaque in-process reference to a loaded asset. Only meaningful to the
/// [`AssetProvider`](super::AssetProvider) that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(pub u64);

/// Secondary key that tells apart assets sharing a name: the content GUID of the
/// asset's source file plus the object's identifier inside that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey {
    pub guid: Uuid,
    pub file_identifier: i64,
}

impl AssetKey {
    pub fn new(guid: Uuid, file_identifier: i64) -> Self {
        Self {
            guid,
            file_identifier,
        }
    }
}

/// Stable cross-process identity of an asset.
///
/// The `uid` is a name-based UUID over the asset name and its key, so every
/// process that sees the same asset derives the same id. Equality and hashing
/// go through `uid` alone.
#[derive(Debug, Clone, Eq)]
pub struct AssetId {
    name: String,
    key: AssetKey,
    uid: Uuid,
}

impl AssetId {
    pub fn new(name: &str, key: AssetKey) -> Self {
        Self {
            name: name.to_string(),
            uid: Self::derive_uid(name, &key),
            key,
        }
    }

    fn derive_uid(name: &str, key: &AssetKey) -> Uuid {
        let mut seed = Vec::with_capacity(name.len() + 1 + 16 + 8);
        seed.extend_from_slice(name.as_bytes());
        // keeps "ab" + key distinct from "a" + key starting with 'b'
        seed.push(0);
        seed.extend_from_slice(key.guid.as_bytes());
        seed.extend_from_slice(&key.file_identifier.to_le_bytes());
        Uuid::new_v5(&Uuid::NAMESPACE_OID, &seed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn uid(&self) -> &Uuid {
        &self.uid
    }
}

impl PartialEq for AssetId {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Hash for AssetId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.uid)
    }
}

impl Serde for AssetId {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.name.ser(writer);
        writer.write_bytes(self.key.guid.as_bytes());
        self.key.file_identifier.ser(writer);
    }

    fn de(reader: &mut StreamReader) -> Result<Self, SerdeErr> {
        let name = String::de(reader)?;
        let guid = Uuid::from_bytes(reader.read_array::<16>()?);
        let file_identifier = i64::de(reader)?;
        Ok(AssetId::new(&name, AssetKey::new(guid, file_identifier)))
    }
}
