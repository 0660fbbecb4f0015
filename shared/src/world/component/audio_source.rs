use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use super::{
    change_flags::{define_change_flags, float_changed, ChangeFlags},
    component_kind::ComponentKind,
    replicated_component::ReplicatedComponent,
};
use crate::asset::{AssetId, AssetKind};

define_change_flags! {
    AudioSourceChangeFlags {
        CLIP = 0x01;
        MIXER_GROUP = 0x02;
        VOLUME = 0x04;
        PITCH = 0x08;
        LOOPING = 0x10;
        PLAYING = 0x20;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSourceData<A> {
    pub clip: Option<A>,
    pub mixer_group: Option<A>,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
    pub playing: bool,
}

impl<A> Default for AudioSourceData<A> {
    fn default() -> Self {
        Self {
            clip: None,
            mixer_group: None,
            volume: 1.0,
            pitch: 1.0,
            looping: false,
            playing: false,
        }
    }
}

impl<A> AudioSourceData<A> {
    pub fn map_assets<B>(
        &self,
        mut resolve: impl FnMut(AssetKind, &A) -> Option<B>,
    ) -> AudioSourceData<B> {
        AudioSourceData {
            clip: self
                .clip
                .as_ref()
                .and_then(|clip| resolve(AssetKind::AudioClip, clip)),
            mixer_group: self
                .mixer_group
                .as_ref()
                .and_then(|group| resolve(AssetKind::AudioMixerGroup, group)),
            volume: self.volume,
            pitch: self.pitch,
            looping: self.looping,
            playing: self.playing,
        }
    }
}

impl ReplicatedComponent for AudioSourceData<AssetId> {
    type Flags = AudioSourceChangeFlags;

    const KIND: ComponentKind = ComponentKind::AudioSource;

    const UPDATES_WHILE_DISABLED: bool = false;

    fn diff(&self, previous: &Self, epsilon: f32) -> AudioSourceChangeFlags {
        let mut flags = AudioSourceChangeFlags::default();
        if self.clip != previous.clip {
            flags |= AudioSourceChangeFlags::CLIP;
        }
        if self.mixer_group != previous.mixer_group {
            flags |= AudioSourceChangeFlags::MIXER_GROUP;
        }
        if float_changed(self.volume, previous.volume, epsilon) {
            flags |= AudioSourceChangeFlags::VOLUME;
        }
        if float_changed(self.pitch, previous.pitch, epsilon) {
            flags |= AudioSourceChangeFlags::PITCH;
        }
        if self.looping != previous.looping {
            flags |= AudioSourceChangeFlags::LOOPING;
        }
        if self.playing != previous.playing {
            flags |= AudioSourceChangeFlags::PLAYING;
        }
        flags
    }

    fn assign(&mut self, source: &Self, flags: AudioSourceChangeFlags) {
        if flags.contains(AudioSourceChangeFlags::CLIP) {
            self.clip.clone_from(&source.clip);
        }
        if flags.contains(AudioSourceChangeFlags::MIXER_GROUP) {
            self.mixer_group.clone_from(&source.mixer_group);
        }
        if flags.contains(AudioSourceChangeFlags::VOLUME) {
            self.volume = source.volume;
        }
        if flags.contains(AudioSourceChangeFlags::PITCH) {
            self.pitch = source.pitch;
        }
        if flags.contains(AudioSourceChangeFlags::LOOPING) {
            self.looping = source.looping;
        }
        if flags.contains(AudioSourceChangeFlags::PLAYING) {
            self.playing = source.playing;
        }
    }

    fn write_fields(&self, flags: AudioSourceChangeFlags, writer: &mut dyn ByteWrite) {
        if flags.contains(AudioSourceChangeFlags::CLIP) {
            self.clip.ser(writer);
        }
        if flags.contains(AudioSourceChangeFlags::MIXER_GROUP) {
            self.mixer_group.ser(writer);
        }
        if flags.contains(AudioSourceChangeFlags::VOLUME) {
            self.volume.ser(writer);
        }
        if flags.contains(AudioSourceChangeFlags::PITCH) {
            self.pitch.ser(writer);
        }
        if flags.contains(AudioSourceChangeFlags::LOOPING) {
            self.looping.ser(writer);
        }
        if flags.contains(AudioSourceChangeFlags::PLAYING) {
            self.playing.ser(writer);
        }
    }

    fn read_fields(
        &mut self,
        flags: AudioSourceChangeFlags,
        reader: &mut StreamReader,
    ) -> Result<(), SerdeErr> {
        if flags.contains(AudioSourceChangeFlags::CLIP) {
            self.clip = Option::<AssetId>::de(reader)?;
        }
        if flags.contains(AudioSourceChangeFlags::MIXER_GROUP) {
            self.mixer_group = Option::<AssetId>::de(reader)?;
        }
        if flags.contains(AudioSourceChangeFlags::VOLUME) {
            self.volume = f32::de(reader)?;
        }
        if flags.contains(AudioSourceChangeFlags::PITCH) {
            self.pitch = f32::de(reader)?;
        }
        if flags.contains(AudioSourceChangeFlags::LOOPING) {
            self.looping = bool::de(reader)?;
        }
        if flags.contains(AudioSourceChangeFlags::PLAYING) {
            self.playing = bool::de(reader)?;
        }
        Ok(())
    }
}
