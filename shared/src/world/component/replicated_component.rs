use std::fmt::Debug;

use mirror_serde::{ByteWrite, Serde, SerdeErr, StreamReader};

use super::{change_flags::ChangeFlags, component_kind::ComponentKind};

/// Wire-level state of one component kind.
///
/// A single implementation of the broadcast framework drives every kind through
/// this trait: the kind supplies its change-flag type, how to diff two states,
/// and how to write and read the flagged fields.
pub trait ReplicatedComponent: Clone + PartialEq + Default + Debug {
    type Flags: ChangeFlags;

    const KIND: ComponentKind;

    /// Whether observers learn about the component through an explicit
    /// `Created` message before its first snapshot
    const EXPLICIT_CREATION: bool = true;

    /// Whether changes keep flowing while the component is disabled
    const UPDATES_WHILE_DISABLED: bool = true;

    /// Flags for every field of `self` that differs from `previous`. Float fields
    /// within `epsilon` of each other count as equal.
    fn diff(&self, previous: &Self, epsilon: f32) -> Self::Flags;

    /// Flags describing a full snapshot of this state
    fn full_flags(&self) -> Self::Flags {
        Self::Flags::ALL
    }

    /// Copies the flagged fields of `source` into `self`
    fn assign(&mut self, source: &Self, flags: Self::Flags);

    /// State to write for a delta carrying `flags`, when it differs from `self`.
    /// Kinds with keyed collections return a copy holding only the entries that
    /// changed since `previous`; `assign` merges them back in on the other end.
    fn delta_state(&self, _previous: &Self, _flags: Self::Flags) -> Option<Self> {
        None
    }

    /// Writes the flagged fields, in flag order
    fn write_fields(&self, flags: Self::Flags, writer: &mut dyn ByteWrite);

    /// Reads the flagged fields into `self`, leaving the others untouched
    fn read_fields(&mut self, flags: Self::Flags, reader: &mut StreamReader)
        -> Result<(), SerdeErr>;

    fn write_update(&self, flags: Self::Flags, writer: &mut dyn ByteWrite) {
        flags.ser(writer);
        self.write_fields(flags, writer);
    }

    /// Reads a flag byte and the fields it names into a default state
    fn read_update(reader: &mut StreamReader) -> Result<(Self::Flags, Self), SerdeErr> {
        let flags = Self::Flags::de(reader)?;
        let mut state = Self::default();
        state.read_fields(flags, reader)?;
        Ok((flags, state))
    }
}
