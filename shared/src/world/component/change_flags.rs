use std::{cmp::Ordering, fmt::Debug};

use glam::{Quat, Vec2, Vec3};
use mirror_serde::Serde;

/// Bitmask naming which fields of a component changed since the last send.
pub trait ChangeFlags: Copy + Eq + Default + Debug + Serde {
    /// Every field of the component
    const ALL: Self;

    fn bits(&self) -> u8;

    fn is_empty(&self) -> bool {
        self.bits() == 0
    }

    fn contains(&self, other: Self) -> bool;

    fn insert(&mut self, other: Self);

    fn intersection(&self, other: Self) -> Self;
}

/// Declares a change-flag byte with one named constant per field.
macro_rules! define_change_flags {
    (
        $(#[$outer:meta])*
        $name:ident {
            $(
                $(#[$inner:meta])*
                $flag:ident = $bit:expr;
            )+
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u8);

        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: $name = $name($bit);
            )+

            /// Returns None if `bits` names a field this component does not have
            pub fn from_bits(bits: u8) -> Option<Self> {
                let all = <Self as $crate::world::component::change_flags::ChangeFlags>::ALL;
                if bits & !all.0 != 0 {
                    None
                } else {
                    Some(Self(bits))
                }
            }
        }

        impl $crate::world::component::change_flags::ChangeFlags for $name {
            const ALL: Self = $name(0 $(| $bit)+);

            fn bits(&self) -> u8 {
                self.0
            }

            fn contains(&self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            fn intersection(&self, other: Self) -> Self {
                Self(self.0 & other.0)
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl mirror_serde::Serde for $name {
            fn ser(&self, writer: &mut dyn mirror_serde::ByteWrite) {
                writer.write_byte(self.0);
            }

            fn de(
                reader: &mut mirror_serde::StreamReader,
            ) -> Result<Self, mirror_serde::SerdeErr> {
                let bits = reader.read_byte()?;
                Self::from_bits(bits).ok_or(mirror_serde::SerdeErr::InvalidValue {
                    type_name: stringify!($name),
                    value: u64::from(bits),
                })
            }
        }
    };
}

pub(crate) use define_change_flags;

// Float comparison

/// Whether `current` should count as changed from `previous`. With an epsilon of
/// zero this is exact comparison. NaN always counts as changed.
pub fn float_changed(current: f32, previous: f32, epsilon: f32) -> bool {
    if current == previous {
        return false;
    }
    !matches!(
        (current - previous).abs().partial_cmp(&epsilon),
        Some(Ordering::Less) | Some(Ordering::Equal)
    )
}

pub fn vec2_changed(current: Vec2, previous: Vec2, epsilon: f32) -> bool {
    float_changed(current.x, previous.x, epsilon) || float_changed(current.y, previous.y, epsilon)
}

pub fn vec3_changed(current: Vec3, previous: Vec3, epsilon: f32) -> bool {
    float_changed(current.x, previous.x, epsilon)
        || float_changed(current.y, previous.y, epsilon)
        || float_changed(current.z, previous.z, epsilon)
}

pub fn quat_changed(current: Quat, previous: Quat, epsilon: f32) -> bool {
    float_changed(current.x, previous.x, epsilon)
        || float_changed(current.y, previous.y, epsilon)
        || float_changed(current.z, previous.z, epsilon)
        || float_changed(current.w, previous.w, epsilon)
}
