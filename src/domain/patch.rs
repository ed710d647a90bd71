use serde::{Deserialize, Deserializer};

/// A field that is either explicitly supplied or left untouched.
///
/// Unlike `Option<T>`, `Patch<Option<T>>` can tell "not mentioned" apart
/// from "set to nothing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Present(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self { Patch::Absent }
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool { matches!(self, Patch::Present(_)) }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Patch::Absent => Ok(Patch::Absent),
            Patch::Present(v) => f(v).map(Patch::Present),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Present(v) => Some(v),
        }
    }
}

// Only called when the key is present; missing keys fall back to `Default`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Present)
    }
}
