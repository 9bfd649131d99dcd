use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// Error Handling
use vsclone_error::{LibError, VscloneError};

/// The literal a planner writes in place of a value it can't know yet.
pub const UNKNOWN: &str = "(known after apply)";

/*
* A declared value as seen during planning.
*
* - Known: the value is set and final.
* - Unknown: the value is set but will only be known on apply.
* - Absent: the value is not set at all.
*/
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Known<T> {
    Known(T),
    Unknown,
    Absent,
}

impl<T> Default for Known<T> {
    fn default() -> Self {
        Known::Absent
    }
}

impl<T> Known<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Known::Absent)
    }
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Known::Known(v) => Some(v),
            _ => None,
        }
    }
    /// Get the value or fail naming the configuration key.
    pub fn require(&self, key: &str) -> Result<&T, VscloneError> {
        match self {
            Known::Known(v) => Ok(v),
            Known::Unknown => {
                let message = format!("{key} is not known yet");
                let help = "The value must be known before the clone spec can be built.";
                Err(LibError::builder().msg(&message).help(help).build().into())
            }
            Known::Absent => {
                let message = format!("{key} is required");
                Err(LibError::builder().msg(&message).help("").build().into())
            }
        }
    }
}

impl<T: Serialize> Serialize for Known<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Known::Known(v) => v.serialize(serializer),
            Known::Unknown => serializer.serialize_str(UNKNOWN),
            Known::Absent => serializer.serialize_none(),
        }
    }
}

/// Only matches the empty string, which reads as an unset value.
struct EmptyMarker;

impl<'de> Deserialize<'de> for EmptyMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        if string.is_empty() {
            Ok(EmptyMarker)
        } else {
            Err(de::Error::custom("not an empty value"))
        }
    }
}

/// Only matches the UNKNOWN literal.
struct UnknownMarker;

impl<'de> Deserialize<'de> for UnknownMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        if string == UNKNOWN {
            Ok(UnknownMarker)
        } else {
            Err(de::Error::custom("not an unknown value marker"))
        }
    }
}

impl<'de, T> Deserialize<'de> for Known<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Empty(EmptyMarker),
            Unknown(UnknownMarker),
            Value(T),
        }
        match Repr::<T>::deserialize(deserializer)? {
            Repr::Empty(_) => Ok(Known::Absent),
            Repr::Unknown(_) => Ok(Known::Unknown),
            Repr::Value(v) => Ok(Known::Known(v)),
        }
    }
}
