//! Tri-state field for partial updates.
//!
//! `Option<T>` cannot tell an omitted member from an explicit `null`.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// The member was not present in the payload
    #[default]
    Absent,
    /// The member was present and `null`
    Null,
    /// The member carried a value
    Value(T),
}

impl<T> Patch<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }
}
