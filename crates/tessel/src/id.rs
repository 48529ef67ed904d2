use std::marker::PhantomData;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a widget stored in the Core arena.
    pub struct WidgetId;
}

/// Type-safe wrapper around a widget identifier tied to a widget type.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypedId<T> {
    /// Untyped widget identifier.
    id: WidgetId,
    /// Marker for the widget type.
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedId<T> {
    /// Wrap an untyped widget identifier.
    pub fn new(id: WidgetId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Return the untyped identifier.
    pub fn id(&self) -> WidgetId {
        self.id
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> From<TypedId<T>> for WidgetId {
    fn from(value: TypedId<T>) -> Self {
        value.id
    }
}
