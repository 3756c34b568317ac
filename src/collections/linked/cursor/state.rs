use derive_more::IsVariant;

/// An enum to represent what a [`Cursor`](super::Cursor) is pointing at.
#[derive(Debug, PartialEq, Eq, IsVariant)]
pub enum State<'a, T> {
    /// The cursor is pointing to the sentinel before the start of the list.
    Head,
    /// The cursor is pointing to the sentinel after the end of the list.
    Tail,
    /// The cursor is pointing to an element node, containing the borrowed value.
    Node(&'a T),
}

/// An enum to represent what a [`CursorMut`](super::CursorMut) is pointing at, while allowing for
/// mutation.
#[derive(Debug, PartialEq, Eq, IsVariant)]
pub enum StateMut<'a, T> {
    /// The cursor is pointing to the sentinel before the start of the list.
    Head,
    /// The cursor is pointing to the sentinel after the end of the list.
    Tail,
    /// The cursor is pointing to an element node, containing the mutably borrowed value.
    Node(&'a mut T),
}
