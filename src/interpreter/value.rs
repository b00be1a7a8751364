/// The `Value` enum and its conversions.
///
/// Defines every runtime value kind along with truthiness, type names,
/// string-to-number coercion and the textual rendering used by `print` and
/// `tostring`.
pub mod core;
/// Function values.
///
/// A function is either a native built-in or a closure pairing a shared
/// function body with the environment it was created in.
pub mod function;
/// Table storage.
///
/// Defines `Table`, an insertion-ordered map from hashable keys to values, and
/// `TableKey`, the hashable projection of a `Value`. Provides the border
/// computation behind `#` and the traversal order behind `next` and `pairs`.
pub mod table;
