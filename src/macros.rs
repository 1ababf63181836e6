/// Builds a [`Value`](crate::Value) tree from a JSON-like literal.
///
/// Map keys must be string literals. Anything that is not `null`, a bracketed
/// array or a braced map goes through `Value::from`, so Rust literal types pick
/// the variant: `1` is an `Int`, `1i64` a `Long`, `1.5` a `Double`. Negative
/// numbers and other multi-token expressions need parentheses.
///
/// ```rust
/// use typed_doc::{doc, Value};
///
/// let value = doc!({ "id": 7i64, "tags": ["a", null], "ratio": (-0.5) });
/// assert_eq!(value.get("id"), Some(&Value::Long(7)));
/// assert_eq!(value.get("ratio"), Some(&Value::Double(-0.5)));
/// ```
#[macro_export]
macro_rules! doc {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(::std::vec![$($crate::doc!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::DocMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::DocMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::doc!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
