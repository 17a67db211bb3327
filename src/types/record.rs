use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use super::value::{ToValue, Value};

/// A structured input that rules are evaluated against.
///
/// Fields are addressed by a public alias, never by the Rust field name. The
/// usual way to implement this trait is [`impl_record!`](crate::impl_record),
/// which declares the alias of each addressable field.
///
/// References and smart pointers to records are records themselves, so a rule
/// can be evaluated against `&T`, `Box<T>`, `Rc<T>` or `Arc<T>` directly.
pub trait Record {
    /// Look up the field declared under `alias`.
    /// Returns `None` if no field carries that alias.
    fn field(&self, alias: &str) -> Option<Value<'_>>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        (**self).field(alias)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        (**self).field(alias)
    }
}

impl<T: Record + ?Sized> Record for Rc<T> {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        (**self).field(alias)
    }
}

impl<T: Record + ?Sized> Record for Arc<T> {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        (**self).field(alias)
    }
}

impl<V: ToValue> Record for HashMap<String, V> {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        self.get(alias).map(ToValue::to_value)
    }
}

impl<V: ToValue> Record for BTreeMap<String, V> {
    fn field(&self, alias: &str) -> Option<Value<'_>> {
        self.get(alias).map(ToValue::to_value)
    }
}

impl<V: ToValue> ToValue for HashMap<String, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Record(self)
    }
}

impl<V: ToValue> ToValue for BTreeMap<String, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Record(self)
    }
}

/// Declare the aliases under which a struct's fields are visible to rules.
///
/// Generates [`Record`] (alias lookup) and [`ToValue`] (so the struct can be
/// nested inside other records or sequences). Every listed field type must
/// implement [`ToValue`].
///
/// ```
/// use ruleval::{impl_record, Rule};
///
/// struct Order {
///     total_cents: i64,
///     region_code: String,
/// }
///
/// impl_record!(Order {
///     "total" => total_cents,
///     "region" => region_code,
/// });
///
/// let rule = Rule::compile(r#"total > 1000 && region == "eu""#).unwrap();
/// let order = Order { total_cents: 2500, region_code: "eu".to_owned() };
/// assert!(rule.as_bool(&order).unwrap());
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($alias:literal => $field:ident),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn field(&self, alias: &str) -> ::core::option::Option<$crate::Value<'_>> {
                match alias {
                    $($alias => ::core::option::Option::Some($crate::ToValue::to_value(&self.$field)),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl $crate::ToValue for $ty {
            fn to_value(&self) -> $crate::Value<'_> {
                $crate::Value::Record(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        amount: i64,
    }

    crate::impl_record!(Inner { "amt" => amount });

    struct Outer {
        inner: Inner,
        tags: Vec<String>,
    }

    crate::impl_record!(Outer {
        "sub" => inner,
        "tags" => tags,
    });

    fn sample() -> Outer {
        Outer {
            inner: Inner { amount: 5 },
            tags: vec!["a".to_owned(), "b".to_owned()],
        }
    }

    #[test]
    fn alias_lookup() {
        let outer = sample();
        assert_eq!(outer.inner.field("amt"), Some(Value::Int(5)));
        assert_eq!(
            outer.field("tags"),
            Some(Value::Sequence(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn rust_field_name_is_not_an_alias() {
        let outer = sample();
        assert_eq!(outer.field("inner"), None);
        assert_eq!(outer.inner.field("amount"), None);
    }

    #[test]
    fn aliases_are_case_sensitive() {
        let outer = sample();
        assert_eq!(outer.field("TAGS"), None);
    }

    #[test]
    fn nested_record_value() {
        let outer = sample();
        match outer.field("sub") {
            Some(Value::Record(inner)) => assert_eq!(inner.field("amt"), Some(Value::Int(5))),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn pointers_dereference() {
        let boxed: Box<Inner> = Box::new(Inner { amount: 9 });
        assert_eq!(boxed.field("amt"), Some(Value::Int(9)));
        let shared = Arc::new(Inner { amount: 3 });
        assert_eq!((&shared).field("amt"), Some(Value::Int(3)));
        let rc = Rc::new(Inner { amount: 4 });
        assert_eq!(rc.field("amt"), Some(Value::Int(4)));
    }

    #[test]
    fn map_records() {
        let mut map = HashMap::new();
        map.insert("x".to_owned(), 1.5_f64);
        assert_eq!(map.field("x"), Some(Value::Float(1.5)));
        assert_eq!(map.field("y"), None);

        let mut tree = BTreeMap::new();
        tree.insert("name".to_owned(), "bob".to_owned());
        assert_eq!(tree.field("name"), Some(Value::from("bob")));
    }
}
