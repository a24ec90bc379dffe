//! Default filter library
//!
//! Every filter has the signature `(input, source, args) -> FilterResult`.
//! Array filters treat strings as arrays of characters and most other
//! non-array inputs as empty, the way lodash collection helpers do.

pub mod array;
pub mod convert;
pub mod value;

use crate::registry::{Arity, Filter};

/// Filters available to every mapping unless overridden by name
#[must_use]
pub fn default_filters() -> Vec<Filter> {
    let child = Filter::new("child", Arity::between(0, 1), array::child);
    let nth = child.alias("nth");

    vec![
        Filter::new("identity", Arity::none(), value::identity),
        Filter::new("flatten", Arity::between(0, 1), array::flatten),
        Filter::new("unique", Arity::none(), array::unique),
        Filter::new("sum", Arity::none(), array::sum),
        child,
        nth,
        Filter::new("compact", Arity::none(), array::compact),
        Filter::new("concat", Arity::between(0, 1), array::concat),
        Filter::new("join", Arity::between(0, 1), array::join),
        Filter::new("reverse", Arity::none(), array::reverse),
        Filter::new("slice", Arity::between(0, 2), array::slice),
        Filter::new("length", Arity::none(), array::length),
        Filter::new("find", Arity::exactly(1), array::find),
        Filter::new("findWhere", Arity::exactly(1), array::find_where),
        Filter::new("map", Arity::exactly(1), array::map),
        Filter::new("filter", Arity::exactly(1), array::filter),
        Filter::new("reduce", Arity::between(1, 2), array::reduce),
        Filter::new("sort", Arity::between(0, 1), array::sort),
        Filter::new("toStr", Arity::none(), convert::to_str),
        Filter::new("toInt", Arity::between(0, 1), convert::to_int),
        Filter::new("toFloat", Arity::none(), convert::to_float),
        Filter::new("toBool", Arity::none(), convert::to_bool),
        Filter::new("toArray", Arity::none(), convert::to_array),
        Filter::new("toObject", Arity::none(), convert::to_object),
        Filter::new("stringify", Arity::none(), convert::stringify),
        Filter::path("get", Arity::between(1, 2), value::get),
        Filter::new("set", Arity::between(0, 1), value::set),
        Filter::path("put", Arity::exactly(2), value::put),
        Filter::path("has", Arity::exactly(1), value::has),
    ]
}
