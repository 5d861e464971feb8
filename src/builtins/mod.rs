//! Intrinsic methods installed on `Object.prototype` and `Function.prototype`

pub mod function;
pub mod object;

pub use function::*;
pub use object::*;
