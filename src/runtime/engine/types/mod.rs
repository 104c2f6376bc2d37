mod function;
mod object;
mod string;
mod symbol;
mod value;

pub use function::*;
pub use object::*;
pub use string::*;
pub use symbol::*;
pub use value::*;
