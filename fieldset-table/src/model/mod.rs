//! Record and field set models

mod field;
mod record;
mod record_serde;
mod value;

pub use field::*;
pub use record::*;
pub use value::*;
