mod document;
pub use document::Document;

mod stream;
pub use stream::DocumentStream;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
