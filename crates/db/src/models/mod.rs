pub mod good;
pub mod type_doc;
pub mod user;
