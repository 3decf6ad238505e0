pub mod diagnostics;
pub mod guard;
pub mod mutation;
pub mod notification;
pub mod permissions;
pub mod row_actions;
