pub mod games;
pub mod prelude;
pub mod users;
