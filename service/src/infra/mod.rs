//! Infrastructure layer.

pub mod database;
pub mod notification;

#[cfg(any(test, feature = "memory"))]
pub use self::database::{memory, Memory};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
pub use self::{database::Database, notification::Notifier};
