pub use kernel::id::{SessionId, UserId};
