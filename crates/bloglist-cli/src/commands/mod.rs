pub mod create_user;
pub mod serve;

pub use create_user::CreateUserCommand;
pub use serve::ServeCommand;
