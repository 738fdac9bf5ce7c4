pub mod blogs;
pub mod sessions;
pub mod users;

pub mod prelude {
    pub use super::blogs::Entity as Blogs;
    pub use super::sessions::Entity as Sessions;
    pub use super::users::Entity as Users;
}
