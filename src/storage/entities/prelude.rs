pub use super::characters::Entity as Characters;
pub use super::settings::Entity as Settings;
pub use super::users::Entity as Users;
