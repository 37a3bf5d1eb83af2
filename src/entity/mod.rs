pub mod foods;
pub mod orders;
pub mod users;

pub use foods::Entity as Foods;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
