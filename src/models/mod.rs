pub mod boat;
pub mod customer;
pub mod expense;
pub mod farm;
pub mod product_type;
pub mod purchase;
pub mod sale;
pub mod user;
