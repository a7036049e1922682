//! SeaORM entities for the employees service.

pub mod employees;
