pub mod academics;
pub mod auth;
pub mod children;
pub mod classes;
pub mod hostel;
pub mod leaves;
pub mod library;
pub mod schools;
pub mod students;
pub mod users;
