pub mod coupons;
pub mod orders;
pub mod report;
pub mod seed;
pub mod session;
