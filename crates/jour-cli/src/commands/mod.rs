pub mod add;
pub mod day;
pub mod delete;
pub mod done;
pub mod list;
pub mod postpone;
pub mod today;
pub mod week;
