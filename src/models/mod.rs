// Re-export all model types for ease of use

pub mod admin;
pub mod dashboard;
pub mod reservation;
pub mod responses;
pub mod student;
pub mod survey;

pub use admin::*;
pub use dashboard::*;
pub use reservation::*;
pub use responses::*;
pub use student::*;
pub use survey::*;
