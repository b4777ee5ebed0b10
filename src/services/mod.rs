pub mod accounts;
pub mod csv_import;
pub mod events;
pub mod reservations;
pub mod surveys;
