pub mod client;
pub mod db_structs;
pub mod reference_index;
pub mod store;
