pub mod logging;
pub mod progress_utils;
pub mod test_utils;
