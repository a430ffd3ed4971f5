pub mod envy;
pub mod errors;
pub mod util;
