mod open;
pub use self::open::*;
