pub mod contributions;
pub mod user;
pub mod personality;
pub mod wrapped;

pub use contributions::*;
pub use user::*;
pub use personality::*;
pub use wrapped::*;
