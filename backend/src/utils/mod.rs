pub mod cookies;
pub mod hashing;
pub mod jwt;
pub mod keygen;

pub use cookies::*;
pub use hashing::*;
pub use jwt::*;
pub use keygen::*;
