pub mod gate;
pub mod password;
pub mod token;
pub mod user_lookup;

pub use gate::AuthGate;
pub use token::TokenCodec;
pub use user_lookup::UserLookup;
