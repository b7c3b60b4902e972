pub mod user;

pub use user::{ListParams, UserCreate, UserSchema, UserUpdate};
