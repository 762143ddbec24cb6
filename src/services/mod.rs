pub mod availability;
pub mod events;
pub mod fee;
pub mod location;
pub mod lookup;
pub mod payment;
pub mod psid;
pub mod session;
pub mod submit;
pub mod wizard;
