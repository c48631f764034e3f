// Account snapshots
pub mod state;
pub mod tracked;

pub use state::AccountState;
pub use tracked::TrackedAccount;
