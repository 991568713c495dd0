//!  Storage is organized through [key_value::KeyValueStore].
//!  The basic idea is:
//!   - A store maps string keys to string values, the way a browser's local storage does.
//!   - [key_value::FileStore] keeps every key in its own JSON file inside the application
//!     directory.
//!   - [state::load_state] and [state::persist_state] never fail. Durability is best effort and
//!     the in-memory record stays correct either way.

pub mod key_value;
pub mod state;
