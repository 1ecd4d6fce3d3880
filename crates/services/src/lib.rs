#![forbid(unsafe_code)]

pub mod deck_service;
pub mod error;
pub mod session_driver;
pub mod session_loop;
pub mod ticker;

pub use deck_service::DeckService;
pub use error::ServiceError;
pub use session_driver::{SessionDriver, SessionEpoch, SessionSnapshot, TickToken};
pub use session_loop::{SessionEvent, SessionHandle, SessionLoop};
pub use ticker::Ticker;
