//! # specwire_dispatch - getting a finished document to Telegram
//!
//! - Header composition and department routing
//! - Paragraph/line chunking under the Telegram message limit
//! - The [`MessageSender`] seam with a Bot API implementation and a mock
//! - Sequential delivery that stops at the first failed chunk

pub mod chunk;
pub mod delivery;
pub mod error;
pub mod mock;
pub mod route;
pub mod telegram;

pub use chunk::{chunk_message, DEFAULT_CHUNK_LIMIT, TELEGRAM_MESSAGE_LIMIT};
pub use delivery::{deliver, DeliveryReport};
pub use error::{DispatchError, DispatchResult};
pub use mock::MockSender;
pub use route::{compose_message, header, resolve_destination, HEADER_TITLE};
pub use telegram::{MessageSender, SendStatus, TelegramSender, TELEGRAM_API_BASE};
