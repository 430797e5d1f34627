//! # specwire_core
//!
//! Session state and the stage controller for specwire.
//!
//! A [`Session`] moves through three stages:
//!
//! ```text
//! input ──generate_questions──▶ questions ──build_document──▶ draft
//!   ▲                              │   ▲                         │
//!   └────────────back──────────────┘   └──────────back───────────┤
//!   └──────────────────────────── send (success) ◀───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use specwire_core::{Session, Wizard};
//!
//! let wizard = Wizard::new(Arc::new(llm), settings.messaging.clone());
//! let mut session = Session::new();
//! session.set_input("Build a chatbot for refunds")?;
//! wizard.generate_questions(&mut session).await?;
//! session.answer(0, "Shoppers")?;
//! wizard.build_document(&mut session).await?;
//! wizard.send(&mut session, &sender).await?;
//! ```

pub mod error;
pub mod session;
pub mod wizard;

pub use error::{CoreError, CoreResult};
pub use session::{Session, Stage};
pub use wizard::{Notice, Wizard, EXPORT_FILE_NAME};
