//! Upload storage using Apache OpenDAL.
//!
//! Files attached to an entry live under a directory named after the entry's
//! `uniqueID`; deleting the entry removes that directory. Backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3
//! - Local filesystem
//!
//! ```text
//! <root>/
//! ├── NSGD-48213/
//! │   ├── 1760601600000.pdf
//! │   └── 1760601654321.jpg
//! └── general/
//!     └── 1760601700000.png
//! ```

mod config;
mod error;
mod service;

#[cfg(test)]
mod service_props;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{DEFAULT_UPLOAD_DIR, StorageService, StoredFile, UploadRequest};
